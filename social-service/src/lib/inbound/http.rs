pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::AuthenticatedIdentity;
pub use router::create_router;
pub use router::AppState;

pub mod claims;
pub mod errors;
pub mod handler;
pub mod tokens;

pub use claims::Claims;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use tokens::TokenService;
pub use tokens::DEFAULT_TOKEN_TTL_DAYS;

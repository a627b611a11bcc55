pub mod identity;
pub mod post;
pub mod store;

pub mod identity;
pub mod memory;
pub mod post;

pub use identity::PostgresIdentityRepository;
pub use memory::InMemoryIdentityRepository;
pub use memory::InMemoryPostRepository;
pub use post::PostgresPostRepository;

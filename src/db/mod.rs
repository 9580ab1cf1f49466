pub mod memory;
pub mod postgres_service;
pub mod store;
pub mod teams;
pub mod user;

pub use memory::MemoryStore;
pub use store::UserStore;

//! Storage abstraction for user accounts

pub mod r#trait;
pub mod memory;
pub mod postgres;

pub use r#trait::UserStorage;
pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

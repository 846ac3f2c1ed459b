pub mod memory;
#[cfg(feature = "distributed")]
pub mod redis;
pub mod traits;

pub use memory::MemoryStore;
#[cfg(feature = "distributed")]
pub use redis::RedisStore;
pub use traits::StatusStore;

// 1. 基础模块
pub mod common;

// 2. 存储抽象与实现
pub mod persistence;

// 3. 注册表核心
pub mod registry;

pub use common::{KeyConfig, RegistryConfig, RegistryError, Result, WorkerProfile};
pub use persistence::{MemoryStore, StatusStore};
#[cfg(feature = "distributed")]
pub use persistence::RedisStore;
pub use registry::{DescriptorCodec, FnCodec, JsonCodec, WorkerRegistry, WorkerRegistryBuilder};

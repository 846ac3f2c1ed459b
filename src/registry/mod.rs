pub mod builder;
pub mod codec;
pub mod core;

pub use builder::WorkerRegistryBuilder;
pub use codec::{DescriptorCodec, FnCodec, JsonCodec};
pub use core::WorkerRegistry;

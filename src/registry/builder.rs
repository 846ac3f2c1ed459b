use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::common::config::RegistryConfig;
use crate::persistence::memory::MemoryStore;
use crate::persistence::traits::StatusStore;
use crate::registry::codec::JsonCodec;
use crate::registry::core::WorkerRegistry;

/// 注册表构造器 (Builder Pattern)
///
/// - `T`: 描述符类型
/// - `C`: 编解码器，默认 JSON
pub struct WorkerRegistryBuilder<T, C = JsonCodec> {
    /// Key 布局配置
    config: Option<RegistryConfig>,
    /// 共享存储 (Option 用于处理默认值逻辑)
    store: Option<Arc<dyn StatusStore>>,
    /// 编解码器
    codec: C,

    _payload: PhantomData<fn() -> T>,
}

impl<T> Default for WorkerRegistryBuilder<T, JsonCodec> {
    /// 创建一个新的构造器
    ///
    /// **默认行为**:
    /// - Config: Default (namespace "argus")
    /// - Codec: JSON
    /// - Store: None (build 时退化为全新的 MemoryStore)
    fn default() -> Self {
        Self {
            config: None,
            store: None,
            codec: JsonCodec,
            _payload: PhantomData,
        }
    }
}

impl<T> WorkerRegistryBuilder<T, JsonCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T, C> WorkerRegistryBuilder<T, C> {
    /// 设置配置
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 设置共享存储
    pub fn with_store<S>(mut self, store: S) -> Self
    where
        S: StatusStore,
    {
        self.store = Some(Arc::new(store));
        self
    }

    /// 设置共享存储 (已包装为 Arc 的场景)
    pub fn with_store_arc(mut self, store: Arc<dyn StatusStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// 替换编解码器
    pub fn with_codec<C2>(self, codec: C2) -> WorkerRegistryBuilder<T, C2> {
        WorkerRegistryBuilder {
            config: self.config,
            store: self.store,
            codec,
            _payload: PhantomData,
        }
    }

    /// 构建注册表
    pub fn build(self) -> WorkerRegistry<T, C> {
        let config = self.config.unwrap_or_default();

        // 处理存储层的默认逻辑
        let store = self.store.unwrap_or_else(|| {
            debug!("[Registry] Build using default MemoryStore");
            Arc::new(MemoryStore::new())
        });

        WorkerRegistry::new(store, config, self.codec)
    }
}

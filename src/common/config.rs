use serde::{Deserialize, Serialize};

// ==========================================
// 1. Key 布局配置 (KeyConfig)
// ==========================================

/// 共享存储中三个众所周知的 Key 名称
///
/// 注册表的全部状态都落在这三个 Key 上。名称可配置，
/// 配合 `namespace` 前缀，多个独立集群可以共用同一个存储实例而互不干扰，
/// 测试环境也能借此与生产数据完全隔离。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Worker 注册表 (Hash: 进程标识 -> 描述符 Blob)
    ///
    /// - 默认值: "workers"
    /// - 不变量: 出现在这个 Hash 里的 Key 代表一个当前被认为存活的 Worker。
    pub workers: String,

    /// 调度器标记 (String: 当前调度器 Worker 的进程标识)
    ///
    /// - 默认值: "scheduler-worker"
    /// - Key 不存在代表没有调度器注册。
    pub scheduler_worker: String,

    /// 暂停 Worker 集合 (Set: Worker 名称)
    ///
    /// - 默认值: "paused-workers"
    /// - 注意: 成员是 Worker *名称*，不是进程标识。
    pub paused_workers: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            workers: "workers".to_string(),
            scheduler_worker: "scheduler-worker".to_string(),
            paused_workers: "paused-workers".to_string(),
        }
    }
}

// ==========================================
// 2. 总配置入口 (RegistryConfig)
// ==========================================

/// 注册表总配置
///
/// 支持 `serde` 序列化，可直接从 YAML/JSON 加载。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// 命名空间 (存储 Key 前缀)
    ///
    /// - 说明: 完整 Key 为 `{namespace}:{key}`，如 `argus:workers`。
    /// - 默认值: "argus"
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Key 名称布局
    #[serde(default)]
    pub keys: KeyConfig,

    /// Redis 连接池大小
    ///
    /// - 说明: 维持的 Redis 长连接数量。
    /// - 默认值: 核心数 * 2
    #[cfg(feature = "distributed")]
    #[serde(default = "default_redis_pool_size")]
    pub redis_pool_size: usize,
}

fn default_namespace() -> String {
    "argus".to_string()
}

#[cfg(feature = "distributed")]
fn default_redis_pool_size() -> usize {
    num_cpus::get() * 2
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            keys: KeyConfig::default(),
            #[cfg(feature = "distributed")]
            redis_pool_size: default_redis_pool_size(),
        }
    }
}

impl RegistryConfig {
    /// 快速创建一个指定命名空间的配置
    ///
    /// 测试里用随机命名空间隔离夹具，生产里按集群命名。
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    // --- Key 生成辅助函数 ---

    /// Worker 注册表的完整 Key (Hash)
    pub fn key_workers(&self) -> String {
        format!("{}:{}", self.namespace, self.keys.workers)
    }

    /// 调度器标记的完整 Key (String)
    pub fn key_scheduler_worker(&self) -> String {
        format!("{}:{}", self.namespace, self.keys.scheduler_worker)
    }

    /// 暂停 Worker 集合的完整 Key (Set)
    pub fn key_paused_workers(&self) -> String {
        format!("{}:{}", self.namespace, self.keys.paused_workers)
    }
}

use thiserror::Error;

/// 注册表统一结果类型
///
/// 使用此别名可以简化函数签名：`fn do_something() -> Result<()>`
pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    // ==========================================
    // 1. 配置错误 (Configuration)
    // ==========================================
    /// 配置错误
    ///
    /// - 触发场景: namespace 为空、Key 名称冲突、Redis URL 解析失败。
    /// - 后果: 组件构造失败。
    /// - 处理: 检查配置文件或环境变量。
    #[error("Configuration error: {0}")]
    Config(String),

    // ==========================================
    // 2. 基础设施与 IO 错误 (Infrastructure & IO)
    // ==========================================
    /// Redis 交互失败
    ///
    /// - 触发场景: 网络抖动、Redis 重启、连接池耗尽、或 Redis 处于 Loading 状态。
    /// - 处理: 此类错误通常是暂时的，由调用方决定是否重试。
    #[cfg(feature = "distributed")]
    #[error("Redis interaction failed: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    /// Redis 连接池错误
    ///
    /// - 触发场景: 连接池耗尽或获取连接超时。
    #[cfg(feature = "distributed")]
    #[error("Redis pool failed: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// 通用 IO 错误
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    // ==========================================
    // 3. 编解码错误 (Codec)
    // ==========================================
    /// 序列化/反序列化失败 (默认 JSON 编解码)
    ///
    /// - 触发场景: 存储里的描述符损坏，或者代码版本升级导致结构体不兼容。
    /// - 后果: 不可恢复，重试无意义。
    /// - 处理: 人工介入检查存储内容。
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 自定义编解码器错误 (Anyhow 包装)
    ///
    /// - 说明: 用于包装调用方注入的非 JSON 编解码器抛出的各种错误。
    #[error("Descriptor codec error: {0}")]
    Codec(#[source] anyhow::Error),
}

// --- 智能重试判断 ---
impl RegistryError {
    /// 判断该错误是否值得重试 (Retryable)
    ///
    /// 注册表自身从不重试 (重试策略属于调用方)，此方法只做分类：
    ///
    /// - 返回 `true`: 网络抖动、连接池耗尽等暂时性故障，调用方可以退避重试。
    /// - 返回 `false`: 配置错误、数据损坏等永久性故障，重试无意义。
    pub fn is_retryable(&self) -> bool {
        match self {
            // 1. 基础设施抖动 (Redis 网络断开、集群切主) -> 重试
            #[cfg(feature = "distributed")]
            RegistryError::Redis(e) => {
                e.is_connection_dropped() || e.is_cluster_error() || e.is_io_error()
            }

            // 2. 连接池耗尽 -> 稍后重试
            #[cfg(feature = "distributed")]
            RegistryError::Pool(_) => true,

            // 3. IO 错误 (网络超时) -> 重试
            RegistryError::Io(_) => true,

            // --- 不可重试的情况 (永久性错误) ---

            // 配置错误 -> 重试也没用
            RegistryError::Config(_) => false,

            // 数据坏了 (描述符无法解析) -> 人工介入
            RegistryError::Serialization(_) => false,
            RegistryError::Codec(_) => false,
        }
    }
}

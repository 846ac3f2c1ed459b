use deadpool_redis::{Config, Pool, Runtime};

use crate::common::config::RegistryConfig;

/// Redis 存储实现
///
/// 持有一个 deadpool 连接池。所有原语都是单条 Redis 命令，
/// 原子性完全由 Redis 自身保证，这里不引入 Lua 脚本或事务。
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis 客户端连接池
    pub(super) pool: Pool,
}

impl RedisStore {
    /// 创建新实例
    ///
    /// 连接池大小取自 `config.redis_pool_size`。
    pub fn new(config: &RegistryConfig, url: &str) -> anyhow::Result<Self> {
        let mut cfg = Config::from_url(url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.redis_pool_size));
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;

        Ok(Self { pool })
    }
}

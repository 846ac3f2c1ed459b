use async_trait::async_trait;

use ahash::HashMap;
use deadpool_redis::redis::AsyncCommands;

use super::RedisStore;
use crate::common::error::Result;
use crate::persistence::traits::StatusStore;

#[async_trait]
impl StatusStore for RedisStore {
    // ==========================================
    // 1. KV 原语
    // ==========================================

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await?;
        // 多 Key DEL，一次 round-trip 内原子完成
        let removed: u64 = conn.del(keys).await?;
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    // ==========================================
    // 2. Hash 原语
    // ==========================================

    async fn hset(&self, key: &str, field: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.pool.get().await?;
        let value: Option<Vec<u8>> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, Vec<u8>>> {
        let mut conn = self.pool.get().await?;
        let raw: std::collections::HashMap<String, Vec<u8>> = conn.hgetall(key).await?;
        Ok(raw.into_iter().collect())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let removed: u64 = conn.hdel(key, field).await?;
        Ok(removed > 0)
    }

    async fn hlen(&self, key: &str) -> Result<usize> {
        let mut conn = self.pool.get().await?;
        let len: usize = conn.hlen(key).await?;
        Ok(len)
    }

    async fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let fields: Vec<String> = conn.hkeys(key).await?;
        Ok(fields)
    }

    // ==========================================
    // 3. Set 原语
    // ==========================================

    async fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let added: u64 = conn.sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let removed: u64 = conn.srem(key, member).await?;
        Ok(removed > 0)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn scard(&self, key: &str) -> Result<usize> {
        let mut conn = self.pool.get().await?;
        let card: usize = conn.scard(key).await?;
        Ok(card)
    }
}

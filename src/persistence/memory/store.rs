use ahash::{HashMap, HashMapExt};
use async_trait::async_trait;

use super::MemoryStore;
use crate::common::error::Result;
use crate::persistence::traits::StatusStore;

#[async_trait]
impl StatusStore for MemoryStore {
    // ==========================================
    // 1. KV 原语
    // ==========================================

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv.get(key).map(|v| v.clone()))
    }

    async fn del(&self, keys: &[&str]) -> Result<u64> {
        let mut removed = 0u64;
        for key in keys {
            // 同一个 Key 只会存在于一张表里，但逐一尝试以对齐 DEL 的跨类型语义
            let mut hit = self.kv.remove(*key).is_some();
            hit |= self.hashes.remove(*key).is_some();
            hit |= self.sets.remove(*key).is_some();
            if hit {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.kv.contains_key(key)
            || self.hashes.contains_key(key)
            || self.sets.contains_key(key))
    }

    // ==========================================
    // 2. Hash 原语
    // ==========================================

    async fn hset(&self, key: &str, field: &str, value: &[u8]) -> Result<()> {
        self.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_vec());
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.hashes.get(key).and_then(|h| h.get(field).cloned()))
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, Vec<u8>>> {
        match self.hashes.get(key) {
            Some(h) => Ok(h.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
            None => Ok(HashMap::new()),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool> {
        let mut removed = false;
        let mut now_empty = false;
        if let Some(mut entry) = self.hashes.get_mut(key) {
            removed = entry.remove(field).is_some();
            now_empty = entry.is_empty();
        }
        // 空 Hash 不保留 Key (对齐 Redis)。
        // 必须先释放上面的分片锁再移除，否则同分片会死锁。
        if now_empty {
            self.hashes.remove_if(key, |_, h| h.is_empty());
        }
        Ok(removed)
    }

    async fn hlen(&self, key: &str) -> Result<usize> {
        Ok(self.hashes.get(key).map(|h| h.len()).unwrap_or(0))
    }

    async fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        match self.hashes.get(key) {
            Some(h) => Ok(h.keys().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    // ==========================================
    // 3. Set 原语
    // ==========================================

    async fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        Ok(self
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool> {
        let mut removed = false;
        let mut now_empty = false;
        if let Some(mut entry) = self.sets.get_mut(key) {
            removed = entry.remove(member);
            now_empty = entry.is_empty();
        }
        // 空集合不保留 Key (对齐 Redis)，同样先释放分片锁
        if now_empty {
            self.sets.remove_if(key, |_, s| s.is_empty());
        }
        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        match self.sets.get(key) {
            Some(s) => Ok(s.iter().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn scard(&self, key: &str) -> Result<usize> {
        Ok(self.sets.get(key).map(|s| s.len()).unwrap_or(0))
    }
}

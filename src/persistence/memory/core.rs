use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;

/// 内存存储实现 (In-Memory Store)
///
/// 按类型分三张表模拟共享存储，语义对齐 Redis：
/// - DashMap: 分片锁，高并发读写不排队
/// - Hash/Set 删到空时连 Key 一起移除 (Redis 不保留空容器)
///
/// 用于测试和单机开发，多个注册表实例 Clone 同一个 `MemoryStore`
/// 即可模拟多进程共享一个存储。
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// 【字符串表】Key -> Value (调度器标记落在这里)
    pub(super) kv: Arc<DashMap<String, String>>,

    /// 【Hash 表】Key -> (字段 -> Blob) (Worker 注册表落在这里)
    pub(super) hashes: Arc<DashMap<String, HashMap<String, Vec<u8>>>>,

    /// 【集合表】Key -> 成员 (暂停 Worker 集合落在这里)
    pub(super) sets: Arc<DashMap<String, HashSet<String>>>,
}

impl MemoryStore {
    /// 创建一个空的内存存储
    pub fn new() -> Self {
        Self::default()
    }
}

// Clone 实现：因为内部都是 Arc，所以 Clone 是廉价的，且共享同一份数据
impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            kv: self.kv.clone(),
            hashes: self.hashes.clone(),
            sets: self.sets.clone(),
        }
    }
}

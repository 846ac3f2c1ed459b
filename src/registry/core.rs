use std::marker::PhantomData;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use tracing::warn;

use crate::common::config::RegistryConfig;
use crate::common::error::Result;
use crate::persistence::traits::StatusStore;
use crate::registry::codec::{DescriptorCodec, JsonCodec};

// ==========================================
// Worker 注册表 (WorkerRegistry)
// ==========================================

/// Worker 注册表
///
/// 集群的共享 Worker 登记处：哪些 Worker 存活、哪些被暂停、
/// 有没有调度器 Worker 在运行，全部以共享存储为唯一事实来源。
///
/// 组件自身完全无状态，不缓存任何数据，每次操作都直达存储，
/// 因此多个进程各持一个实例也能观察到一致的视图
/// (一致性边界就是存储自身的单 Key 原子性)。
///
/// - `T`: 描述符类型 (对注册表不透明)
/// - `C`: 描述符编解码器，默认 JSON
pub struct WorkerRegistry<T, C = JsonCodec> {
    /// 共享存储 (注入依赖，测试时换成内存实现)
    store: Arc<dyn StatusStore>,
    /// Key 布局配置
    config: Arc<RegistryConfig>,
    /// 描述符编解码器
    codec: C,

    _payload: PhantomData<fn() -> T>,
}

impl<T, C: Clone> Clone for WorkerRegistry<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            codec: self.codec.clone(),
            _payload: PhantomData,
        }
    }
}

// ==========================================
// 1. 通用操作 (不经过编解码器)
// ==========================================
impl<T, C> WorkerRegistry<T, C> {
    /// 创建注册表实例
    pub fn new(store: Arc<dyn StatusStore>, config: RegistryConfig, codec: C) -> Self {
        Self {
            store,
            config: Arc::new(config),
            codec,
            _payload: PhantomData,
        }
    }

    /// 当前生效的配置
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// 枚举注册表，返回原始描述符字节 (不解码)
    ///
    /// 监控工具不需要知道 `T` 也能列出全部 Worker。
    pub async fn get_workers_raw(&self) -> Result<HashMap<String, Vec<u8>>> {
        self.store.hgetall(&self.config.key_workers()).await
    }

    /// 存活 Worker 数量
    pub async fn worker_count(&self) -> Result<usize> {
        self.store.hlen(&self.config.key_workers()).await
    }

    /// 枚举全部存活 Worker 的进程标识
    pub async fn worker_ids(&self) -> Result<Vec<String>> {
        self.store.hkeys(&self.config.key_workers()).await
    }

    /// 注销一个 Worker
    ///
    /// 幂等：标识不存在时同样成功返回。
    pub async fn remove_worker(&self, id: &str) -> Result<()> {
        self.store.hdel(&self.config.key_workers(), id).await?;
        Ok(())
    }

    /// 清空注册表与暂停集合 (管理性重置)
    ///
    /// 一次多 Key DEL 同时删掉两个 Key，两者一起回到"不存在"状态。
    /// 正常运行中不会调用，典型场景是测试 teardown 或整个集群重置。
    pub async fn clear_workers(&self) -> Result<()> {
        let workers = self.config.key_workers();
        let paused = self.config.key_paused_workers();
        self.store.del(&[&workers, &paused]).await?;
        Ok(())
    }

    // ==========================================
    // 2. 调度器标记 (Scheduler Marker)
    // ==========================================

    /// 把 `id` 登记为当前调度器 Worker
    ///
    /// 无条件覆盖旧值，最后一次调用胜出。
    ///
    /// **注意**: 这里不检查 `id` 是否已在注册表里，注册顺序是调用方的责任
    /// (约定 Worker 先 `add_worker` 再声明自己是调度器)。
    /// 只声明不注册的标记会被下一次 `is_running_scheduler_worker`
    /// 当作陈旧标记清掉。
    pub async fn register_scheduler_worker(&self, id: &str) -> Result<()> {
        self.store
            .set(&self.config.key_scheduler_worker(), id)
            .await
    }

    /// 删除调度器标记
    ///
    /// 幂等：标记本就不存在时同样成功返回。
    pub async fn unregister_scheduler_worker(&self) -> Result<()> {
        let key = self.config.key_scheduler_worker();
        self.store.del(&[&key]).await?;
        Ok(())
    }

    /// 判断 `id` 是否就是当前登记的调度器 Worker
    ///
    /// 纯读操作，无副作用。没有标记或标识不同都返回 `false`。
    pub async fn is_scheduler_worker(&self, id: &str) -> Result<bool> {
        let marker = self.store.get(&self.config.key_scheduler_worker()).await?;
        Ok(marker.as_deref() == Some(id))
    }

    /// 判断当前是否真的有调度器 Worker 在运行 (带自愈)
    ///
    /// 标记本身并不可信：调度器进程可能没来得及注销就死掉了。
    /// 所以依次检查：
    ///
    /// 1. 读标记。不存在 -> `false`。
    /// 2. 标记指向的标识还在注册表里 -> `true`，标记保持原样。
    /// 3. 标识已从注册表消失 -> 标记陈旧，顺手删掉它，返回 `false`。
    ///
    /// 返回 `false` 即表示"现在可以安全地启动一个新调度器"，
    /// 因为陈旧标记已经被清理。清理本身失败时错误原样抛出，
    /// 绝不吞掉 (此时不变量仍处于被破坏状态，调用方必须知道)。
    ///
    /// **已知竞态**: 读标记、查注册表、删标记是三次独立 round-trip，
    /// 没有事务保护。并发的 `register_scheduler_worker` 可能被这里的
    /// 清理误删；刚注册还没写入注册表的调度器也可能被误判为陈旧。
    /// 这是有意的取舍 (存储边界只要求单 Key 原子原语)，
    /// 需要更强协调的部署请在调用方叠加分布式锁。
    pub async fn is_running_scheduler_worker(&self) -> Result<bool> {
        let marker = self.store.get(&self.config.key_scheduler_worker()).await?;
        let Some(id) = marker else {
            return Ok(false);
        };

        let alive = self
            .store
            .hget(&self.config.key_workers(), &id)
            .await?
            .is_some();
        if alive {
            return Ok(true);
        }

        warn!(
            "[Registry] Scheduler marker '{}' points to a worker no longer registered, clearing stale marker",
            id
        );
        self.unregister_scheduler_worker().await?;
        Ok(false)
    }

    // ==========================================
    // 3. 暂停集合 (Paused Workers)
    // ==========================================

    /// 标记一个 Worker 为暂停/恢复状态
    ///
    /// - `paused = true`: 把名称加入暂停集合
    /// - `paused = false`: 从暂停集合移除
    ///
    /// 两个方向都幂等。注意参数是 Worker *名称*，不是进程标识。
    /// 暂停只是登记状态，是否真的不派发任务由消费方执行。
    pub async fn set_paused_worker(&self, name: &str, paused: bool) -> Result<()> {
        let key = self.config.key_paused_workers();
        if paused {
            self.store.sadd(&key, name).await?;
        } else {
            self.store.srem(&key, name).await?;
        }
        Ok(())
    }

    /// 枚举当前暂停的 Worker 名称
    ///
    /// 没有暂停的 Worker 时返回空列表，永远不是错误。
    pub async fn get_paused_workers(&self) -> Result<Vec<String>> {
        self.store.smembers(&self.config.key_paused_workers()).await
    }

    /// 暂停 Worker 数量
    pub async fn paused_worker_count(&self) -> Result<usize> {
        self.store.scard(&self.config.key_paused_workers()).await
    }
}

// ==========================================
// 4. 描述符操作 (经过编解码器)
// ==========================================
impl<T, C> WorkerRegistry<T, C>
where
    C: DescriptorCodec<T>,
{
    /// 登记一个 Worker
    ///
    /// 描述符编码后写入注册表 Hash 的 `id` 字段，同名字段无条件覆盖。
    pub async fn add_worker(&self, id: &str, descriptor: &T) -> Result<()> {
        let blob = self.codec.encode(descriptor)?;
        self.store
            .hset(&self.config.key_workers(), id, &blob)
            .await
    }

    /// 枚举全部存活 Worker: 进程标识 -> 描述符
    ///
    /// 注册表为空时返回空 Map，永远不是错误。
    /// 任何一个描述符解码失败则整体报错 (存储内容已损坏，不该静默跳过)。
    pub async fn get_workers(&self) -> Result<HashMap<String, T>> {
        let raw = self.store.hgetall(&self.config.key_workers()).await?;
        let mut workers = HashMap::with_capacity(raw.len());
        for (id, blob) in raw {
            workers.insert(id, self.codec.decode(&blob)?);
        }
        Ok(workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::model::WorkerProfile;
    use crate::persistence::memory::MemoryStore;
    use crate::registry::codec::FnCodec;

    fn test_registry(store: &MemoryStore) -> WorkerRegistry<WorkerProfile> {
        WorkerRegistry::new(
            Arc::new(store.clone()),
            RegistryConfig::with_namespace("test"),
            JsonCodec,
        )
    }

    fn profile(pid: u32, queue: &str, interval_ms: u64) -> WorkerProfile {
        WorkerProfile::new("host", pid, vec![queue.to_string()], interval_ms)
    }

    #[tokio::test]
    async fn test_add_worker_round_trip() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        let one = profile(100, "queue5", 5);
        let two = profile(101, "queue1", 10);
        registry.add_worker("100", &one).await.unwrap();
        registry.add_worker("101", &two).await.unwrap();

        assert_eq!(registry.worker_count().await.unwrap(), 2);

        let workers = registry.get_workers().await.unwrap();
        assert_eq!(workers.get("100"), Some(&one));
        assert_eq!(workers.get("101"), Some(&two));
    }

    #[tokio::test]
    async fn test_add_worker_overwrites_existing_entry() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        let replacement = profile(100, "queue9", 60);
        registry.add_worker("100", &replacement).await.unwrap();

        assert_eq!(registry.worker_count().await.unwrap(), 1);
        let workers = registry.get_workers().await.unwrap();
        assert_eq!(workers.get("100"), Some(&replacement));
    }

    #[tokio::test]
    async fn test_get_workers_empty_registry() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        assert!(registry.get_workers().await.unwrap().is_empty());
        assert!(registry.get_workers_raw().await.unwrap().is_empty());
        assert_eq!(registry.worker_count().await.unwrap(), 0);
        assert!(registry.worker_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_worker_removes_only_that_entry() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        registry
            .add_worker("101", &profile(101, "queue1", 10))
            .await
            .unwrap();

        registry.remove_worker("100").await.unwrap();

        assert_eq!(registry.worker_ids().await.unwrap(), vec!["101".to_string()]);

        // 删除不存在的标识是幂等的
        registry.remove_worker("100").await.unwrap();
        registry.remove_worker("ghost").await.unwrap();
        assert_eq!(registry.worker_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_workers_removes_both_keys() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        registry.set_paused_worker("host:100:queue5", true).await.unwrap();

        registry.clear_workers().await.unwrap();

        let config = registry.config().clone();
        assert!(!store.exists(&config.key_workers()).await.unwrap());
        assert!(!store.exists(&config.key_paused_workers()).await.unwrap());
        assert!(registry.get_workers().await.unwrap().is_empty());
        assert!(registry.get_paused_workers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_scheduler_worker_last_call_wins() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry.register_scheduler_worker("100").await.unwrap();
        registry.register_scheduler_worker("102").await.unwrap();

        assert!(!registry.is_scheduler_worker("100").await.unwrap());
        assert!(registry.is_scheduler_worker("102").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_scheduler_worker_without_marker() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        assert!(!registry.is_scheduler_worker("100").await.unwrap());
    }

    #[tokio::test]
    async fn test_unregister_scheduler_worker_is_idempotent() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry.register_scheduler_worker("100").await.unwrap();
        registry.unregister_scheduler_worker().await.unwrap();
        registry.unregister_scheduler_worker().await.unwrap();

        assert!(!registry.is_scheduler_worker("100").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_running_scheduler_worker_live() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        registry.register_scheduler_worker("100").await.unwrap();

        assert!(registry.is_running_scheduler_worker().await.unwrap());
        // 标记保持原样，重复询问结果稳定
        assert!(registry.is_scheduler_worker("100").await.unwrap());
        assert!(registry.is_running_scheduler_worker().await.unwrap());
    }

    #[tokio::test]
    async fn test_is_running_scheduler_worker_without_marker() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        assert!(!registry.is_running_scheduler_worker().await.unwrap());

        // 注册表非空也一样：没有标记就是没有调度器
        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        assert!(!registry.is_running_scheduler_worker().await.unwrap());
        assert_eq!(registry.worker_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_is_running_scheduler_worker_cleans_stale_marker() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry
            .add_worker("100", &profile(100, "queue5", 5))
            .await
            .unwrap();
        registry
            .add_worker("101", &profile(101, "queue1", 10))
            .await
            .unwrap();
        // 标记指向的 102 不在注册表里 (进程死了没注销)
        registry.register_scheduler_worker("102").await.unwrap();

        assert!(!registry.is_running_scheduler_worker().await.unwrap());

        // 陈旧标记已被清理
        assert!(!registry.is_scheduler_worker("102").await.unwrap());
        let config = registry.config().clone();
        assert!(!store.exists(&config.key_scheduler_worker()).await.unwrap());

        // 其余 Worker 不受影响
        assert_eq!(registry.worker_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_scheduler_claimed_but_never_registered() {
        // 声明了调度器却从未 add_worker：注册顺序是调用方的责任，
        // 这里只保证下一次一致性检查会把这种标记当作陈旧清掉。
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry.register_scheduler_worker("999").await.unwrap();
        assert!(registry.is_scheduler_worker("999").await.unwrap());

        assert!(!registry.is_running_scheduler_worker().await.unwrap());
        assert!(!registry.is_scheduler_worker("999").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_paused_worker_toggle() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        registry.set_paused_worker("workerOne", true).await.unwrap();
        registry.set_paused_worker("workerTwo", true).await.unwrap();
        assert_eq!(registry.paused_worker_count().await.unwrap(), 2);

        registry.set_paused_worker("workerOne", false).await.unwrap();
        assert_eq!(
            registry.get_paused_workers().await.unwrap(),
            vec!["workerTwo".to_string()]
        );

        // 两个方向都幂等
        registry.set_paused_worker("workerTwo", true).await.unwrap();
        registry.set_paused_worker("workerOne", false).await.unwrap();
        assert_eq!(registry.paused_worker_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_paused_workers_empty() {
        let store = MemoryStore::new();
        let registry = test_registry(&store);

        assert_eq!(registry.get_paused_workers().await.unwrap(), Vec::<String>::new());
        assert_eq!(registry.paused_worker_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fn_codec_byte_identical_round_trip() {
        // 透传编解码器：描述符就是原始字节，存进去什么读出来必须逐字节相同
        let store = MemoryStore::new();
        let codec = FnCodec::new(
            |v: &Vec<u8>| -> Result<Vec<u8>> { Ok(v.clone()) },
            |raw: &[u8]| -> Result<Vec<u8>> { Ok(raw.to_vec()) },
        );
        let registry: WorkerRegistry<Vec<u8>, _> = WorkerRegistry::new(
            Arc::new(store.clone()),
            RegistryConfig::with_namespace("test"),
            codec,
        );

        let blob = vec![0u8, 159, 146, 150, 255, 1, 2, 3];
        registry.add_worker("100", &blob).await.unwrap();

        let raw = registry.get_workers_raw().await.unwrap();
        assert_eq!(raw.get("100"), Some(&blob));

        let workers = registry.get_workers().await.unwrap();
        assert_eq!(workers.get("100"), Some(&blob));
    }
}

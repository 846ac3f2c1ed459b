use crate::common::error::Result;
use ahash::HashMap;
use async_trait::async_trait;

// ==========================================
// 共享存储接口 (StatusStore) - 唯一的事实来源
// ==========================================

/// 共享存储接口
///
/// **职责**: 注册表与外部世界的唯一边界。提供单 Key 原子的
/// KV / Hash / Set 三类原语，语义对齐 Redis 同名命令。
///
/// **契约**:
/// - 每个原语都是存储层面的一次原子操作 (单次 round-trip)。
/// - "逻辑缺失" (Key 不存在、字段不存在、集合为空) 一律表示为
///   `None` / `false` / 空集合，**绝不**表示为错误。
/// - 错误只来自连接/协议层面，原样向上传播，不做解释。
/// - 实现层不做任何重试，重试策略属于调用方。
///
/// 生产环境由 Redis 实现；测试与单机开发由内存实现替代，
/// 两者对注册表完全等价。
#[async_trait]
pub trait StatusStore: Send + Sync + 'static {
    // ==========================================
    // 1. KV 原语 (String)
    // ==========================================

    /// 写入字符串 Key，无条件覆盖旧值
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 读取字符串 Key
    ///
    /// Key 不存在时返回 `None`。
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 删除一批 Key (跨类型)
    ///
    /// 一次调用对应存储的一次多 Key DEL。
    ///
    /// # 返回值
    /// 实际被删除的 Key 数量 (不存在的 Key 不计数)。
    async fn del(&self, keys: &[&str]) -> Result<u64>;

    /// 判断 Key 是否存在 (任意类型)
    async fn exists(&self, key: &str) -> Result<bool>;

    // ==========================================
    // 2. Hash 原语
    // ==========================================

    /// 写入 Hash 字段，无条件覆盖同名字段
    async fn hset(&self, key: &str, field: &str, value: &[u8]) -> Result<()>;

    /// 读取单个 Hash 字段
    ///
    /// Key 或字段不存在时返回 `None`。
    async fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>>;

    /// 枚举 Hash 的全部字段与值
    ///
    /// Key 不存在时返回空 Map。字段顺序无意义。
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, Vec<u8>>>;

    /// 删除单个 Hash 字段
    ///
    /// # 返回值
    /// 字段存在且被删除返回 `true`；字段本就不存在返回 `false` (幂等)。
    async fn hdel(&self, key: &str, field: &str) -> Result<bool>;

    /// Hash 字段数量
    ///
    /// Key 不存在时返回 0。
    async fn hlen(&self, key: &str) -> Result<usize>;

    /// 枚举 Hash 的全部字段名
    async fn hkeys(&self, key: &str) -> Result<Vec<String>>;

    // ==========================================
    // 3. Set 原语
    // ==========================================

    /// 向集合添加成员
    ///
    /// # 返回值
    /// 成员是新加入的返回 `true`；已存在返回 `false` (幂等)。
    async fn sadd(&self, key: &str, member: &str) -> Result<bool>;

    /// 从集合移除成员
    ///
    /// # 返回值
    /// 成员存在且被移除返回 `true`；本就不存在返回 `false` (幂等)。
    async fn srem(&self, key: &str, member: &str) -> Result<bool>;

    /// 枚举集合全部成员
    ///
    /// Key 不存在时返回空列表。成员顺序无意义。
    async fn smembers(&self, key: &str) -> Result<Vec<String>>;

    /// 集合基数
    ///
    /// Key 不存在时返回 0。
    async fn scard(&self, key: &str) -> Result<usize>;
}

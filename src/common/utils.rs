use nanoid::nanoid;

/// 获取当前机器的主机名
///
/// 用于生成 `WorkerProfile` 的默认 host 字段。
/// 获取失败时退化为 `worker_<随机串>`，保证名称始终可用且大概率唯一。
pub fn get_hostname() -> String {
    hostname::get()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|_| format!("worker_{}", nanoid!(5)))
}

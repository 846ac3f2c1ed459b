use serde::{Deserialize, Serialize};

use crate::common::utils::get_hostname;

/// Worker 档案 (默认描述符)
///
/// 注册表本身对描述符完全不透明 (泛型 `T` + 注入的编解码器)，
/// 这里提供一个开箱即用的默认形状：进程身份 + 消费的队列 + 轮询间隔。
/// 需要携带更多字段的调用方直接换成自己的类型即可。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// 主机名
    pub host: String,

    /// 进程 PID
    pub pid: u32,

    /// 该 Worker 消费的队列列表
    #[serde(default)]
    pub queues: Vec<String>,

    /// 轮询间隔 (毫秒)
    ///
    /// - 说明: Worker 检查新任务的频率，仅作为档案信息存储，注册表不消费它。
    pub interval_ms: u64,
}

impl WorkerProfile {
    /// 创建一个完整指定的档案
    pub fn new(
        host: impl Into<String>,
        pid: u32,
        queues: Vec<String>,
        interval_ms: u64,
    ) -> Self {
        Self {
            host: host.into(),
            pid,
            queues,
            interval_ms,
        }
    }

    /// 创建一个本机档案 (host 自动取当前主机名)
    pub fn local(pid: u32, queues: Vec<String>, interval_ms: u64) -> Self {
        Self::new(get_hostname(), pid, queues, interval_ms)
    }

    /// Worker 的可读名称: `host:pid:queue1,queue2`
    ///
    /// 暂停集合 (`set_paused_worker`) 按这个名称记录成员，
    /// 与注册表 Hash 的进程标识是两套不同的标识体系。
    pub fn worker_name(&self) -> String {
        format!("{}:{}:{}", self.host, self.pid, self.queues.join(","))
    }
}

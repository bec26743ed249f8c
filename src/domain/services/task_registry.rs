// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 正在轮询中的任务
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTask {
    pub task_id: String,
    pub urls: Vec<String>,
    pub started_at: DateTime<Utc>,
}

/// 活跃任务注册表
///
/// 每个进程构造一个，通过 `Arc` 传给需要它的组件，进程退出前调用 `shutdown`。
#[derive(Debug, Default)]
pub struct ActiveTaskRegistry {
    tasks: DashMap<String, ActiveTask>,
    shut_down: AtomicBool,
}

impl ActiveTaskRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 登记一个任务，返回的守卫在丢弃时注销该任务
    ///
    /// 注册表已关闭时不再登记，但仍返回守卫以便调用方统一处理。
    pub fn register(self: &Arc<Self>, task_id: &str, urls: &[String]) -> ActiveTaskGuard {
        if self.shut_down.load(Ordering::SeqCst) {
            warn!(task_id, "Registry is shut down, task not tracked");
        } else {
            self.tasks.insert(
                task_id.to_string(),
                ActiveTask {
                    task_id: task_id.to_string(),
                    urls: urls.to_vec(),
                    started_at: Utc::now(),
                },
            );
            debug!(task_id, active = self.tasks.len(), "Task registered");
        }

        ActiveTaskGuard {
            registry: Arc::clone(self),
            task_id: task_id.to_string(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 当前活跃任务的快照，按开始时间排序
    pub fn snapshot(&self) -> Vec<ActiveTask> {
        let mut tasks: Vec<ActiveTask> = self.tasks.iter().map(|e| e.value().clone()).collect();
        tasks.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        tasks
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// 关闭注册表并返回关闭时仍在轮询的任务ID
    pub fn shutdown(&self) -> Vec<String> {
        self.shut_down.store(true, Ordering::SeqCst);
        let mut ids: Vec<String> = self.tasks.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        self.tasks.clear();
        if !ids.is_empty() {
            info!(count = ids.len(), "Registry shut down with tasks still active");
        }
        ids
    }
}

/// 活跃任务守卫
pub struct ActiveTaskGuard {
    registry: Arc<ActiveTaskRegistry>,
    task_id: String,
}

impl ActiveTaskGuard {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

impl Drop for ActiveTaskGuard {
    fn drop(&mut self) {
        if self.registry.tasks.remove(&self.task_id).is_some() {
            debug!(task_id = %self.task_id, "Task unregistered");
        }
    }
}

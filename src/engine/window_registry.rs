// ==========================================
// 运维工单报表系统 - 窗口注册表
// ==========================================
// 职责: 按作用域解析当前生效窗口 + 全局模式覆盖
// 缓存: 活动窗口按作用域缓存, 失效后从仓储重建(换引用)
// ==========================================

use crate::domain::types::WindowScope;
use crate::domain::window::{DateWindow, WindowSettings};
use crate::repository::error::RepositoryResult;
use crate::repository::window_repo::DateWindowRepository;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// 缓存只存可重建数据, 锁中毒直接回收守卫继续使用
fn read_recover<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_recover<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub struct WindowRegistry {
    repo: Arc<DateWindowRepository>,
    windows: RwLock<HashMap<WindowScope, Arc<DateWindow>>>,
    settings: RwLock<Option<WindowSettings>>,
}

impl WindowRegistry {
    pub fn new(repo: Arc<DateWindowRepository>) -> Self {
        Self {
            repo,
            windows: RwLock::new(HashMap::new()),
            settings: RwLock::new(None),
        }
    }

    /// 读取窗口设置(读穿缓存)
    pub fn settings(&self) -> RepositoryResult<WindowSettings> {
        {
            let cached = read_recover(&self.settings);
            if let Some(settings) = *cached {
                return Ok(settings);
            }
        }

        let settings = self.repo.get_settings()?;
        *write_recover(&self.settings) = Some(settings);
        Ok(settings)
    }

    /// 解析某作用域的生效窗口
    ///
    /// # 规则
    /// - 全局模式开启: 无视请求作用域, 一律返回 GLOBAL 作用域窗口
    /// - 否则返回该作用域的活动窗口
    /// - 目标作用域未配置活动窗口: 返回隐式"当前周"DISABLED 窗口
    pub fn resolve(&self, scope: WindowScope, today: NaiveDate) -> RepositoryResult<Arc<DateWindow>> {
        let effective_scope = if self.settings()?.global_mode_enabled {
            WindowScope::Global
        } else {
            scope
        };

        {
            let windows = read_recover(&self.windows);
            if let Some(window) = windows.get(&effective_scope) {
                return Ok(Arc::clone(window));
            }
        }

        let window = Arc::new(
            self.repo
                .get_active_by_scope(effective_scope)?
                .unwrap_or_else(|| DateWindow::implicit_disabled(effective_scope, today)),
        );

        let mut windows = write_recover(&self.windows);
        let entry = windows
            .entry(effective_scope)
            .or_insert_with(|| Arc::clone(&window));
        Ok(Arc::clone(entry))
    }

    /// 失效全部缓存(窗口保存/全局模式切换后调用)
    pub fn invalidate(&self) {
        write_recover(&self.windows).clear();
        *write_recover(&self.settings) = None;
        tracing::debug!("窗口注册表缓存已失效");
    }
}

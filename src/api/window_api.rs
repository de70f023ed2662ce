// ==========================================
// 运维工单报表系统 - 窗口管理API
// ==========================================
// 职责: 按作用域查询/保存日期窗口 + 全局模式开关
// 红线: 窗口或设置变更后必须失效窗口注册表缓存
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{RangeKind, WindowScope};
use crate::domain::window::{DateWindow, NewDateWindow, WindowSettings};
use crate::engine::window_registry::WindowRegistry;
use crate::i18n::{t, t_with_args};
use crate::repository::window_repo::DateWindowRepository;
use std::sync::Arc;

pub struct WindowApi {
    repo: Arc<DateWindowRepository>,
    registry: Arc<WindowRegistry>,
}

impl WindowApi {
    pub fn new(repo: Arc<DateWindowRepository>, registry: Arc<WindowRegistry>) -> Self {
        Self { repo, registry }
    }

    /// 查询某作用域的当前活动窗口(未配置时返回 None, 不构造隐式窗口)
    pub fn get_active_window(&self, scope: WindowScope) -> ApiResult<Option<DateWindow>> {
        Ok(self.repo.get_active_by_scope(scope)?)
    }

    /// 列出某作用域的全部窗口(含历史)
    pub fn list_windows(&self, scope: WindowScope) -> ApiResult<Vec<DateWindow>> {
        Ok(self.repo.list_by_scope(scope)?)
    }

    /// 保存并激活某作用域的窗口
    ///
    /// 校验: from_date <= to_date; DISABLED 种类不落库(其语义即"无窗口")。
    pub fn save_window(&self, scope: WindowScope, window: NewDateWindow) -> ApiResult<DateWindow> {
        if window.range_kind == RangeKind::Disabled {
            return Err(ApiError::InvalidInput(t("window.disabled_not_persistable")));
        }
        if window.from_date > window.to_date {
            return Err(ApiError::InvalidInput(t_with_args(
                "window.invalid_range",
                &[
                    ("from", &window.from_date.to_string()),
                    ("to", &window.to_date.to_string()),
                ],
            )));
        }

        let saved = self.repo.save_for_scope(scope, &window)?;
        self.registry.invalidate();
        tracing::info!(
            scope = %scope,
            window_id = saved.id,
            from = %saved.from_date,
            to = %saved.to_date,
            "窗口已保存并激活"
        );
        Ok(saved)
    }

    /// 读取窗口设置
    pub fn get_settings(&self) -> ApiResult<WindowSettings> {
        Ok(self.repo.get_settings()?)
    }

    /// 切换全局模式
    pub fn set_global_mode(&self, enabled: bool) -> ApiResult<WindowSettings> {
        self.repo.update_global_mode(enabled)?;
        self.registry.invalidate();
        tracing::info!(enabled, "全局窗口模式已切换");
        Ok(WindowSettings {
            global_mode_enabled: enabled,
        })
    }
}

// ==========================================
// 运维工单报表系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约定: 全部仓储挂同一个共享连接, 避免多连接下的写锁竞争
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DeriveApi, RuleApi, TicketApi, WindowApi};
use crate::db::open_sqlite_connection;
use crate::engine::rule_cache::RuleSetCache;
use crate::engine::window_registry::WindowRegistry;
use crate::repository::error::RepositoryResult;
use crate::repository::{
    link_repo::TicketLinkRepository, rule_repo::PatternRuleRepository,
    ticket_repo::TicketRecordRepository, window_repo::DateWindowRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源。
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 批次派生API
    pub derive_api: Arc<DeriveApi>,

    /// 规则管理API
    pub rule_api: Arc<RuleApi>,

    /// 窗口管理API
    pub window_api: Arc<WindowApi>,

    /// 工单查询与人工操作API
    pub ticket_api: Arc<TicketApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 初始化顺序: 共享连接 → Repository → 引擎缓存 → API。
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!("初始化AppState, 数据库路径: {}", db_path);

        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

        // ==========================================
        // 初始化Repository层 (共享同一连接)
        // ==========================================
        let rule_repo = Arc::new(PatternRuleRepository::from_connection(Arc::clone(&conn))?);
        let window_repo = Arc::new(DateWindowRepository::from_connection(Arc::clone(&conn))?);
        let ticket_repo = Arc::new(TicketRecordRepository::from_connection(Arc::clone(&conn))?);
        let link_repo = Arc::new(TicketLinkRepository::from_connection(Arc::clone(&conn))?);

        // ==========================================
        // 初始化引擎缓存层
        // ==========================================
        let rule_cache = Arc::new(RuleSetCache::new(Arc::clone(&rule_repo)));
        let window_registry = Arc::new(WindowRegistry::new(Arc::clone(&window_repo)));

        // ==========================================
        // 初始化API层
        // ==========================================
        let derive_api = Arc::new(DeriveApi::new(
            Arc::clone(&ticket_repo),
            Arc::clone(&link_repo),
            Arc::clone(&rule_cache),
            Arc::clone(&window_registry),
        ));
        let rule_api = Arc::new(RuleApi::new(Arc::clone(&rule_repo), Arc::clone(&rule_cache)));
        let window_api = Arc::new(WindowApi::new(
            Arc::clone(&window_repo),
            Arc::clone(&window_registry),
        ));
        let ticket_api = Arc::new(TicketApi::new(
            Arc::clone(&ticket_repo),
            Arc::clone(&link_repo),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            derive_api,
            rule_api,
            window_api,
            ticket_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 TICKET_REPORT_DB_PATH > 用户数据目录 > 当前目录回退。
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("TICKET_REPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./ticket_report.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录, 避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("ticket-report-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("ticket-report");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("ticket_report.db");
    }

    path.to_string_lossy().to_string()
}

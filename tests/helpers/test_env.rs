// ==========================================
// API集成测试环境
// ==========================================
// 职责: 临时数据库 + 全套仓储/缓存/API装配
// ==========================================

use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use ticket_report::api::{DeriveApi, RuleApi, TicketApi, WindowApi};
use ticket_report::db::open_sqlite_connection;
use ticket_report::engine::rule_cache::RuleSetCache;
use ticket_report::engine::window_registry::WindowRegistry;
use ticket_report::repository::{
    link_repo::TicketLinkRepository, rule_repo::PatternRuleRepository,
    ticket_repo::TicketRecordRepository, window_repo::DateWindowRepository,
};

/// 集成测试环境
///
/// 包含全部API实例与仓储(仓储用于测试数据准备与结果校验)。
pub struct TestEnv {
    pub db_path: String,

    pub derive_api: Arc<DeriveApi>,
    pub rule_api: Arc<RuleApi>,
    pub window_api: Arc<WindowApi>,
    pub ticket_api: Arc<TicketApi>,

    pub rule_repo: Arc<PatternRuleRepository>,
    pub window_repo: Arc<DateWindowRepository>,
    pub ticket_repo: Arc<TicketRecordRepository>,
    pub link_repo: Arc<TicketLinkRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_file = NamedTempFile::new().expect("创建临时数据库文件失败");
        let db_path = temp_file.path().to_string_lossy().to_string();

        let conn = Arc::new(Mutex::new(
            open_sqlite_connection(&db_path).expect("打开测试数据库失败"),
        ));

        let rule_repo = Arc::new(
            PatternRuleRepository::from_connection(Arc::clone(&conn)).expect("rule repo"),
        );
        let window_repo = Arc::new(
            DateWindowRepository::from_connection(Arc::clone(&conn)).expect("window repo"),
        );
        let ticket_repo = Arc::new(
            TicketRecordRepository::from_connection(Arc::clone(&conn)).expect("ticket repo"),
        );
        let link_repo =
            Arc::new(TicketLinkRepository::from_connection(Arc::clone(&conn)).expect("link repo"));

        let rule_cache = Arc::new(RuleSetCache::new(Arc::clone(&rule_repo)));
        let window_registry = Arc::new(WindowRegistry::new(Arc::clone(&window_repo)));

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

        Self {
            db_path,
            derive_api,
            rule_api,
            window_api,
            ticket_api,
            rule_repo,
            window_repo,
            ticket_repo,
            link_repo,
            _temp_file: temp_file,
        }
    }
}

// ==========================================
// 运维工单报表系统 - 应用层
// ==========================================
// 职责: 装配共享连接 / 仓储 / 引擎缓存 / API实例
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};

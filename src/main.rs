// ==========================================
// 运维工单报表系统 - 主入口
// ==========================================
// 职责: 初始化日志与应用状态, 以库模式对外提供API
// ==========================================

use ticket_report::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() {
    // 初始化日志系统
    ticket_report::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", ticket_report::APP_NAME);
    tracing::info!("系统版本: {}", ticket_report::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    tracing::info!("正在初始化AppState...");
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("AppState初始化成功");
    tracing::info!(
        "已装配API: derive / rule / window / ticket (数据库: {})",
        app_state.db_path
    );
}

// ==========================================
// 运维工单报表系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 规则驱动的工单批次派生与报表支撑
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 规则匹配/窗口判定/关联聚合
pub mod engine;

// 派生层 - 批次清洗与派生流水线
pub mod importer;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与启动
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BatchOutcome, PatternKind, RangeKind, RuleFamily, WindowScope};

// 领域实体
pub use domain::{
    DateWindow, LinkGroup, LinkedField, NewDateWindow, NewPatternRule, PatternRule,
    PatternRuleUpdate, RawTicketRow, TicketLink, TicketRecord, WindowSettings,
};

// 引擎
pub use engine::{
    LinkAggregator, RuleSet, RuleSetCache, WindowRegistry, UNCLASSIFIED_BUSINESS_UNIT,
};

// 派生流水线
pub use importer::{BatchDeriveResult, DerivationPipeline, TicketCleaner};

// API
pub use api::{DeriveApi, DeriveApiResponse, DeriveService, RuleApi, TicketApi, WindowApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "运维工单报表系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================

// ==========================================
// Merchify 降价建议 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（仅配置）
// 系统定位: 决策支持系统（降价建议由采购/运营人员最终确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "de");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 降价规则与分析
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - CSV 下载
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DqLevel, DuplicatePlanPolicy, MarkdownTier, PeriodMonth};

// 领域实体
pub use domain::{ActualRecord, PlanTarget, Recommendation};

// 引擎
pub use engine::{join, recommend_markdown, MarkdownEngine, TierThresholds};

// API
pub use api::{ApiError, MarkdownApi, MarkdownReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Merchify Preisabschriften";

// ==========================================
// Merchify 降价建议 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 与上层界面调用
// ==========================================

pub mod error;
pub mod markdown_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use markdown_api::{describe_batch, LoadedTable, MarkdownApi, MarkdownReport};

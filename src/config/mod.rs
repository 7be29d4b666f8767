// ==========================================
// Merchify 降价建议 - 配置层
// ==========================================
// 职责: 档位阈值与导入策略的读取、覆写
// 存储: config_kv 表（scope_id = 'global'）
// ==========================================

pub mod config_manager;
pub mod markdown_config_trait;

use thiserror::Error;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use markdown_config_trait::MarkdownConfigReader;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("数据库错误: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("配置值非法 ({key}): {value}")]
    InvalidValue { key: String, value: String },

    #[error("配置序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

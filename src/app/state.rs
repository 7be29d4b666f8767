// ==========================================
// Merchify 降价建议 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源和 API 实例
// 说明: 只有配置落库，分析数据随请求创建、随请求丢弃
// ==========================================

use crate::api::{ApiResult, MarkdownApi};
use crate::config::ConfigManager;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// DB 路径环境变量
pub const DB_PATH_ENV: &str = "MERCHIFY_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 分析 API
    pub markdown_api: Arc<MarkdownApi<ConfigManager>>,
}

impl AppState {
    /// 打开（或创建）配置库并组装 API
    pub fn new(db_path: String) -> ApiResult<Self> {
        let config = ConfigManager::new(&db_path)
            .with_context(|| format!("配置库无法打开: {}", db_path))?;
        info!(db_path = %db_path, "配置库已打开");

        Ok(Self {
            db_path,
            markdown_api: Arc::new(MarkdownApi::new(config)),
        })
    }

    /// 使用默认数据库路径
    pub fn with_default_path() -> ApiResult<Self> {
        Self::new(get_default_db_path())
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - MERCHIFY_DB_PATH 非空时使用该值
/// - 否则: 用户数据目录/merchify/merchify.db
/// - 无法获取用户数据目录时: ./merchify.db
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./merchify.db");

    // 尝试获取用户数据目录
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("merchify");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("merchify.db");
        }
    }

    path.to_string_lossy().into_owned()
}

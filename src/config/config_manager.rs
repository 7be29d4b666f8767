// ==========================================
// Merchify 降价建议 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 口径: 存储值非法时回退默认值并告警，不中断分析
// ==========================================

use crate::config::markdown_config_trait::MarkdownConfigReader;
use crate::config::{ConfigError, ConfigResult};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::DuplicatePlanPolicy;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = lock(&conn)?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 内存数据库（测试与一次性 CLI 调用）
    pub fn in_memory() -> ConfigResult<Self> {
        Self::from_connection(Arc::new(Mutex::new(Connection::open_in_memory()?)))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = lock(&self.conn)?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置；解析失败回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
        }
    }

    /// 写入配置（UPSERT）
    ///
    /// # 说明
    /// - 已知键会先做格式校验，非法值返回 InvalidValue
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        validate_known_key(key, value)?;

        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        debug!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 说明
    /// - 默认值与已存储值合并，已存储值优先
    /// - 键按字典序输出，结果稳定
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let mut config_map: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        {
            let conn = lock(&self.conn)?;
            let mut stmt =
                conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
            let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            for row in rows {
                let (key, value) = row?;
                config_map.insert(key, value);
            }
        }

        Ok(serde_json::to_string(&config_map)?)
    }
}

fn lock(conn: &Arc<Mutex<Connection>>) -> ConfigResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| ConfigError::LockError(e.to_string()))
}

/// 已知配置键的格式校验
fn validate_known_key(key: &str, value: &str) -> ConfigResult<()> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    match key {
        config_keys::MARKDOWN_HIGH_DELTA_WEEKS
        | config_keys::MARKDOWN_MEDIUM_DELTA_WEEKS
        | config_keys::COVERAGE_ANOMALY_WEEKS => {
            let number = value.trim().parse::<f64>().map_err(|_| invalid())?;
            if !number.is_finite() || number < 0.0 {
                return Err(invalid());
            }
        }
        config_keys::PLAN_DUPLICATE_POLICY => {
            DuplicatePlanPolicy::from_str(value).map_err(|_| invalid())?;
        }
        config_keys::UI_LOCALE => {
            if !matches!(value.trim(), "de" | "en") {
                return Err(invalid());
            }
        }
        _ => {}
    }
    Ok(())
}

// ==========================================
// MarkdownConfigReader Trait 实现
// ==========================================
#[async_trait]
impl MarkdownConfigReader for ConfigManager {
    async fn get_high_delta_weeks(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::MARKDOWN_HIGH_DELTA_WEEKS, 8.0)
    }

    async fn get_medium_delta_weeks(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::MARKDOWN_MEDIUM_DELTA_WEEKS, 4.0)
    }

    async fn get_duplicate_plan_policy(&self) -> ConfigResult<DuplicatePlanPolicy> {
        self.get_parsed_or_default(config_keys::PLAN_DUPLICATE_POLICY, DuplicatePlanPolicy::Reject)
    }

    async fn get_coverage_anomaly_weeks(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::COVERAGE_ANOMALY_WEEKS, 104.0)
    }

    async fn get_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::UI_LOCALE, "de")?;
        match value.trim() {
            "de" | "en" => Ok(value.trim().to_string()),
            other => {
                warn!(config_key = config_keys::UI_LOCALE, raw_value = other, "未知语言，使用 de");
                Ok("de".to_string())
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 档位阈值
    pub const MARKDOWN_HIGH_DELTA_WEEKS: &str = "markdown_high_delta_weeks";
    pub const MARKDOWN_MEDIUM_DELTA_WEEKS: &str = "markdown_medium_delta_weeks";

    // 导入策略
    pub const PLAN_DUPLICATE_POLICY: &str = "plan_duplicate_policy";
    pub const COVERAGE_ANOMALY_WEEKS: &str = "coverage_anomaly_weeks";

    // 界面
    pub const UI_LOCALE: &str = "ui_locale";

    /// 默认值表（快照导出用）
    pub const DEFAULTS: &[(&str, &str)] = &[
        (MARKDOWN_HIGH_DELTA_WEEKS, "8"),
        (MARKDOWN_MEDIUM_DELTA_WEEKS, "4"),
        (PLAN_DUPLICATE_POLICY, "REJECT"),
        (COVERAGE_ANOMALY_WEEKS, "104"),
        (UI_LOCALE, "de"),
    ];
}

// ==========================================
// Merchify 降价建议 - 降价配置读取 Trait
// ==========================================
// 职责: 定义引擎与导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::ConfigResult;
use crate::domain::types::DuplicatePlanPolicy;
use crate::engine::markdown::TierThresholds;
use async_trait::async_trait;
use tracing::warn;

// ==========================================
// MarkdownConfigReader Trait
// ==========================================
// 用途: 引擎与导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait MarkdownConfigReader: Send + Sync {
    // ===== 档位阈值 =====

    /// 获取高档阈值：delta 超过该周数 → HIGH
    ///
    /// # 默认值
    /// - 8
    async fn get_high_delta_weeks(&self) -> ConfigResult<f64>;

    /// 获取中档阈值：delta 超过该周数（且不超过高档阈值）→ MEDIUM
    ///
    /// # 默认值
    /// - 4
    async fn get_medium_delta_weeks(&self) -> ConfigResult<f64>;

    /// 获取档位阈值组合
    ///
    /// # 说明
    /// - 阈值不一致（中档 >= 高档、负数、非有限值）时回退默认 8/4 并告警
    async fn get_tier_thresholds(&self) -> ConfigResult<TierThresholds> {
        let high = self.get_high_delta_weeks().await?;
        let medium = self.get_medium_delta_weeks().await?;

        Ok(TierThresholds::new(high, medium).unwrap_or_else(|| {
            warn!(
                high_above_weeks = high,
                medium_above_weeks = medium,
                "档位阈值配置不一致，使用默认阈值"
            );
            TierThresholds::default()
        }))
    }

    // ===== 导入策略 =====

    /// 获取计划表重复键策略
    ///
    /// # 默认值
    /// - REJECT
    async fn get_duplicate_plan_policy(&self) -> ConfigResult<DuplicatePlanPolicy>;

    /// 获取 Reichweite 异常上限（周）
    ///
    /// # 默认值
    /// - 104
    async fn get_coverage_anomaly_weeks(&self) -> ConfigResult<f64>;

    // ===== 界面 =====

    /// 获取消息语言（de / en）
    async fn get_locale(&self) -> ConfigResult<String>;
}

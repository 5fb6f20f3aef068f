//! Account usage as reported by the usage endpoint.

use serde::{Deserialize, Serialize};

/// Page counters and quotas of the account behind the API key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageInfo {
    pub current_page_count: u64,
    pub current_page_count_low_cost: u64,
    pub current_page_count_form: u64,
    pub current_page_count_high_quality: u64,
    pub current_page_count_native_text: u64,
    pub current_page_count_excel: u64,
    pub daily_quota: i64,
    pub monthly_quota: i64,
    pub overage_page_count: u64,
    pub subscription_plan: String,
    pub today_page_count: u64,
    /// Counters added by newer server versions.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

/// 國家清單中的一筆資料，來源格式為 `{label, value}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "label")]
    pub name: String,
    #[serde(rename = "value")]
    pub code: String,
}

impl Country {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// 訂閱目錄 API 回傳的原始方案，欄位都可能缺漏
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlan {
    #[serde(default, deserialize_with = "whole_number")]
    pub period_length_in_months: Option<i64>,
    pub is_family_plan: Option<bool>,
    #[serde(default, deserialize_with = "whole_number")]
    pub price_in_cents: Option<i64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub trial_period_in_days: Option<i64>,
    pub plan_currency: Option<String>,
}

/// 接受 `12` 與 `12.0`，其他型別（字串、帶小數的數字）視為錯誤
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    number
        .as_i64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        })
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {}", number)))
}

/// 方案清單逐筆解析，單筆格式錯誤不影響同國其他方案
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub plus_package_view_models: Option<Vec<serde_json::Value>>,
}

impl CatalogResponse {
    /// Returns the entries that parse as [`RawPlan`] and how many were skipped.
    pub fn into_raw_plans(self) -> (Vec<RawPlan>, usize) {
        let mut skipped = 0;
        let plans: Vec<RawPlan> = self
            .plus_package_view_models
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawPlan>(entry) {
                Ok(plan) => Some(plan),
                Err(e) => {
                    tracing::debug!("Skipping malformed plan entry: {}", e);
                    skipped += 1;
                    None
                }
            })
            .collect();

        (plans, skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanType {
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "12_month")]
    TwelveMonth,
    #[serde(rename = "12_month_family")]
    TwelveMonthFamily,
}

impl PlanType {
    /// Plans with any other period length are not reported.
    pub fn classify(period_length_in_months: i64, is_family_plan: bool) -> Option<Self> {
        match (period_length_in_months, is_family_plan) {
            (1, _) => Some(PlanType::OneMonth),
            (12, false) => Some(PlanType::TwelveMonth),
            (12, true) => Some(PlanType::TwelveMonthFamily),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlanType::OneMonth => "Duolingo Premium 1 Month",
            PlanType::TwelveMonth => "Duolingo Premium 12 Months",
            PlanType::TwelveMonthFamily => "Duolingo Premium Family 12 Months",
        }
    }
}

/// 正規化後的輸出列，欄位順序即 CSV 欄位順序
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub subscription_name: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub period_length_in_months: i64,
    pub country: String,
    pub country_code: String,
    pub trial_period_in_days: i64,
    pub price: Decimal,
    pub currency: String,
}

impl SubscriptionPlan {
    pub fn from_raw(country: &Country, raw: &RawPlan) -> Option<Self> {
        let period = raw.period_length_in_months?;
        let plan_type = PlanType::classify(period, raw.is_family_plan.unwrap_or(false))?;

        Some(Self {
            subscription_name: plan_type.display_name().to_string(),
            plan_type,
            period_length_in_months: period,
            country: country.name.clone(),
            country_code: country.code.clone(),
            trial_period_in_days: raw.trial_period_in_days.unwrap_or(0),
            // 價格以分為單位，轉成兩位小數
            price: Decimal::new(raw.price_in_cents.unwrap_or(0), 2),
            currency: raw
                .plan_currency
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        })
    }
}

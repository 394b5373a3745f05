use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    #[serde(alias = "")]
    Monthly,
    Yearly,
}

/// A recurring contract (insurance, subscription, utility...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,

    /// Owning category; indexed under `idx/cat_con`
    pub category_id: Uuid,

    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub billing_interval: BillingInterval,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Month counts are stored as entered; older documents may hold
    /// negative values
    #[serde(default)]
    pub minimum_duration_months: i32,
    #[serde(default)]
    pub extension_duration_months: i32,
    #[serde(default)]
    pub notice_period_months: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_portal_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paperless_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    pub fn new(category_id: Uuid, name: impl Into<String>, start_date: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            category_id,
            name: name.into(),
            product_name: None,
            company: None,
            contract_number: None,
            customer_number: None,
            price: None,
            billing_interval: BillingInterval::Monthly,
            start_date: start_date.into(),
            end_date: None,
            minimum_duration_months: 0,
            extension_duration_months: 0,
            notice_period_months: 0,
            customer_portal_url: None,
            paperless_url: None,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}

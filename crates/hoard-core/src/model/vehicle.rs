use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An owned vehicle whose running costs are tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_insurance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            make: None,
            model: None,
            year: None,
            license_plate: None,
            purchase_date: None,
            purchase_price: None,
            purchase_mileage: None,
            target_mileage: None,
            target_months: None,
            annual_insurance: None,
            annual_tax: None,
            maintenance_factor: None,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    Service,
    Fuel,
    Insurance,
    Tax,
    Inspection,
    Tires,
    Mileage,
    Misc,
}

/// A single cost or odometer reading booked against a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[serde(rename = "type")]
    pub kind: CostType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CostEntry {
    pub fn new(vehicle_id: Uuid, kind: CostType, date: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            kind,
            description: None,
            vendor: None,
            amount: None,
            date: date.into(),
            mileage: None,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_type_wire_names() {
        let entry = CostEntry::new(Uuid::new_v4(), CostType::Tires, "2025-04-01");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "tires");
        assert!(json.get("vehicleId").is_some());
    }

    #[test]
    fn test_unknown_cost_type_is_rejected() {
        let json = r#"{"id":"4b6e2f4c-8f1e-4a53-9d2b-0c6c1f1f2a10",
            "vehicleId":"9a0d3c55-1d8b-4a5f-8c43-7f6f7d1f0e21",
            "type":"parking","date":"2025-01-01",
            "createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<CostEntry>(json).is_err());
    }
}

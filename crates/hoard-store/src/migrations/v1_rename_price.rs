//! v1: contract price field rename
//!
//! Early contract documents stored `pricePerMonth` and had no
//! `billingInterval`. This rewrites them to `price` plus an explicit
//! `"monthly"` interval.

use crate::errors::Result;
use crate::keys::{Key, USER_SCOPED_PREFIX};
use crate::kv::{KvRead, WriteTxn};
use crate::repo::records::{decode, encode};
use serde_json::{Map, Value};

pub(super) const VERSION: u64 = 1;
pub(super) const DESCRIPTION: &str = "rename pricePerMonth to price, add billingInterval default";

pub(super) fn run(txn: &mut WriteTxn<'_>) -> Result<()> {
    let mut rewritten = 0u64;
    for (key, value) in txn.scan_prefix(USER_SCOPED_PREFIX)? {
        if !matches!(Key::parse(&key), Some(Key::Contract { .. })) {
            continue;
        }
        let mut doc: Map<String, Value> = decode(&key, &value)?;
        if upgrade_contract(&mut doc) {
            txn.set(&key, &encode(&key, &doc)?)?;
            rewritten += 1;
        }
    }
    tracing::debug!(rewritten, "contract documents upgraded");
    Ok(())
}

/// Returns whether `doc` changed
fn upgrade_contract(doc: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    if let Some(price) = doc.remove("pricePerMonth") {
        doc.insert("price".to_string(), price);
        changed = true;
    }

    let needs_interval = match doc.get("billingInterval") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if needs_interval {
        doc.insert(
            "billingInterval".to_string(),
            Value::String("monthly".to_string()),
        );
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_legacy_document_is_upgraded() {
        let mut doc = object(json!({"name": "Gym", "pricePerMonth": 29.9}));
        assert!(upgrade_contract(&mut doc));
        assert_eq!(doc.get("price"), Some(&json!(29.9)));
        assert!(doc.get("pricePerMonth").is_none());
        assert_eq!(doc.get("billingInterval"), Some(&json!("monthly")));
    }

    #[test]
    fn test_empty_interval_is_defaulted() {
        let mut doc = object(json!({"price": 5, "billingInterval": ""}));
        assert!(upgrade_contract(&mut doc));
        assert_eq!(doc.get("billingInterval"), Some(&json!("monthly")));
    }

    #[test]
    fn test_current_document_is_untouched() {
        let mut doc = object(json!({"price": 120, "billingInterval": "yearly"}));
        assert!(!upgrade_contract(&mut doc));
        assert_eq!(doc.get("billingInterval"), Some(&json!("yearly")));
    }
}

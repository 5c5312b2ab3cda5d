//! Commission table value object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::product::ProductType;

/// Per-category platform commission percentages (0-100).
///
/// Always passed explicitly: callers own fetching the "current" and "new"
/// tables, nothing here reads ambient state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionTable {
    rates: BTreeMap<ProductType, f64>,
}

impl CommissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, product_type: ProductType, percent: f64) -> Self {
        self.set(product_type, percent);
        self
    }

    pub fn set(&mut self, product_type: ProductType, percent: f64) {
        self.rates.insert(product_type, percent);
    }

    /// The stored percentage for a type, if the table carries an entry for it.
    pub fn get(&self, product_type: ProductType) -> Option<f64> {
        self.rates.get(&product_type).copied()
    }

    /// Build a table from an admin settings payload. Unknown keys are ignored
    /// and non-numeric values are coerced to zero at this ingestion boundary
    /// rather than rejected.
    pub fn from_payload(payload: &JsonValue) -> Self {
        let mut table = Self::default();
        if let Some(entries) = payload.as_object() {
            for (key, value) in entries {
                if let Some(product_type) = ProductType::from_label(key) {
                    table.set(product_type, value.as_f64().unwrap_or(0.0));
                }
            }
        }
        table
    }

    /// Product types whose effective percentage differs between `old` and
    /// `self`. Missing entries count as zero. Exact numeric inequality by
    /// design: values are administrator-entered, there is no float drift to
    /// tolerate.
    pub fn changed_types(&self, old: &Self) -> Vec<ProductType> {
        ProductType::ALL
            .into_iter()
            .filter(|pt| old.get(*pt).unwrap_or(0.0) != self.get(*pt).unwrap_or(0.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_tables_produce_no_changes() {
        let table = CommissionTable::new()
            .with_rate(ProductType::Gold, 5.0)
            .with_rate(ProductType::Silver, 3.0);
        assert!(table.changed_types(&table.clone()).is_empty());
    }

    #[test]
    fn changed_and_added_entries_are_reported() {
        let old = CommissionTable::new()
            .with_rate(ProductType::Gold, 5.0)
            .with_rate(ProductType::Silver, 3.0);
        let new = CommissionTable::new()
            .with_rate(ProductType::Gold, 7.5)
            .with_rate(ProductType::Silver, 3.0)
            .with_rate(ProductType::Gemstone, 8.0);

        let changed = new.changed_types(&old);
        assert_eq!(changed, vec![ProductType::Gold, ProductType::Gemstone]);
    }

    #[test]
    fn removed_entry_counts_as_change_to_zero() {
        let old = CommissionTable::new().with_rate(ProductType::Diamonds, 4.0);
        let new = CommissionTable::new();
        assert_eq!(new.changed_types(&old), vec![ProductType::Diamonds]);
    }

    #[test]
    fn explicit_zero_equals_missing_entry() {
        let old = CommissionTable::new().with_rate(ProductType::Imitation, 0.0);
        let new = CommissionTable::new();
        assert!(new.changed_types(&old).is_empty());
    }

    #[test]
    fn payload_values_are_coerced_not_rejected() {
        let table = CommissionTable::from_payload(&json!({
            "Gold": 5,
            "silver": 2.5,
            "Diamonds": "not a number",
            "storeName": "Aurum & Co",
        }));

        assert_eq!(table.get(ProductType::Gold), Some(5.0));
        assert_eq!(table.get(ProductType::Silver), Some(2.5));
        assert_eq!(table.get(ProductType::Diamonds), Some(0.0));
        assert_eq!(table.get(ProductType::Gemstone), None);
    }

    #[test]
    fn non_object_payload_yields_empty_table() {
        let table = CommissionTable::from_payload(&json!(["Gold", 5]));
        assert_eq!(table, CommissionTable::new());
    }
}

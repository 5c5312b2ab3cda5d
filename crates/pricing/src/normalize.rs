//! Boundary adapter: raw catalog documents → canonical [`Product`] records.
//!
//! Catalog documents are schemaless JSON written by several generations of the
//! admin console: the type label lives in `productType` or legacy
//! `product_type`, gold/platinum weight in `goldWeight` with a generic
//! `weight` fallback, and so on. Every one of those fallback chains lives
//! here, once, so the pricing logic downstream sees a single typed record.

use serde_json::Value as JsonValue;

use crate::product::{DiamondLine, MetalKind, Product, ProductType};

/// Read a numeric field, treating absent or non-numeric values as zero.
fn num(doc: &JsonValue, key: &str) -> f64 {
    doc.get(key).and_then(JsonValue::as_f64).unwrap_or(0.0)
}

fn text<'a>(doc: &'a JsonValue, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(JsonValue::as_str)
}

fn flag(doc: &JsonValue, key: &str) -> bool {
    doc.get(key).and_then(JsonValue::as_bool).unwrap_or(false)
}

/// Resolve the product type from the label fields (either casing of either
/// field name), falling back to the legacy `hasGold`/`hasSilver` flags when
/// the label is missing or unrecognized.
pub fn resolve_product_type(doc: &JsonValue) -> Option<ProductType> {
    let labeled = text(doc, "productType")
        .and_then(ProductType::from_label)
        .or_else(|| text(doc, "product_type").and_then(ProductType::from_label));
    if labeled.is_some() {
        return labeled;
    }

    if flag(doc, "hasGold") {
        Some(ProductType::Gold)
    } else if flag(doc, "hasSilver") {
        Some(ProductType::Silver)
    } else {
        None
    }
}

/// Normalize one raw catalog document. Returns `None` when no product type
/// can be resolved; such documents are never priced.
pub fn normalize_product(doc: &JsonValue) -> Option<Product> {
    let product_type = resolve_product_type(doc)?;

    // Platinum shares the gold field names; silver has its own.
    let (weight_key, rate_key, purity_key) = match product_type.metal() {
        Some(MetalKind::Silver) => ("silverWeight", "silverRatePerGram", "silverPurity"),
        _ => ("goldWeight", "goldRatePerGram", "goldPurity"),
    };

    let metal_weight = doc
        .get(weight_key)
        .and_then(JsonValue::as_f64)
        .or_else(|| doc.get("weight").and_then(JsonValue::as_f64))
        .unwrap_or(0.0);
    let purity = text(doc, purity_key)
        .or_else(|| text(doc, "purity"))
        .unwrap_or("24kt")
        .to_string();

    let diamonds = doc
        .get("diamonds")
        .and_then(JsonValue::as_array)
        .map(|lines| lines.iter().map(normalize_diamond_line).collect())
        .unwrap_or_default();

    Some(Product {
        product_type,
        metal_weight,
        purity,
        stored_rate_per_gram: num(doc, rate_key),
        making_charge_per_gram: num(doc, "makingChargePerGram"),
        other_charges: num(doc, "otherCharges"),
        less_stone_weight: num(doc, "lessStoneWeight"),
        diamonds,
        diamonds_price: num(doc, "diamondsPrice"),
        gemstone_price: num(doc, "gemstonePrice"),
        platform_commission_rate: num(doc, "platformCommissionRate"),
    })
}

fn normalize_diamond_line(line: &JsonValue) -> DiamondLine {
    DiamondLine {
        diamond_price: num(line, "diamondPrice"),
        diamond_weight: num(line, "diamondWeight"),
        metal_type: text(line, "metalType").and_then(MetalKind::from_label),
        metal_purity: text(line, "metalPurity").map(str::to_string),
        metal_weight: num(line, "metalWeight"),
        making_charges: num(line, "makingCharges"),
        custom_metal_rate: num(line, "customMetalRate"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_type_from_either_field_any_casing() {
        assert_eq!(
            resolve_product_type(&json!({"productType": "Gold"})),
            Some(ProductType::Gold)
        );
        assert_eq!(
            resolve_product_type(&json!({"product_type": "gold"})),
            Some(ProductType::Gold)
        );
        assert_eq!(
            resolve_product_type(&json!({"productType": "bronze", "product_type": "SILVER"})),
            Some(ProductType::Silver)
        );
        assert_eq!(resolve_product_type(&json!({})), None);
    }

    #[test]
    fn boolean_flags_back_stop_a_missing_label() {
        assert_eq!(
            resolve_product_type(&json!({"hasGold": true})),
            Some(ProductType::Gold)
        );
        assert_eq!(
            resolve_product_type(&json!({"hasSilver": true})),
            Some(ProductType::Silver)
        );
        // An intelligible label wins over the flags.
        assert_eq!(
            resolve_product_type(&json!({"productType": "Gemstone", "hasGold": true})),
            Some(ProductType::Gemstone)
        );
    }

    #[test]
    fn gold_weight_falls_back_to_generic_weight() {
        let from_specific = normalize_product(&json!({
            "productType": "Gold",
            "goldWeight": 12.5,
            "weight": 99.0,
        }))
        .unwrap();
        assert_eq!(from_specific.metal_weight, 12.5);

        let from_generic = normalize_product(&json!({
            "productType": "Gold",
            "weight": 10.0,
        }))
        .unwrap();
        assert_eq!(from_generic.metal_weight, 10.0);
    }

    #[test]
    fn silver_uses_its_own_field_names() {
        let product = normalize_product(&json!({
            "productType": "Silver",
            "silverWeight": 20.0,
            "silverRatePerGram": 85.0,
            "silverPurity": "80%",
            "goldWeight": 5.0,
            "goldRatePerGram": 6000.0,
        }))
        .unwrap();

        assert_eq!(product.metal_weight, 20.0);
        assert_eq!(product.stored_rate_per_gram, 85.0);
        assert_eq!(product.purity, "80%");
    }

    #[test]
    fn platinum_shares_gold_field_names() {
        let product = normalize_product(&json!({
            "productType": "Platinum",
            "goldWeight": 3.0,
            "goldRatePerGram": 3200.0,
        }))
        .unwrap();

        assert_eq!(product.metal_weight, 3.0);
        assert_eq!(product.stored_rate_per_gram, 3200.0);
    }

    #[test]
    fn missing_and_non_numeric_fields_default_to_zero() {
        let product = normalize_product(&json!({
            "productType": "Gold",
            "goldRatePerGram": "six thousand",
            "makingChargePerGram": null,
        }))
        .unwrap();

        assert_eq!(product.metal_weight, 0.0);
        assert_eq!(product.stored_rate_per_gram, 0.0);
        assert_eq!(product.making_charge_per_gram, 0.0);
        assert_eq!(product.other_charges, 0.0);
        assert_eq!(product.purity, "24kt");
    }

    #[test]
    fn diamond_lines_are_normalized_with_defaults() {
        let product = normalize_product(&json!({
            "productType": "Diamonds",
            "diamondsPrice": 1000.0,
            "diamonds": [
                {
                    "diamondPrice": 15000.0,
                    "diamondWeight": 1.2,
                    "metalType": "gold",
                    "metalPurity": "22kt",
                    "metalWeight": 5.0,
                    "makingCharges": 300.0,
                    "customMetalRate": 6000.0,
                },
                { "diamondPrice": "bad" },
            ],
        }))
        .unwrap();

        assert_eq!(product.diamonds_price, 1000.0);
        assert_eq!(product.diamonds.len(), 2);
        assert_eq!(product.diamonds[0].metal_type, Some(MetalKind::Gold));
        assert_eq!(product.diamonds[0].metal_purity.as_deref(), Some("22kt"));
        assert_eq!(product.diamonds[1], DiamondLine::default());
    }

    #[test]
    fn normalized_worked_example_prices_end_to_end() {
        let product = normalize_product(&json!({
            "productType": "Gold",
            "weight": 10.0,
            "goldRatePerGram": 6000.0,
            "purity": "24kt",
            "makingChargePerGram": 500.0,
            "otherCharges": 200.0,
        }))
        .unwrap();

        let price = crate::derive_price(&product, &crate::RateOverrides::commission(10.0));
        assert_eq!(price, 71_700.0);
    }
}

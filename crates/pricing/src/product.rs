//! Canonical product records.
//!
//! Raw catalog documents are schemaless JSON with legacy field aliases; the
//! [`crate::normalize`] adapter folds them into these typed records once, at
//! the boundary, so the pricing logic never deals with optional-field
//! fallback chains.

use serde::{Deserialize, Serialize};

/// Product category. Selects which pricing branch applies; exactly one branch
/// is taken per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductType {
    Gold,
    Silver,
    Platinum,
    Diamonds,
    Gemstone,
    Imitation,
}

impl ProductType {
    pub const ALL: [ProductType; 6] = [
        ProductType::Gold,
        ProductType::Silver,
        ProductType::Platinum,
        ProductType::Diamonds,
        ProductType::Gemstone,
        ProductType::Imitation,
    ];

    /// Canonical display label, as written by the current admin console.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Gold => "Gold",
            ProductType::Silver => "Silver",
            ProductType::Platinum => "Platinum",
            ProductType::Diamonds => "Diamonds",
            ProductType::Gemstone => "Gemstone",
            ProductType::Imitation => "Imitation",
        }
    }

    /// Parse a stored type label. Case-insensitive: legacy documents carry
    /// inconsistent casing across the `productType` and `product_type` fields.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(ProductType::Gold),
            "silver" => Some(ProductType::Silver),
            "platinum" => Some(ProductType::Platinum),
            "diamonds" => Some(ProductType::Diamonds),
            "gemstone" => Some(ProductType::Gemstone),
            "imitation" => Some(ProductType::Imitation),
            _ => None,
        }
    }

    /// The intrinsic metal priced by the default branch, if any.
    pub fn metal(&self) -> Option<MetalKind> {
        match self {
            ProductType::Gold => Some(MetalKind::Gold),
            ProductType::Silver => Some(MetalKind::Silver),
            ProductType::Platinum => Some(MetalKind::Platinum),
            _ => None,
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Metal carried by a product or by an individual diamond line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetalKind {
    Gold,
    Silver,
    Platinum,
}

impl MetalKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gold" => Some(MetalKind::Gold),
            "silver" => Some(MetalKind::Silver),
            "platinum" => Some(MetalKind::Platinum),
            _ => None,
        }
    }
}

/// One embedded diamond entry. A line may carry its own metal setting
/// (`metal_type` plus the per-line metal fields) when a Diamonds-type product
/// is priced from its settings rather than a single top-level metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiamondLine {
    /// Precomputed currency value for the stone itself.
    pub diamond_price: f64,
    /// Carats; subtracted from gold/platinum metal weight to get net weight.
    pub diamond_weight: f64,
    pub metal_type: Option<MetalKind>,
    pub metal_purity: Option<String>,
    pub metal_weight: f64,
    /// Making charge per gram for this line's metal.
    pub making_charges: f64,
    /// Rate per gram used when no call-time override covers this line's metal.
    pub custom_metal_rate: f64,
}

impl Default for DiamondLine {
    fn default() -> Self {
        Self {
            diamond_price: 0.0,
            diamond_weight: 0.0,
            metal_type: None,
            metal_purity: None,
            metal_weight: 0.0,
            making_charges: 0.0,
            custom_metal_rate: 0.0,
        }
    }
}

/// Canonical, fully-defaulted product record. All numeric fields are zero when
/// absent from the source document; `purity` defaults to `"24kt"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_type: ProductType,
    /// Grams of the product's intrinsic metal (type-specific field with a
    /// generic `weight` fallback in the raw document).
    pub metal_weight: f64,
    /// Raw purity token (`"24kt"`, `"22"`, `"91.6"`, ...), resolved lazily by
    /// [`crate::purity::purity_fraction`].
    pub purity: String,
    /// The product's own stored rate per gram at 100% purity.
    pub stored_rate_per_gram: f64,
    pub making_charge_per_gram: f64,
    /// Flat add-on, applied after commission.
    pub other_charges: f64,
    /// Extra stone weight deducted from gold/platinum net weight.
    pub less_stone_weight: f64,
    pub diamonds: Vec<DiamondLine>,
    /// Flat diamonds value fallback, added on top of per-line prices.
    pub diamonds_price: f64,
    pub gemstone_price: f64,
    /// Percentage (0-100) markup on the computed base value.
    pub platform_commission_rate: f64,
}

impl Product {
    /// An all-zero record of the given type; fields are filled in by the
    /// normalization adapter or by tests.
    pub fn empty(product_type: ProductType) -> Self {
        Self {
            product_type,
            metal_weight: 0.0,
            purity: "24kt".to_string(),
            stored_rate_per_gram: 0.0,
            making_charge_per_gram: 0.0,
            other_charges: 0.0,
            less_stone_weight: 0.0,
            diamonds: Vec::new(),
            diamonds_price: 0.0,
            gemstone_price: 0.0,
            platform_commission_rate: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for product_type in ProductType::ALL {
            assert_eq!(ProductType::from_label(product_type.label()), Some(product_type));
        }
    }

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(ProductType::from_label("gold"), Some(ProductType::Gold));
        assert_eq!(ProductType::from_label("GOLD"), Some(ProductType::Gold));
        assert_eq!(ProductType::from_label(" gemstone "), Some(ProductType::Gemstone));
        assert_eq!(ProductType::from_label("bronze"), None);
    }

    #[test]
    fn only_metal_types_carry_a_metal() {
        assert_eq!(ProductType::Gold.metal(), Some(MetalKind::Gold));
        assert_eq!(ProductType::Silver.metal(), Some(MetalKind::Silver));
        assert_eq!(ProductType::Platinum.metal(), Some(MetalKind::Platinum));
        assert_eq!(ProductType::Diamonds.metal(), None);
        assert_eq!(ProductType::Gemstone.metal(), None);
        assert_eq!(ProductType::Imitation.metal(), None);
    }

    #[test]
    fn empty_product_defaults_to_full_purity_token() {
        let product = Product::empty(ProductType::Gold);
        assert_eq!(product.purity, "24kt");
        assert_eq!(product.metal_weight, 0.0);
        assert!(product.diamonds.is_empty());
    }
}

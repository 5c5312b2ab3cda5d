//! Price derivation.
//!
//! [`derive_price`] is a pure, total function over defensively-defaulted
//! inputs: it never panics and never returns a negative value for well-formed
//! (non-negative) catalog data. Exactly one branch applies per product type.

use crate::product::{MetalKind, Product, ProductType};
use crate::purity::purity_fraction;

/// Call-time rate overrides. Absent fields fall back to the product's own
/// stored rate fields. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateOverrides {
    /// Currency per gram at 100% purity.
    pub gold_rate: Option<f64>,
    pub silver_rate: Option<f64>,
    pub platinum_rate: Option<f64>,
    /// Percentage (0-100).
    pub platform_commission_rate: Option<f64>,
}

impl RateOverrides {
    /// Override only the commission rate; metal rates stay as stored. This is
    /// what commission propagation passes per product.
    pub fn commission(percent: f64) -> Self {
        Self {
            platform_commission_rate: Some(percent),
            ..Self::default()
        }
    }

    fn metal_rate(&self, metal: MetalKind) -> Option<f64> {
        match metal {
            MetalKind::Gold => self.gold_rate,
            MetalKind::Silver => self.silver_rate,
            MetalKind::Platinum => self.platinum_rate,
        }
    }
}

/// Derive the sell price for a product.
///
/// Branch priority: gemstone/imitation flat value, then diamonds (with or
/// without per-line metal settings), then the gold/silver/platinum metal
/// computation. Commission is a percentage markup on the branch's base value;
/// `other_charges` is added after commission, commission-free.
pub fn derive_price(product: &Product, overrides: &RateOverrides) -> f64 {
    let commission_rate = overrides
        .platform_commission_rate
        .unwrap_or(product.platform_commission_rate);

    match product.product_type {
        ProductType::Gemstone | ProductType::Imitation => {
            let base = product.gemstone_price;
            base + commission(base, commission_rate)
        }
        ProductType::Diamonds => price_diamonds(product, overrides, commission_rate),
        ProductType::Gold | ProductType::Silver | ProductType::Platinum => {
            price_metal(product, overrides, commission_rate)
        }
    }
}

/// Commission markup on a base value. A non-positive rate means no markup.
fn commission(base: f64, rate_percent: f64) -> f64 {
    if rate_percent > 0.0 {
        base * rate_percent / 100.0
    } else {
        0.0
    }
}

fn price_diamonds(product: &Product, overrides: &RateOverrides, commission_rate: f64) -> f64 {
    let diamond_value: f64 = product.diamonds.iter().map(|line| line.diamond_price).sum::<f64>()
        + product.diamonds_price;

    if !product.diamonds.iter().any(|line| line.metal_type.is_some()) {
        return diamond_value + commission(diamond_value, commission_rate);
    }

    // At least one line carries its own metal setting: price each such line's
    // metal and per-line making charges on top of the stone values.
    let mut metal_value = 0.0;
    for line in &product.diamonds {
        let Some(metal) = line.metal_type else { continue };
        let rate = overrides.metal_rate(metal).unwrap_or(line.custom_metal_rate);
        let purity = purity_fraction(line.metal_purity.as_deref().unwrap_or("24kt"));
        metal_value += line.metal_weight * rate * purity;
        metal_value += line.metal_weight * line.making_charges;
    }

    let base = metal_value + diamond_value;
    base + commission(base, commission_rate)
}

fn price_metal(product: &Product, overrides: &RateOverrides, commission_rate: f64) -> f64 {
    let Some(metal) = product.product_type.metal() else {
        // Only reachable from the metal branch; guard keeps the function total.
        return 0.0;
    };
    let rate = overrides.metal_rate(metal).unwrap_or(product.stored_rate_per_gram);

    // Gold and platinum are priced on net weight: gross minus embedded stone
    // carats and lessStoneWeight, floored at zero. Silver is priced on gross
    // weight; existing silver catalogs rely on that figure, so the asymmetry
    // stays.
    let carat_weight: f64 = product.diamonds.iter().map(|line| line.diamond_weight).sum();
    let weight = if metal == MetalKind::Silver {
        product.metal_weight
    } else {
        (product.metal_weight - carat_weight - product.less_stone_weight).max(0.0)
    };

    let metal_value = weight * rate * purity_fraction(&product.purity);
    let making_charges = weight * product.making_charge_per_gram;
    let diamond_value: f64 = product.diamonds.iter().map(|line| line.diamond_price).sum();

    let base = metal_value + making_charges + diamond_value;
    base + commission(base, commission_rate) + product.other_charges
}

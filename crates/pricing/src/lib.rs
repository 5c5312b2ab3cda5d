//! `aurum-pricing` — pure pricing domain for the jewelry catalog.
//!
//! This crate contains business rules only, implemented as deterministic
//! domain logic (no IO, no HTTP, no storage): purity resolution, the canonical
//! product record, the commission table value object, price derivation, and
//! the boundary adapter that normalizes raw catalog documents.

pub mod commission;
pub mod derive;
pub mod normalize;
pub mod product;
pub mod purity;

pub use commission::CommissionTable;
pub use derive::{RateOverrides, derive_price};
pub use normalize::{normalize_product, resolve_product_type};
pub use product::{DiamondLine, MetalKind, Product, ProductType};
pub use purity::purity_fraction;

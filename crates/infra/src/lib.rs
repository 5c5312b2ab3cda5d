//! Infrastructure layer: storage and cache collaborators, commission
//! propagation, and the settings-update entry point.

pub mod cache;
pub mod propagation;
pub mod settings;
pub mod store;

pub use cache::{CacheError, CacheInvalidator, RecordingCacheInvalidator};
pub use propagation::{CommissionPropagator, PropagationConfig, PropagationReport, WriteFailure};
pub use settings::{InMemorySettingsStore, SettingsService, SettingsStore};
pub use store::{InMemoryProductStore, ProductDocument, ProductStore, StoreError};

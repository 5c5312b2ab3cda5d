//! Settings-update entry point.
//!
//! The admin settings form submits a payload carrying the commission table.
//! The table is normalized and persisted first; propagation then runs against
//! the diff. The caller gets the persisted table back regardless of how many
//! per-product writes succeeded — propagation problems are logged, not
//! surfaced.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use aurum_pricing::CommissionTable;

use crate::cache::CacheInvalidator;
use crate::propagation::CommissionPropagator;
use crate::store::{ProductStore, StoreError};

/// Persistence for the commission table (settings subsystem collaborator).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_commissions(&self) -> Result<Option<CommissionTable>, StoreError>;
    async fn save_commissions(&self, table: &CommissionTable) -> Result<(), StoreError>;
}

#[async_trait]
impl<T> SettingsStore for Arc<T>
where
    T: SettingsStore + ?Sized,
{
    async fn load_commissions(&self) -> Result<Option<CommissionTable>, StoreError> {
        (**self).load_commissions().await
    }

    async fn save_commissions(&self, table: &CommissionTable) -> Result<(), StoreError> {
        (**self).save_commissions(table).await
    }
}

/// In-memory settings store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    table: RwLock<Option<CommissionTable>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load_commissions(&self) -> Result<Option<CommissionTable>, StoreError> {
        self.table
            .read()
            .map(|table| table.clone())
            .map_err(|_| StoreError::query("settings store lock poisoned"))
    }

    async fn save_commissions(&self, table: &CommissionTable) -> Result<(), StoreError> {
        self.table
            .write()
            .map(|mut slot| *slot = Some(table.clone()))
            .map_err(|_| StoreError::write("commissions", "settings store lock poisoned"))
    }
}

/// Applies admin commission updates and triggers propagation.
pub struct SettingsService<T, S, C> {
    settings: T,
    propagator: CommissionPropagator<S, C>,
}

impl<T, S, C> SettingsService<T, S, C>
where
    T: SettingsStore,
    S: ProductStore + Clone + Send + Sync + 'static,
    C: CacheInvalidator,
{
    pub fn new(settings: T, propagator: CommissionPropagator<S, C>) -> Self {
        Self {
            settings,
            propagator,
        }
    }

    /// Apply a commission-settings payload.
    ///
    /// Non-numeric percentages are coerced to zero at this boundary. The new
    /// table is persisted before propagation; the persisted table is returned
    /// even when individual product writes fail (or the whole propagation
    /// read fails), since the settings write already succeeded.
    pub async fn update_commissions(
        &self,
        payload: &JsonValue,
    ) -> Result<CommissionTable, StoreError> {
        let new_table = CommissionTable::from_payload(payload);
        let current = self.settings.load_commissions().await?.unwrap_or_default();
        self.settings.save_commissions(&new_table).await?;

        match self.propagator.propagate(&current, &new_table).await {
            Ok(report) => info!(
                matched = report.matched,
                applied = report.applied_count(),
                skipped = report.skipped,
                failed = report.failures.len(),
                "commission propagation finished"
            ),
            Err(err) => warn!(error = %err, "commission propagation aborted"),
        }

        Ok(new_table)
    }
}

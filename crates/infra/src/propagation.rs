//! Commission-change propagation.
//!
//! When an administrator changes the commission table, every product whose
//! category sits in a changed bucket must be re-priced in the store of record
//! and the dependent read caches invalidated. The run is eventually consistent
//! within itself: readers may observe a mix of old and new prices while the
//! wave is in flight, but once [`CommissionPropagator::propagate`] returns,
//! every successfully written product reflects the new table.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use aurum_pricing::{CommissionTable, ProductType, RateOverrides, derive_price, normalize_product};

use crate::cache::CacheInvalidator;
use crate::store::{ProductStore, StoreError};

/// Fan-out tuning. Per-product writes run as a bounded concurrent wave with a
/// few attempts each; a product that exhausts its attempts lands in the
/// report, never aborts the batch.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// Maximum in-flight writes.
    pub max_concurrent: usize,
    /// Attempts per product (1 = no retry).
    pub max_attempts: u32,
    /// Delay between attempts.
    pub retry_delay: Duration,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 16,
            max_attempts: 3,
            retry_delay: Duration::from_millis(50),
        }
    }
}

/// A per-product write that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub product_id: String,
    pub error: String,
}

/// Outcome of one propagation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropagationReport {
    /// Documents returned by the type-label query.
    pub matched: usize,
    /// Ids whose price fields were rewritten.
    pub applied: Vec<String>,
    /// Matched documents left untouched (unresolvable type, or no entry in
    /// the new table for it).
    pub skipped: usize,
    pub failures: Vec<WriteFailure>,
}

impl PropagationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// Pending partial write for one product.
struct PriceUpdate {
    id: String,
    fields: JsonMap<String, JsonValue>,
}

/// Orchestrates re-pricing after a commission-table change.
pub struct CommissionPropagator<S, C> {
    store: S,
    cache: C,
    config: PropagationConfig,
}

impl<S, C> CommissionPropagator<S, C>
where
    S: ProductStore + Clone + Send + Sync + 'static,
    C: CacheInvalidator,
{
    pub fn new(store: S, cache: C) -> Self {
        Self::with_config(store, cache, PropagationConfig::default())
    }

    pub fn with_config(store: S, cache: C, config: PropagationConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Re-price every product whose category commission changed between `old`
    /// and `new`, persist the updated price fields, and invalidate read
    /// caches. Identical tables are a strict no-op: no reads, no writes, no
    /// invalidations.
    ///
    /// The only hard error is the batch read; per-product write failures are
    /// collected into the report.
    pub async fn propagate(
        &self,
        old: &CommissionTable,
        new: &CommissionTable,
    ) -> Result<PropagationReport, StoreError> {
        let changed = new.changed_types(old);
        if changed.is_empty() {
            debug!("commission tables identical; nothing to propagate");
            return Ok(PropagationReport::default());
        }

        let labels = matching_labels(&changed);
        let documents = self.store.find_by_type_labels(&labels).await?;
        info!(
            changed = ?changed,
            matched = documents.len(),
            "propagating commission change"
        );

        let mut report = PropagationReport {
            matched: documents.len(),
            ..PropagationReport::default()
        };

        let updated_at = Utc::now();
        let mut updates = Vec::with_capacity(documents.len());
        for document in documents {
            let Some(product) = normalize_product(&document.body) else {
                debug!(product_id = %document.id, "skipping document with unresolvable type");
                report.skipped += 1;
                continue;
            };
            let Some(rate) = new.get(product.product_type) else {
                // Matched a label the new table does not cover; leave as-is.
                debug!(product_id = %document.id, product_type = %product.product_type,
                    "skipping document with no commission entry");
                report.skipped += 1;
                continue;
            };

            let price = derive_price(&product, &RateOverrides::commission(rate));
            updates.push(PriceUpdate {
                id: document.id,
                fields: price_update_fields(price, rate, updated_at),
            });
        }

        self.apply_updates(updates, &mut report).await;
        self.invalidate_caches().await;
        Ok(report)
    }

    /// Bounded concurrent wave of partial writes; waits for every write to
    /// settle before returning.
    async fn apply_updates(&self, updates: Vec<PriceUpdate>, report: &mut PropagationReport) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = JoinSet::new();

        for update in updates {
            let semaphore = semaphore.clone();
            let store = self.store.clone();
            let max_attempts = self.config.max_attempts.max(1);
            let retry_delay = self.config.retry_delay;

            tasks.spawn(async move {
                // The semaphore is never closed; a failed acquire cannot occur.
                let _permit = semaphore.acquire_owned().await.ok();
                let mut attempt = 1;
                loop {
                    match store.update_fields(&update.id, update.fields.clone()).await {
                        Ok(()) => return (update.id, Ok(())),
                        Err(err) if attempt < max_attempts => {
                            warn!(product_id = %update.id, attempt, error = %err,
                                "price write failed; retrying");
                            attempt += 1;
                            tokio::time::sleep(retry_delay).await;
                        }
                        Err(err) => return (update.id, Err(err)),
                    }
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(()))) => report.applied.push(id),
                Ok((id, Err(err))) => {
                    warn!(product_id = %id, error = %err, "price write failed permanently");
                    report.failures.push(WriteFailure {
                        product_id: id,
                        error: err.to_string(),
                    });
                }
                Err(join_err) => error!(error = %join_err, "price update task panicked"),
            }
        }

        report.applied.sort();
        report.failures.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    }

    /// Invalidate the rendered paths and tags that serve product data.
    /// Failures are logged and never propagated; price correctness in the
    /// store of record outranks cache freshness.
    async fn invalidate_caches(&self) {
        for path in ["/", "/api/home"] {
            if let Err(err) = self.cache.invalidate_path(path).await {
                warn!(path, error = %err, "cache path invalidation failed");
            }
        }
        for tag in ["products", "homepage"] {
            if let Err(err) = self.cache.invalidate_tag(tag).await {
                warn!(tag, error = %err, "cache tag invalidation failed");
            }
        }
    }
}

/// Exact-match label set for the store query: canonical casing plus the
/// lower-cased duplicate, since legacy documents disagree on casing.
fn matching_labels(changed: &[ProductType]) -> Vec<String> {
    let mut labels = Vec::with_capacity(changed.len() * 2);
    for product_type in changed {
        let canonical = product_type.label().to_string();
        labels.push(canonical.to_ascii_lowercase());
        labels.push(canonical);
    }
    labels
}

/// The denormalized price field set: `price`, `subTotal`, and `totalAmount`
/// are deliberately kept in sync to the same computed value for downstream
/// display code.
fn price_update_fields(
    price: f64,
    commission_rate: f64,
    updated_at: chrono::DateTime<Utc>,
) -> JsonMap<String, JsonValue> {
    let mut fields = JsonMap::new();
    fields.insert("price".to_string(), json!(price));
    fields.insert("subTotal".to_string(), json!(price));
    fields.insert("totalAmount".to_string(), json!(price));
    fields.insert("platformCommissionRate".to_string(), json!(commission_rate));
    fields.insert("updatedAt".to_string(), json!(updated_at));
    fields
}

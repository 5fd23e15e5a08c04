//! Per-tier reconciliation: sort, fill gaps, surface overlaps

use crate::config::ReconcileConfig;
use crate::document::Document;
use crate::stats::AssemblyStats;
use crate::tier::{OverlapConflict, SortKey, Tier};
use tracing::{debug, info};

/// Sorts and tidies tiers with one fixed [`ReconcileConfig`]
#[derive(Debug, Clone, Default)]
pub struct TierReconciler {
    config: ReconcileConfig,
}

impl TierReconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Sort `tier` by start, then tidy it; returns the overlap conflicts
    pub fn reconcile(&self, tier: &mut Tier) -> Vec<OverlapConflict> {
        tier.sort(SortKey::Start);
        tier.tidy_with(&self.config)
    }

    /// Reconcile every tier of `doc` in order, counting into `stats`
    pub fn reconcile_document(
        &self,
        doc: &mut Document,
        stats: &mut AssemblyStats,
    ) -> Vec<OverlapConflict> {
        let mut conflicts = Vec::new();
        for tier in doc.iter_mut() {
            let before = tier.len();
            let found = self.reconcile(tier);
            let fillers = tier.len() - before;
            debug!(
                "Reconciled {}: {} fillers, {} overlaps",
                tier,
                fillers,
                found.len()
            );
            stats.fillers_inserted += fillers;
            stats.overlaps_detected += found.len();
            conflicts.extend(found);
        }
        if !conflicts.is_empty() {
            info!(
                "{} overlapping item pairs left in place across {} tiers",
                conflicts.len(),
                doc.len()
            );
        }
        conflicts
    }
}

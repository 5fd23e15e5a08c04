//! Fragment assembly
//!
//! Fragments are documents covering a sub-span of the full recording, one per
//! aligned chunk. [`DocumentAssembler::merge_into`] files each fragment tier
//! under `"{owner} - {tier}"` in the master document, appending to an existing
//! tier of that name or adding a new one. [`DocumentAssembler::finalize`] then
//! pins the master domain to the recording length, widens every tier to it and
//! reconciles every tier.
//!
//! Fragments of one owner must be merged in chronological order. The assembler
//! does not reorder them; reconciliation restores ordering but cannot repair
//! fragments that genuinely overlap.
//!
//! Every mutating operation takes `&mut Document`, so merges into one master
//! document are serialized by construction.

use crate::config::{AssemblyConfig, ReconcileConfig};
use crate::document::Document;
use crate::error::{DomainError, Error, Result};
use crate::reconcile::TierReconciler;
use crate::stats::AssemblyStats;
use crate::tier::OverlapConflict;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of [`DocumentAssembler::finalize`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub conflicts: Vec<OverlapConflict>,
    pub stats: AssemblyStats,
}

/// Merges fragment documents into a master document
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    config: AssemblyConfig,
    reconciler: TierReconciler,
}

impl DocumentAssembler {
    pub fn new(config: AssemblyConfig, reconcile: ReconcileConfig) -> Self {
        Self {
            config,
            reconciler: TierReconciler::new(reconcile),
        }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &TierReconciler {
        &self.reconciler
    }

    /// Name a fragment tier takes in the master document
    pub fn composed_name(&self, owner: &str, tier: &str) -> String {
        format!("{}{}{}", owner, self.config.tier_separator, tier)
    }

    /// Merge every tier of `fragment` into `master` under `owner`
    ///
    /// Items appended to an existing tier keep the fragment's order and are
    /// not re-sorted. Fails with [`Error::TierKindMismatch`] before touching
    /// `master` when a composed name already belongs to a tier of the other kind.
    pub fn merge_into(
        &self,
        master: &mut Document,
        fragment: Document,
        owner: &str,
        stats: &mut AssemblyStats,
    ) -> Result<()> {
        let names: Vec<String> = fragment
            .iter()
            .map(|tier| self.composed_name(owner, tier.name()))
            .collect();

        let mut kinds: HashMap<&str, &'static str> = master
            .iter()
            .map(|tier| (tier.name(), tier.kind_name()))
            .collect();
        for (name, tier) in names.iter().zip(fragment.iter()) {
            match kinds.get(name.as_str()) {
                Some(&expected) if expected != tier.kind_name() => {
                    return Err(Error::TierKindMismatch {
                        tier: name.clone(),
                        expected,
                        found: tier.kind_name(),
                    });
                }
                Some(_) => {}
                None => {
                    kinds.insert(name.as_str(), tier.kind_name());
                }
            }
        }

        for (name, mut tier) in names.into_iter().zip(fragment.into_tiers()) {
            let (min, max) = (tier.min(), tier.max());
            match master.tier_mut(&name) {
                Some(existing) => {
                    let moved = existing.append_all(tier)?;
                    debug!("Appended {} items onto existing tier \"{}\"", moved, name);
                    stats.items_merged += moved;
                    stats.tiers_extended += 1;
                    master.cover(min, max);
                }
                None => {
                    tier.rename(name);
                    debug!("Adding new tier {}", tier);
                    stats.items_merged += tier.len();
                    stats.tiers_created += 1;
                    master.append(tier);
                }
            }
        }

        stats.fragments_merged += 1;
        Ok(())
    }

    /// Shift `fragment` to its position in the recording, then merge it
    pub fn merge_fragment(
        &self,
        master: &mut Document,
        mut fragment: Document,
        owner: &str,
        offset: f64,
        stats: &mut AssemblyStats,
    ) -> Result<()> {
        fragment.offset(offset);
        debug!("Offset fragment of {} by {} seconds", owner, offset);
        self.merge_into(master, fragment, owner, stats)
    }

    /// Pin the master domain to `[min, max]`, widen every tier to it and reconcile
    ///
    /// Fails with a [`DomainError`] without modifying `master` when any tier
    /// reaches outside `[min, max]`.
    pub fn finalize(
        &self,
        master: &mut Document,
        min: f64,
        max: f64,
        stats: &mut AssemblyStats,
    ) -> Result<ReconciliationReport> {
        if let Some(tier) = master.iter().find(|t| t.min() < min || t.max() > max) {
            return Err(Error::Domain(DomainError {
                tier: tier.name().to_string(),
                current_min: tier.min(),
                current_max: tier.max(),
                requested_min: min,
                requested_max: max,
            }));
        }

        master.set_domain(min, max);
        for tier in master.iter_mut() {
            stats.fillers_inserted += tier.extend_with(min, max, self.reconciler.config())?;
        }
        let conflicts = self.reconciler.reconcile_document(master, stats);

        info!(
            "Finalized {} over [{}, {}]: {}",
            master,
            min,
            max,
            stats.display_string()
        );
        Ok(ReconciliationReport {
            conflicts,
            stats: stats.clone(),
        })
    }
}

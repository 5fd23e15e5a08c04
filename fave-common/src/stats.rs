//! Assembly statistics
//!
//! Counters accumulated while fragments are merged and the master document is
//! reconciled. The value is passed explicitly through the pipeline and handed
//! back to the caller; nothing is kept in global state.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Fragments merged into the master document
    pub fragments_merged: usize,
    /// Fragments skipped or failed before merging
    pub fragments_failed: usize,
    /// Tiers added to the master document
    pub tiers_created: usize,
    /// Fragment tiers appended onto an existing master tier
    pub tiers_extended: usize,
    /// Annotations carried over from fragments
    pub items_merged: usize,
    /// Filler intervals inserted by extend and tidy
    pub fillers_inserted: usize,
    /// Overlap conflicts reported by tidy
    pub overlaps_detected: usize,
}

impl AssemblyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} fragments merged, {} failed, {} tiers, {} items, {} fillers, {} overlaps",
            self.fragments_merged,
            self.fragments_failed,
            self.tiers_created,
            self.items_merged,
            self.fillers_inserted,
            self.overlaps_detected
        )
    }

    pub fn has_problems(&self) -> bool {
        self.fragments_failed > 0 || self.overlaps_detected > 0
    }
}

impl AddAssign for AssemblyStats {
    fn add_assign(&mut self, other: Self) {
        self.fragments_merged += other.fragments_merged;
        self.fragments_failed += other.fragments_failed;
        self.tiers_created += other.tiers_created;
        self.tiers_extended += other.tiers_extended;
        self.items_merged += other.items_merged;
        self.fillers_inserted += other.fillers_inserted;
        self.overlaps_detected += other.overlaps_detected;
    }
}

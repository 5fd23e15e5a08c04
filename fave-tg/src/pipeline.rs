//! Manifest-driven TextGrid assembly
//!
//! Fragment files are read and parsed concurrently, then merged one at a time
//! in manifest order, so fragments of one owner keep their chronology. A
//! fragment that is too short, unreadable or unparseable is recorded as a
//! failure and the remaining fragments still go through.

use crate::error::AssembleResult;
use crate::errorlog;
use crate::manifest::{FragmentEntry, Manifest};
use chrono::{DateTime, Utc};
use fave_common::{
    AssemblyStats, Document, DocumentAssembler, Interval, IntervalTier, OverlapConflict,
    Settings, TextGridCodec,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Fragment files read at the same time
const LOAD_WORKERS: usize = 4;

/// A manifest fragment that did not make it into the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentFailure {
    /// 1-based position in the manifest
    pub index: usize,
    pub owner: String,
    pub start: f64,
    pub end: f64,
    pub reason: String,
}

/// Summary of one assembly run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub generated_at: DateTime<Utc>,
    pub output: PathBuf,
    /// Set when a problem log was written
    pub errorlog: Option<PathBuf>,
    pub stats: AssemblyStats,
    pub conflicts: Vec<OverlapConflict>,
    pub failures: Vec<FragmentFailure>,
}

impl AssemblyReport {
    pub fn to_json(&self) -> AssembleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fragment that passed the span check, waiting to be loaded
struct Planned {
    index: usize,
    owner: String,
    start: f64,
    end: f64,
    path: PathBuf,
}

impl Planned {
    fn failure(&self, reason: impl Into<String>) -> FragmentFailure {
        FragmentFailure {
            index: self.index,
            owner: self.owner.clone(),
            start: self.start,
            end: self.end,
            reason: reason.into(),
        }
    }
}

pub struct AssemblyPipeline {
    codec: TextGridCodec,
    assembler: DocumentAssembler,
    settings: Settings,
}

impl AssemblyPipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            codec: TextGridCodec::new(settings.codec.clone()),
            assembler: DocumentAssembler::new(
                settings.assembly.clone(),
                settings.reconcile.clone(),
            ),
            settings,
        }
    }

    pub fn codec(&self) -> &TextGridCodec {
        &self.codec
    }

    /// Assemble `manifest` into `output`, writing an error log beside it when needed
    ///
    /// Fragment-level problems end up in the report. Errors are returned only
    /// for problems with the manifest as a whole or with writing the output.
    pub async fn run(&self, manifest: &Manifest, output: &Path) -> AssembleResult<AssemblyReport> {
        let mut stats = AssemblyStats::new();
        let mut failures = Vec::new();
        let min_duration = self.settings.assembly.min_fragment_duration;

        let mut planned = Vec::new();
        for (n, entry) in manifest.fragments.iter().enumerate() {
            let plan = self.plan(manifest, n + 1, entry);
            if plan.end - plan.start < min_duration {
                debug!(
                    index = plan.index,
                    owner = %plan.owner,
                    "Skipping fragment shorter than {} s",
                    min_duration
                );
                failures.push(plan.failure(format!(
                    "fragment shorter than {:.3} s",
                    min_duration
                )));
                continue;
            }
            planned.push(plan);
        }

        info!(
            fragments = planned.len(),
            skipped = failures.len(),
            "Loading fragments"
        );

        // buffered() keeps manifest order while reads overlap
        let loaded: Vec<(Planned, Result<Document, String>)> = stream::iter(planned)
            .map(|plan| {
                let codec = self.codec.clone();
                async move {
                    let parsed = match tokio::fs::read_to_string(&plan.path).await {
                        Ok(text) => codec.parse(&text).map_err(|e| e.to_string()),
                        Err(e) => Err(format!("cannot read {}: {}", plan.path.display(), e)),
                    };
                    (plan, parsed)
                }
            })
            .buffered(LOAD_WORKERS)
            .collect()
            .await;

        let mut master = Document::new();
        for (plan, parsed) in loaded {
            let merged = parsed.and_then(|fragment| {
                if plan.start + fragment.min() < 0.0
                    || plan.start + fragment.max() > manifest.duration
                {
                    return Err(format!(
                        "fragment spans [{:.3}, {:.3}] outside the recording",
                        plan.start + fragment.min(),
                        plan.start + fragment.max()
                    ));
                }
                self.assembler
                    .merge_fragment(&mut master, fragment, &plan.owner, plan.start, &mut stats)
                    .map_err(|e| e.to_string())
            });
            if let Err(reason) = merged {
                warn!(
                    index = plan.index,
                    owner = %plan.owner,
                    path = %plan.path.display(),
                    "Fragment failed: {}",
                    reason
                );
                failures.push(plan.failure(reason));
            }
        }
        failures.sort_by_key(|failure| failure.index);
        stats.fragments_failed = failures.len();

        if !manifest.styles.is_empty() {
            master.append(self.style_tier(manifest));
        }

        let report = self
            .assembler
            .finalize(&mut master, 0.0, manifest.duration, &mut stats)?;

        self.codec.write_file(&master, output)?;
        info!("Wrote {} to {}", master, output.display());

        let log = errorlog::render(output, &report.conflicts, &failures);
        let errorlog = if log.is_empty() {
            None
        } else {
            let path = errorlog::errorlog_path(output);
            tokio::fs::write(&path, log).await?;
            warn!(
                conflicts = report.conflicts.len(),
                failures = failures.len(),
                "Problems written to {}",
                path.display()
            );
            Some(path)
        };

        Ok(AssemblyReport {
            generated_at: Utc::now(),
            output: output.to_path_buf(),
            errorlog,
            stats: report.stats,
            conflicts: report.conflicts,
            failures,
        })
    }

    fn plan(&self, manifest: &Manifest, index: usize, entry: &FragmentEntry) -> Planned {
        let (start, end) = entry.span(manifest.duration);
        Planned {
            index,
            owner: entry.owner_label(),
            start,
            end,
            path: manifest.resolve(&entry.path),
        }
    }

    /// Interval tier of upper-cased style labels, clipped to the recording
    fn style_tier(&self, manifest: &Manifest) -> IntervalTier {
        let mut tier = IntervalTier::new(&self.settings.assembly.style_tier_name, 0.0, 0.0);
        for style in &manifest.styles {
            let end = style.end.min(manifest.duration);
            if end > style.start {
                tier.append(Interval::new(style.start, end, style.text.to_uppercase()));
            } else {
                warn!(
                    start = style.start,
                    end = style.end,
                    text = %style.text,
                    "Dropping style entry that starts at or after the recording end ({} s)",
                    manifest.duration
                );
            }
        }
        tier
    }
}

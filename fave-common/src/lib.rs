//! # FAVE Common Library
//!
//! TextGrid handling shared by the FAVE tools:
//! - Annotation model (intervals, points, tiers, documents)
//! - TextGrid text codec (long and short variants)
//! - Tier reconciliation (gap filling, overlap detection)
//! - Fragment assembly into a master document
//! - Configuration loading

pub mod annotation;
pub mod assemble;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod reconcile;
pub mod stats;
pub mod tier;
pub mod time;

pub use annotation::{Interval, Item, Point};
pub use assemble::{DocumentAssembler, ReconciliationReport};
pub use codec::{TextGridCodec, Variant};
pub use config::{AssemblyConfig, CodecConfig, LabelPolicy, ReconcileConfig, Settings};
pub use document::Document;
pub use error::{DomainError, Error, FormatError, Result};
pub use reconcile::TierReconciler;
pub use stats::AssemblyStats;
pub use tier::{IntervalTier, OverlapConflict, PointTier, SortKey, Tier};

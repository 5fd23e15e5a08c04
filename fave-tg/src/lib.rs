//! fave-tg library interface
//!
//! Manifest-driven assembly of aligned TextGrid fragments, used by the
//! `fave-tg` binary and by integration tests.

pub mod error;
pub mod errorlog;
pub mod manifest;
pub mod pipeline;

pub use crate::error::{AssembleError, AssembleResult};
pub use crate::manifest::{FragmentEntry, Manifest, StyleEntry};
pub use crate::pipeline::{AssemblyPipeline, AssemblyReport, FragmentFailure};

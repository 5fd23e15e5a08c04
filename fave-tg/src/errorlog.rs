//! Plain-text problem log written next to an assembled TextGrid
//!
//! ```text
//! Overlapping intervals in file out.TextGrid:
//! Interval <Interval "AY" 0.000000:1.500000> and interval <Interval "N" 1.000000:2.000000> on tier Speaker1 - phone.
//!
//! Alignment failed for the following annotation units:
//! #	beginning	end	speaker	reason
//! 3	4.000	4.020	Speaker2	fragment shorter than 0.050 s
//! ```

use crate::pipeline::FragmentFailure;
use fave_common::OverlapConflict;
use std::path::{Path, PathBuf};

/// `<output stem>.errorlog` beside `output`
pub fn errorlog_path(output: &Path) -> PathBuf {
    output.with_extension("errorlog")
}

/// Render the log; empty when there is nothing to report
pub fn render(output: &Path, conflicts: &[OverlapConflict], failures: &[FragmentFailure]) -> String {
    let mut log = String::new();
    let file_name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());

    if !conflicts.is_empty() {
        log.push_str(&format!("Overlapping intervals in file {}:\n", file_name));
        for conflict in conflicts {
            log.push_str(&format!(
                "Interval {} and interval {} on tier {}.\n",
                conflict.first, conflict.second, conflict.tier
            ));
        }
    }

    if !failures.is_empty() {
        if !log.is_empty() {
            log.push('\n');
        }
        log.push_str("Alignment failed for the following annotation units:\n");
        log.push_str("#\tbeginning\tend\tspeaker\treason\n");
        for failure in failures {
            log.push_str(&format!(
                "{}\t{:.3}\t{:.3}\t{}\t{}\n",
                failure.index, failure.start, failure.end, failure.owner, failure.reason
            ));
        }
    }

    log
}

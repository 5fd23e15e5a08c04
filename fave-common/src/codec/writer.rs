//! Long-variant TextGrid writer

use crate::config::{CodecConfig, LabelPolicy};
use crate::document::Document;
use crate::error::FormatError;
use crate::tier::Tier;
use crate::time::format_seconds;
use std::fmt::Display;

type Result<T> = std::result::Result<T, FormatError>;

/// Write `doc` in the long variant, tiers and items in stored order
pub(crate) fn write(doc: &Document, config: &CodecConfig) -> Result<String> {
    let secs = |value: f64| format_seconds(value, config.decimals);
    let mut out = String::new();

    push_line(&mut out, "File type = \"ooTextFile\"");
    push_line(&mut out, "Object class = \"TextGrid\"");
    out.push('\n');
    push_line(&mut out, format_args!("xmin = {}", secs(doc.min())));
    push_line(&mut out, format_args!("xmax = {}", secs(doc.max())));
    push_line(&mut out, "tiers? <exists>");
    push_line(&mut out, format_args!("size = {}", doc.len()));
    push_line(&mut out, "item []:");

    for (n, tier) in doc.iter().enumerate() {
        let name = quote(tier.name(), tier.name(), config.label_policy)?;
        push_line(&mut out, format_args!("\titem [{}]:", n + 1));
        push_line(&mut out, format_args!("\t\tclass = \"{}\"", tier.class_name()));
        push_line(&mut out, format_args!("\t\tname = {}", name));
        push_line(&mut out, format_args!("\t\txmin = {}", secs(tier.min())));
        push_line(&mut out, format_args!("\t\txmax = {}", secs(tier.max())));

        match tier {
            Tier::Interval(intervals) => {
                push_line(&mut out, format_args!("\t\tintervals: size = {}", intervals.len()));
                for (o, interval) in intervals.iter().enumerate() {
                    let label = quote(&interval.label, tier.name(), config.label_policy)?;
                    push_line(&mut out, format_args!("\t\t\tintervals [{}]:", o + 1));
                    push_line(&mut out, format_args!("\t\t\t\txmin = {}", secs(interval.start)));
                    push_line(&mut out, format_args!("\t\t\t\txmax = {}", secs(interval.end)));
                    push_line(&mut out, format_args!("\t\t\t\ttext = {}", label));
                }
            }
            Tier::Point(points) => {
                push_line(&mut out, format_args!("\t\tpoints: size = {}", points.len()));
                for (o, point) in points.iter().enumerate() {
                    let label = quote(&point.label, tier.name(), config.label_policy)?;
                    push_line(&mut out, format_args!("\t\t\tpoints [{}]:", o + 1));
                    push_line(&mut out, format_args!("\t\t\t\tnumber = {}", secs(point.time)));
                    push_line(&mut out, format_args!("\t\t\t\tmark = {}", label));
                }
            }
        }
    }

    Ok(out)
}

fn push_line(out: &mut String, line: impl Display) {
    out.push_str(&line.to_string());
    out.push('\n');
}

/// Wrap a label in double quotes, doubling embedded quotes
fn quote(label: &str, tier: &str, policy: LabelPolicy) -> Result<String> {
    let single_line = if label.contains(['\n', '\r']) {
        match policy {
            LabelPolicy::Reject => {
                return Err(FormatError::UnencodableLabel {
                    tier: tier.to_string(),
                    label: label.to_string(),
                })
            }
            LabelPolicy::Replace => label
                .split(['\n', '\r'])
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    } else {
        label.to_string()
    };
    Ok(format!("\"{}\"", single_line.replace('"', "\"\"")))
}

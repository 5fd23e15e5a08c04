//! Long (keyed) TextGrid variant
//!
//! ```text
//! xmin = 0
//! xmax = 2.3
//! tiers? <exists>
//! size = 1
//! item []:
//!     item [1]:
//!         class = "IntervalTier"
//!         name = "phone"
//!         xmin = 0
//!         xmax = 2.3
//!         intervals: size = 1
//!         intervals [1]:
//!             xmin = 0
//!             xmax = 2.3
//!             text = "AY1"
//! ```

use super::reader::{
    checked_interval, keyed, keyed_any, parse_count, parse_quoted, parse_seconds, LineReader,
};
use crate::annotation::Point;
use crate::config::CodecConfig;
use crate::document::Document;
use crate::error::FormatError;
use crate::tier::{IntervalTier, PointTier, Tier};

type Result<T> = std::result::Result<T, FormatError>;

/// Read the body of a long-variant file; `first` is the `xmin = ...` line
pub(crate) fn read(
    reader: &mut LineReader<'_>,
    first: (usize, &str),
    config: &CodecConfig,
) -> Result<Document> {
    let decimals = config.decimals;
    let (line, content) = first;
    let xmin = parse_seconds(line, keyed(line, content, "xmin")?, decimals)?;
    let (line, content) = reader.next_line()?;
    let xmax = parse_seconds(line, keyed(line, content, "xmax")?, decimals)?;

    let mut doc = Document::with_domain(xmin, xmax);

    let (line, content) = reader.next_line()?;
    let declared = match content.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["tiers?", "<exists>"] => {
            let (line, content) = reader.next_line()?;
            let declared = parse_count(line, keyed(line, content, "size")?)?;
            let (line, content) = reader.next_line()?;
            if !content.starts_with("item []") {
                return Err(FormatError::MissingField {
                    line,
                    field: "item []",
                    content: content.to_string(),
                });
            }
            declared
        }
        ["tiers?", "<absent>"] => 0,
        _ => {
            return Err(FormatError::MissingField {
                line,
                field: "tiers?",
                content: content.to_string(),
            })
        }
    };

    for index in 0..declared {
        // Running out of input at a tier boundary means fewer tiers than declared
        let (line, content) = reader
            .next_line()
            .map_err(|_| FormatError::TierCountMismatch {
                declared,
                actual: index,
            })?;
        if !content.starts_with("item [") {
            return Err(FormatError::MissingField {
                line,
                field: "item [n]",
                content: content.to_string(),
            });
        }
        doc.append(read_tier(reader, config)?);
    }

    let extra = reader
        .remaining()
        .filter(|content| content.starts_with("item ["))
        .count();
    if extra > 0 {
        return Err(FormatError::TierCountMismatch {
            declared,
            actual: declared + extra,
        });
    }

    Ok(doc)
}

fn read_tier(reader: &mut LineReader<'_>, config: &CodecConfig) -> Result<Tier> {
    let decimals = config.decimals;
    let (class_line, content) = reader.next_line()?;
    let class = parse_quoted(class_line, keyed(class_line, content, "class")?)?;
    let (line, content) = reader.next_line()?;
    let name = parse_quoted(line, keyed(line, content, "name")?)?;
    let (line, content) = reader.next_line()?;
    let xmin = parse_seconds(line, keyed(line, content, "xmin")?, decimals)?;
    let (line, content) = reader.next_line()?;
    let xmax = parse_seconds(line, keyed(line, content, "xmax")?, decimals)?;

    match class.as_str() {
        "IntervalTier" => {
            let (line, content) = reader.next_line()?;
            let count = parse_count(line, keyed(line, content, "intervals: size")?)?;
            let mut tier = IntervalTier::new(name, xmin, xmax);
            for _ in 0..count {
                reader.next_line()?; // "intervals [j]:"
                let (line, content) = reader.next_line()?;
                let start = parse_seconds(line, keyed(line, content, "xmin")?, decimals)?;
                let (end_line, content) = reader.next_line()?;
                let end = parse_seconds(end_line, keyed(end_line, content, "xmax")?, decimals)?;
                let (line, content) = reader.next_line()?;
                let label = parse_quoted(line, keyed(line, content, "text")?)?;
                tier.append(checked_interval(end_line, start, end, label)?);
            }
            Ok(Tier::Interval(tier))
        }
        "TextTier" | "PointTier" => {
            let (line, content) = reader.next_line()?;
            let count = parse_count(line, keyed(line, content, "points: size")?)?;
            let mut tier = PointTier::new(name, xmin, xmax);
            for _ in 0..count {
                reader.next_line()?; // "points [j]:"
                let (line, content) = reader.next_line()?;
                let time = parse_seconds(
                    line,
                    keyed_any(line, content, &["number", "time"])?,
                    decimals,
                )?;
                let (line, content) = reader.next_line()?;
                let label = parse_quoted(line, keyed_any(line, content, &["mark", "text"])?)?;
                tier.append(Point::new(time, label));
            }
            Ok(Tier::Point(tier))
        }
        _ => Err(FormatError::UnknownTierClass {
            line: class_line,
            class,
        }),
    }
}

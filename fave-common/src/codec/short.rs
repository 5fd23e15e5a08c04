//! Short (positional) TextGrid variant
//!
//! Same object graph as the long variant with the keys left out: every value
//! sits on its own line in a fixed order.

use super::reader::{checked_interval, parse_count, parse_quoted, parse_seconds, LineReader};
use crate::annotation::Point;
use crate::config::CodecConfig;
use crate::document::Document;
use crate::error::FormatError;
use crate::tier::{IntervalTier, PointTier, Tier};

type Result<T> = std::result::Result<T, FormatError>;

const TIER_CLASSES: [&str; 3] = ["\"IntervalTier\"", "\"TextTier\"", "\"PointTier\""];

/// Read the body of a short-variant file; `first` is the global xmin line
pub(crate) fn read(
    reader: &mut LineReader<'_>,
    first: (usize, &str),
    config: &CodecConfig,
) -> Result<Document> {
    let decimals = config.decimals;
    let xmin = parse_seconds(first.0, first.1, decimals)?;
    let (line, content) = reader.next_line()?;
    let xmax = parse_seconds(line, content, decimals)?;

    let mut doc = Document::with_domain(xmin, xmax);

    let (line, content) = reader.next_line()?;
    let declared = match content {
        "<exists>" => {
            let (line, content) = reader.next_line()?;
            parse_count(line, content)?
        }
        "<absent>" => 0,
        _ => {
            return Err(FormatError::MissingField {
                line,
                field: "<exists>",
                content: content.to_string(),
            })
        }
    };

    for index in 0..declared {
        let (line, content) = reader
            .next_line()
            .map_err(|_| FormatError::TierCountMismatch {
                declared,
                actual: index,
            })?;
        doc.append(read_tier(reader, (line, content), config)?);
    }

    let extra = reader
        .remaining()
        .filter(|content| TIER_CLASSES.iter().any(|class| class == content))
        .count();
    if extra > 0 {
        return Err(FormatError::TierCountMismatch {
            declared,
            actual: declared + extra,
        });
    }

    Ok(doc)
}

fn read_tier(
    reader: &mut LineReader<'_>,
    class_line: (usize, &str),
    config: &CodecConfig,
) -> Result<Tier> {
    let decimals = config.decimals;
    let class = parse_quoted(class_line.0, class_line.1)?;
    let (line, content) = reader.next_line()?;
    let name = parse_quoted(line, content)?;
    let (line, content) = reader.next_line()?;
    let xmin = parse_seconds(line, content, decimals)?;
    let (line, content) = reader.next_line()?;
    let xmax = parse_seconds(line, content, decimals)?;
    let (line, content) = reader.next_line()?;
    let count = parse_count(line, content)?;

    match class.as_str() {
        "IntervalTier" => {
            let mut tier = IntervalTier::new(name, xmin, xmax);
            for _ in 0..count {
                let (line, content) = reader.next_line()?;
                let start = parse_seconds(line, content, decimals)?;
                let (end_line, content) = reader.next_line()?;
                let end = parse_seconds(end_line, content, decimals)?;
                let (line, content) = reader.next_line()?;
                let label = parse_quoted(line, content)?;
                tier.append(checked_interval(end_line, start, end, label)?);
            }
            Ok(Tier::Interval(tier))
        }
        "TextTier" | "PointTier" => {
            let mut tier = PointTier::new(name, xmin, xmax);
            for _ in 0..count {
                let (line, content) = reader.next_line()?;
                let time = parse_seconds(line, content, decimals)?;
                let (line, content) = reader.next_line()?;
                let label = parse_quoted(line, content)?;
                tier.append(Point::new(time, label));
            }
            Ok(Tier::Point(tier))
        }
        _ => Err(FormatError::UnknownTierClass {
            line: class_line.0,
            class,
        }),
    }
}

//! Line cursor and field parsers shared by both TextGrid variants

use crate::annotation::Interval;
use crate::error::FormatError;
use crate::time::round_to;

type Result<T> = std::result::Result<T, FormatError>;

/// Cursor over the significant (non-blank) lines of a TextGrid text
///
/// Line numbers handed out are 1-based positions in the original text.
pub(crate) struct LineReader<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    /// Next significant line, or `UnexpectedEof`
    pub(crate) fn next_line(&mut self) -> Result<(usize, &'a str)> {
        match self.lines.get(self.pos) {
            Some(&line) => {
                self.pos += 1;
                Ok(line)
            }
            None => Err(FormatError::UnexpectedEof {
                line: self.last_line_number(),
            }),
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Lines not consumed yet
    pub(crate) fn remaining(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines[self.pos.min(self.lines.len())..]
            .iter()
            .map(|&(_, line)| line)
    }

    fn last_line_number(&self) -> usize {
        self.lines.last().map(|&(number, _)| number).unwrap_or(0)
    }
}

/// Parse a time value and round it
pub(crate) fn parse_seconds(line: usize, value: &str, decimals: u32) -> Result<f64> {
    let value = value.trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| round_to(v, decimals))
        .ok_or_else(|| FormatError::InvalidNumber {
            line,
            value: value.to_string(),
        })
}

/// Interval from parsed fields; `line` is the line holding the end value
pub(crate) fn checked_interval(
    line: usize,
    start: f64,
    end: f64,
    label: String,
) -> Result<Interval> {
    if end < start {
        return Err(FormatError::InvertedInterval { line, start, end });
    }
    Ok(Interval::new(start, end, label))
}

/// Parse a non-negative count
pub(crate) fn parse_count(line: usize, value: &str) -> Result<usize> {
    let value = value.trim();
    value.parse::<usize>().map_err(|_| FormatError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

/// Value of a `key = value` line; `key` is compared after trimming
pub(crate) fn keyed<'a>(line: usize, content: &'a str, key: &'static str) -> Result<&'a str> {
    keyed_any(line, content, &[key])
}

/// Value of a `key = value` line whose key is one of `keys`
pub(crate) fn keyed_any<'a>(
    line: usize,
    content: &'a str,
    keys: &[&'static str],
) -> Result<&'a str> {
    content
        .split_once('=')
        .filter(|(k, _)| keys.iter().any(|key| *key == k.trim()))
        .map(|(_, v)| v.trim())
        .ok_or_else(|| FormatError::MissingField {
            line,
            field: keys[0],
            content: content.to_string(),
        })
}

/// Unquote a label: `"abc"` → `abc`, with `""` standing for one `"`
pub(crate) fn parse_quoted(line: usize, content: &str) -> Result<String> {
    let unterminated = || FormatError::UnterminatedLabel {
        line,
        content: content.to_string(),
    };

    let trimmed = content.trim();
    let body = trimmed.strip_prefix('"').ok_or_else(unterminated)?;

    let mut label = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            label.push(c);
            continue;
        }
        let rest = chars.as_str();
        if let Some(after) = rest.strip_prefix('"') {
            label.push('"');
            chars = after.chars();
        } else if rest.trim().is_empty() {
            return Ok(label);
        } else {
            return Err(unterminated());
        }
    }
    Err(unterminated())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_skips_blank_lines_and_numbers_from_one() {
        let mut reader = LineReader::new("a\n\n  b  \r\n");
        assert_eq!(reader.next_line().unwrap(), (1, "a"));
        assert_eq!(reader.next_line().unwrap(), (3, "b"));
        assert!(reader.is_at_end());
        assert_eq!(
            reader.next_line().unwrap_err(),
            FormatError::UnexpectedEof { line: 3 }
        );
    }

    #[test]
    fn test_checked_interval_rejects_end_before_start() {
        assert_eq!(
            checked_interval(9, 0.5, 0.2, "B".to_string()).unwrap_err(),
            FormatError::InvertedInterval {
                line: 9,
                start: 0.5,
                end: 0.2
            }
        );
        let marker = checked_interval(3, 1.0, 1.0, "sp".to_string()).unwrap();
        assert_eq!(marker.duration(), 0.0);
    }

    #[test]
    fn test_parse_seconds_rounds() {
        assert_eq!(parse_seconds(1, " 1.23456 ", 3).unwrap(), 1.235);
        assert!(matches!(
            parse_seconds(7, "abc", 3),
            Err(FormatError::InvalidNumber { line: 7, .. })
        ));
        assert!(parse_seconds(1, "inf", 3).is_err());
    }

    #[test]
    fn test_keyed_values() {
        assert_eq!(keyed(1, "xmin = 0.5", "xmin").unwrap(), "0.5");
        assert_eq!(
            keyed(1, "intervals: size = 4", "intervals: size").unwrap(),
            "4"
        );
        assert_eq!(keyed(1, "text = \"a=b\"", "text").unwrap(), "\"a=b\"");
        assert!(matches!(
            keyed(2, "xmax = 1", "xmin"),
            Err(FormatError::MissingField { field: "xmin", .. })
        ));
        assert_eq!(keyed_any(1, "number = 2", &["time", "number"]).unwrap(), "2");
    }

    #[test]
    fn test_parse_quoted() {
        assert_eq!(parse_quoted(1, "\"AY1\"").unwrap(), "AY1");
        assert_eq!(parse_quoted(1, "\"\"").unwrap(), "");
        assert_eq!(parse_quoted(1, "\"say \"\"hi\"\"\"").unwrap(), "say \"hi\"");
        assert_eq!(parse_quoted(1, "\"two words\"  ").unwrap(), "two words");
    }

    #[test]
    fn test_parse_quoted_rejects_broken_labels() {
        assert!(matches!(
            parse_quoted(4, "\"open"),
            Err(FormatError::UnterminatedLabel { line: 4, .. })
        ));
        assert!(parse_quoted(4, "bare").is_err());
        assert!(parse_quoted(4, "\"a\" trailing").is_err());
    }
}

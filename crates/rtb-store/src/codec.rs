//! Text encoding of the two persisted resources.
//!
//! Entries resource, one record per line:
//!
//! ```text
//! rank,reactionTime,timestamp,code,info
//! ```
//!
//! `info` is the tail of the line and may be empty. Reserved-code resource:
//! one six-digit code per line. Both encodings end every record with `\n`;
//! an empty set encodes to the empty string.
//!
//! Decoding works on raw bytes one line at a time: a line that is not valid
//! UTF-8 is a malformed record like any other. A leading UTF-8 byte order
//! mark is ignored.

use std::collections::BTreeSet;

use rtb_types::{Code, Entry, Timestamp};
use tracing::debug;

/// Result of decoding a resource: the records that parsed, and how many
/// non-blank lines were skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded<T> {
    pub items: T,
    pub dropped: usize,
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Split a resource into `(line number, text)` pairs. Text is `None` when
/// the line is not valid UTF-8.
fn lines(bytes: &[u8]) -> impl Iterator<Item = (usize, Option<&str>)> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    bytes.split(|&b| b == b'\n').enumerate().map(|(i, raw)| {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        (i + 1, std::str::from_utf8(raw).ok())
    })
}

/// Encode entries in the order given. Callers rank before encoding.
pub fn encode_entries(entries: &[Entry]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            e.rank, e.reaction_time, e.timestamp, e.code, e.info
        ));
    }
    out
}

/// Decode the entries resource, skipping records that cannot be trusted.
///
/// A record is skipped when any of rank, reaction time, timestamp or code is
/// missing, when rank or reaction time is not a finite number, or when the
/// timestamp or code does not parse. Ranks are returned as stored; callers
/// re-rank.
pub fn decode_entries(bytes: impl AsRef<[u8]>) -> Decoded<Vec<Entry>> {
    let mut items = Vec::new();
    let mut dropped = 0;

    for (lineno, line) in lines(bytes.as_ref()) {
        let parsed = match line {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => decode_entry(line),
            None => None,
        };
        match parsed {
            Some(entry) => items.push(entry),
            None => {
                debug!(line = lineno, "skipping malformed entry record");
                dropped += 1;
            }
        }
    }

    Decoded { items, dropped }
}

fn decode_entry(line: &str) -> Option<Entry> {
    let mut fields = line.splitn(5, ',');
    let rank = fields.next().filter(|s| !s.is_empty())?;
    let reaction_time = fields.next().filter(|s| !s.is_empty())?;
    let timestamp = fields.next().filter(|s| !s.is_empty())?;
    let code = fields.next().filter(|s| !s.is_empty())?;
    let info = fields.next().unwrap_or("");

    let rank = parse_number(rank)?;
    let reaction_time = parse_number(reaction_time)?;
    let timestamp = Timestamp::parse(timestamp).ok()?;
    let code = Code::parse(code).ok()?;

    Some(Entry {
        // Stored rank is a display cache; saturating cast is enough.
        rank: rank as u32,
        reaction_time,
        timestamp,
        code,
        info: info.to_string(),
    })
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Encode a set of codes, one per line, in ascending order.
pub fn encode_codes(codes: &BTreeSet<Code>) -> String {
    let mut out = String::new();
    for code in codes {
        out.push_str(code.as_str());
        out.push('\n');
    }
    out
}

/// Decode the reserved-code resource. Lines that are not valid codes are
/// skipped; duplicates collapse.
pub fn decode_codes(bytes: impl AsRef<[u8]>) -> Decoded<BTreeSet<Code>> {
    let mut items = BTreeSet::new();
    let mut dropped = 0;

    for (lineno, line) in lines(bytes.as_ref()) {
        let parsed = match line.map(str::trim) {
            Some("") => continue,
            Some(line) => Code::parse(line).ok(),
            None => None,
        };
        match parsed {
            Some(code) => {
                items.insert(code);
            }
            None => {
                debug!(line = lineno, "skipping malformed reserved code");
                dropped += 1;
            }
        }
    }

    Decoded { items, dropped }
}

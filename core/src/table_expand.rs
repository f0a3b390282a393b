use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref RANGE_PATTERN: Regex = Regex::new(r"^([\w.]+)\[(\d+)-(\d+)\](.*)$").unwrap();
}

/// One configured table name, either a plain name or a sharding range such as
/// `orders_[00-15]`. Bounds are swapped when given in descending order, and
/// numbers are zero-padded to the width of the lower bound when it has a
/// leading zero.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TablePattern {
    Plain(String),
    Range {
        prefix: String,
        suffix: String,
        low: u64,
        high: u64,
        width: Option<usize>,
    },
}

impl TablePattern {
    fn parse(name: &str) -> Result<Self> {
        let unexpandable = || Error::Config(format!("Unexpandable table pattern: {}", name));

        let Some(caps) = RANGE_PATTERN.captures(name) else {
            if name.contains('[') || name.contains(']') {
                return Err(unexpandable());
            }
            return Ok(TablePattern::Plain(name.to_string()));
        };

        let suffix = caps[4].trim();
        if suffix.contains('[') || suffix.contains(']') {
            return Err(unexpandable());
        }

        let parse = |s: &str| {
            s.parse::<u64>()
                .map_err(|e| Error::Config(format!("Invalid range in table pattern {}: {}", name, e)))
        };
        let (mut start, mut end) = (&caps[2], &caps[3]);
        if parse(start)? > parse(end)? {
            std::mem::swap(&mut start, &mut end);
        }

        Ok(TablePattern::Range {
            prefix: caps[1].to_string(),
            suffix: suffix.to_string(),
            low: parse(start)?,
            high: parse(end)?,
            width: start.starts_with('0').then_some(start.len()),
        })
    }

    /// Number of physical tables, `None` when it does not fit in a `u64`.
    fn count(&self) -> Option<u64> {
        match self {
            TablePattern::Plain(_) => Some(1),
            TablePattern::Range { low, high, .. } => high.checked_sub(*low)?.checked_add(1),
        }
    }

    fn name_at(&self, k: u64) -> String {
        match self {
            TablePattern::Plain(name) => name.clone(),
            TablePattern::Range {
                prefix,
                suffix,
                width,
                ..
            } => match width {
                Some(width) => format!("{}{:0width$}{}", prefix, k, suffix, width = *width),
                None => format!("{}{}{}", prefix, k, suffix),
            },
        }
    }

    fn first(&self) -> String {
        match self {
            TablePattern::Plain(name) => name.clone(),
            TablePattern::Range { low, .. } => self.name_at(*low),
        }
    }

    fn names(&self) -> Vec<String> {
        match self {
            TablePattern::Plain(name) => vec![name.clone()],
            TablePattern::Range { low, high, .. } => {
                (*low..=*high).map(|k| self.name_at(k)).collect()
            }
        }
    }
}

fn parse_patterns<S: AsRef<str>>(tables: &[S]) -> Result<Vec<TablePattern>> {
    tables
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(TablePattern::parse)
        .collect()
}

/// Expands configured table entries into physical table names.
///
/// Each entry may hold several comma separated names, and a name may carry a
/// sharding range such as `orders_[00-15]`, which yields `orders_00` through
/// `orders_15`. Callers that only need a count or the first name should use
/// [`count_tables`] or [`first_table`], which never build the full list.
pub fn expand_tables<S: AsRef<str>>(tables: &[S]) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    for pattern in parse_patterns(tables)? {
        let names = pattern.names();
        debug!(pattern = ?pattern, count = names.len(), "Expanded table pattern");
        expanded.extend(names);
    }
    Ok(expanded)
}

/// Number of physical tables the entries expand to, saturating at `u64::MAX`.
pub fn count_tables<S: AsRef<str>>(tables: &[S]) -> Result<u64> {
    let mut total: u64 = 0;
    for pattern in parse_patterns(tables)? {
        total = pattern
            .count()
            .and_then(|count| total.checked_add(count))
            .unwrap_or(u64::MAX);
    }
    Ok(total)
}

/// First physical table the entries expand to, if any.
pub fn first_table<S: AsRef<str>>(tables: &[S]) -> Result<Option<String>> {
    Ok(parse_patterns(tables)?.first().map(TablePattern::first))
}

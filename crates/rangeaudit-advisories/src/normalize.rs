//! Converts OSV-style affected-range events into the interval
//! representation range-mode auditing compares against allowed envelopes.

use crate::error::AdvisoryError;
use crate::types::{VersionEvent, VersionRange};
use lazy_static::lazy_static;
use rangeaudit_version::{Operator, Specifier, Version};
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    static ref ZERO_VERSION_RE: Regex = Regex::new(r"^0(\.0)*$").unwrap();
}

/// Whether a raw version token is the PEP 440 "beginning of time" sentinel
/// OSV uses for an unbounded lower bound: `0`, `0.0`, `0.0.0`, and so on.
pub fn is_zero_version(raw: &str) -> bool {
    ZERO_VERSION_RE.is_match(raw.trim())
}

/// A union of disjoint version intervals expressing "vulnerable". Each
/// element is one half-open (or fully open) interval rendered as a
/// `Specifier`; membership in the union is membership in any one element.
pub type AffectedUnion = Vec<Specifier>;

fn build_interval_specifier(
    lower: Option<&str>,
    fixed: Option<&str>,
    last_affected: Option<&str>,
) -> Result<Specifier, AdvisoryError> {
    let mut clauses = Vec::new();
    if let Some(lo) = lower {
        if !is_zero_version(lo) {
            clauses.push(format!(">={lo}"));
        }
    }
    if let Some(fx) = fixed {
        clauses.push(format!("<{fx}"));
    } else if let Some(la) = last_affected {
        clauses.push(format!("<={la}"));
    }
    Specifier::parse(&clauses.join(","))
        .map_err(|e| AdvisoryError::MalformedRange(format!("{e}: {clauses:?}")))
}

/// Single pass over a range's events: `Introduced` opens an interval,
/// `Fixed`/`LastAffected` closes it. An `Introduced` seen while an interval
/// is already open is ignored — OSV ranges are expected to alternate, and a
/// malformed feed entry shouldn't fabricate a second disjoint interval out
/// of a single open one. An interval left open at the end of the event list
/// is unbounded above.
pub fn specifier_from_osv_range(range: &VersionRange) -> Result<AffectedUnion, AdvisoryError> {
    let mut union = Vec::new();
    let mut lower: Option<String> = None;
    let mut open = false;

    for event in &range.events {
        match event {
            VersionEvent::Introduced { introduced } => {
                if open {
                    continue;
                }
                lower = Some(introduced.clone());
                open = true;
            }
            VersionEvent::Fixed { fixed } => {
                if open {
                    union.push(build_interval_specifier(lower.as_deref(), Some(fixed), None)?);
                    open = false;
                    lower = None;
                }
            }
            VersionEvent::LastAffected { last_affected } => {
                if open {
                    union.push(build_interval_specifier(lower.as_deref(), None, Some(last_affected))?);
                    open = false;
                    lower = None;
                }
            }
        }
    }
    if open {
        union.push(build_interval_specifier(lower.as_deref(), None, None)?);
    }
    Ok(union)
}

/// Every `Fixed` event version across `ranges`, parsed, deduplicated, and
/// sorted ascending — "what do I need to upgrade to" isn't answerable from
/// the overlap result alone, since a witness list only says what's
/// vulnerable, not what stops being so.
pub fn fix_versions_from_ranges(ranges: &[VersionRange]) -> Vec<Version> {
    let mut versions: Vec<Version> = ranges
        .iter()
        .flat_map(|r| r.events.iter())
        .filter_map(|event| match event {
            VersionEvent::Fixed { fixed } => Version::parse(fixed).ok(),
            _ => None,
        })
        .collect();
    versions.sort();
    versions.dedup_by(|a, b| a.normalize() == b.normalize());
    versions
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct UpperBound {
    exclusive: bool,
    normalized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeKey(Vec<(Option<String>, Option<UpperBound>)>);

struct Interval {
    lower: Option<Version>,
    lower_normalized: Option<String>,
    upper: Option<(bool, Version, String)>,
}

fn extract_interval(specifier: &Specifier) -> Interval {
    let mut lower = None;
    let mut lower_normalized = None;
    let mut upper = None;
    for clause in specifier.clauses() {
        match clause.op() {
            Operator::Ge => {
                lower = Some(clause.version().clone());
                lower_normalized = Some(clause.version().normalize());
            }
            Operator::Lt => upper = Some((true, clause.version().clone(), clause.version().normalize())),
            Operator::Le => upper = Some((false, clause.version().clone(), clause.version().normalize())),
            _ => {}
        }
    }
    Interval {
        lower,
        lower_normalized,
        upper,
    }
}

/// Merges every interval across a set of affected unions (typically the
/// unions contributed by several advisories/ranges referring to what turns
/// out to be the same vulnerable span) into one canonical, order-independent
/// key. Used to deduplicate advisories whose ranges cover the same ground
/// but arrived from different feeds with different identifiers.
pub fn compute_range_key(unions: &[AffectedUnion]) -> RangeKey {
    let mut intervals: Vec<Interval> = unions
        .iter()
        .flat_map(|u| u.iter())
        .map(extract_interval)
        .collect();

    intervals.sort_by(|a, b| match (&a.lower, &b.lower) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    });

    let mut merged: Vec<Interval> = Vec::new();
    for interval in intervals {
        let extend_last = merged.last().map(|last| match (&last.upper, &interval.lower) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some((_, last_up, _)), Some(next_lo)) => next_lo <= last_up,
        });

        if extend_last == Some(true) {
            let last = merged.last_mut().unwrap();
            match (&last.upper, &interval.upper) {
                (None, _) => {}
                (Some(_), None) => last.upper = None,
                (Some((last_excl, last_v, _)), Some((next_excl, next_v, next_norm))) => {
                    let next_wins = next_v > last_v || (next_v == last_v && *last_excl && !next_excl);
                    if next_wins {
                        last.upper = Some((*next_excl, next_v.clone(), next_norm.clone()));
                    }
                }
            }
            continue;
        }
        merged.push(interval);
    }

    let key = merged
        .into_iter()
        .map(|iv| {
            (
                iv.lower_normalized,
                iv.upper.map(|(exclusive, _, normalized)| UpperBound { exclusive, normalized }),
            )
        })
        .collect();
    RangeKey(key)
}

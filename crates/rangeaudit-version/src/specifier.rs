//! PEP 440 specifier clauses and specifier sets.
//!
//! A [`Specifier`] is an unordered conjunction of [`Clause`]s: the allowed
//! envelope is a comma-separated clause list with no simplification step.
//! Clause matching follows
//! `packaging.specifiers.SpecifierSet`'s exclusion rules for `<` and `>`
//! rather than naive `Ord` comparison, since those operators silently
//! exclude same-base-version pre/post/local versions unless the clause
//! itself opts in.

use crate::error::VersionError;
use crate::version::Version;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Compatible,
    ArbitraryEq,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Compatible => "~=",
            Operator::ArbitraryEq => "===",
        }
    }

    fn parse(raw: &str) -> Option<Operator> {
        match raw {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "~=" => Some(Operator::Compatible),
            "===" => Some(Operator::ArbitraryEq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    op: Operator,
    version: Version,
    raw: String,
}

impl Clause {
    pub fn parse(raw: &str) -> Result<Clause, VersionError> {
        let raw = raw.trim();
        let op_len = raw
            .find(|c: char| c != '=' && c != '!' && c != '<' && c != '>' && c != '~')
            .ok_or_else(|| VersionError::InvalidSpecifier(raw.to_string()))?;
        let (op_str, version_str) = raw.split_at(op_len);
        let op = Operator::parse(op_str)
            .ok_or_else(|| VersionError::InvalidSpecifier(raw.to_string()))?;
        let version_str = version_str.trim();
        let version = if matches!(op, Operator::ArbitraryEq) {
            // `===` compares the raw string, not a parsed version; we still
            // parse it loosely so Display/roundtrip works, falling back to a
            // best-effort parse is not attempted to avoid silently accepting
            // non-PEP440 tokens outside the arbitrary-equality escape hatch.
            Version::parse(version_str).unwrap_or_else(|_| Version::arbitrary(version_str))
        } else {
            Version::parse(version_str)
                .map_err(|_| VersionError::InvalidSpecifier(raw.to_string()))?
        };
        Ok(Clause {
            op,
            version,
            raw: raw.to_string(),
        })
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether this single clause admits prerelease versions into the
    /// matched set, per PEP 440 §Handling of pre-releases: a clause whose
    /// own version is a prerelease implicitly admits prereleases.
    pub fn admits_prereleases(&self) -> bool {
        self.version.is_prerelease()
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Operator::Eq => eq_clause(&self.version, candidate),
            Operator::Ne => !eq_clause(&self.version, candidate),
            Operator::Le => le_clause(&self.version, candidate),
            Operator::Ge => ge_clause(&self.version, candidate),
            Operator::Lt => lt_clause(&self.version, candidate),
            Operator::Gt => gt_clause(&self.version, candidate),
            Operator::Compatible => compatible_clause(&self.version, candidate),
            Operator::ArbitraryEq => candidate.raw().trim() == self.version.raw().trim(),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn eq_clause(spec: &Version, candidate: &Version) -> bool {
    if spec.has_local() {
        spec == candidate
    } else {
        spec.public_eq(candidate)
    }
}

fn le_clause(spec: &Version, candidate: &Version) -> bool {
    candidate <= spec
}

fn ge_clause(spec: &Version, candidate: &Version) -> bool {
    candidate >= spec
}

/// `packaging.specifiers._compare_less_than`: plain `<` excludes
/// pre-releases and post-releases of the same base version as the
/// clause's version, unless the clause's own version is itself a
/// prerelease.
fn lt_clause(spec: &Version, candidate: &Version) -> bool {
    if candidate >= spec {
        return false;
    }
    if !spec.is_prerelease() && candidate.is_prerelease() && candidate.base_key() == spec.base_key() {
        return false;
    }
    true
}

/// `packaging.specifiers._compare_greater_than`: plain `>` excludes
/// post-releases of the same base version and any local version whose
/// base matches the clause's version, unless the clause's own version
/// is itself a postrelease.
fn gt_clause(spec: &Version, candidate: &Version) -> bool {
    if candidate <= spec {
        return false;
    }
    if !spec.is_postrelease() && candidate.is_postrelease() && candidate.base_key() == spec.base_key() {
        return false;
    }
    if candidate.has_local() && candidate.base_key() == spec.base_key() {
        return false;
    }
    true
}

/// `~=`: truncate the clause version's release to all but its last
/// segment, require the candidate's release to share that prefix, and
/// require the candidate to be `>=` the clause version.
fn compatible_clause(spec: &Version, candidate: &Version) -> bool {
    let release = spec.release();
    if release.len() < 2 {
        return false;
    }
    let prefix = &release[..release.len() - 1];
    if candidate.release().len() < prefix.len() {
        return false;
    }
    if &candidate.release()[..prefix.len()] != prefix {
        return false;
    }
    candidate >= spec
}

/// A PEP 440 specifier set: a conjunction of clauses, unsimplified, so an
/// allowed envelope can retain each constraint's own provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifier {
    clauses: Vec<Clause>,
}

impl Specifier {
    pub fn empty() -> Specifier {
        Specifier { clauses: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn from_clauses(clauses: Vec<Clause>) -> Specifier {
        Specifier { clauses }
    }

    pub fn parse(raw: &str) -> Result<Specifier, VersionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Specifier::empty());
        }
        let clauses = raw
            .split(',')
            .map(|part| Clause::parse(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Specifier { clauses })
    }

    /// A candidate version satisfies the envelope iff every clause matches.
    /// An empty envelope admits everything: no clause means no constraint.
    pub fn contains(&self, candidate: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(candidate))
    }

    pub fn admits_prereleases(&self) -> bool {
        self.clauses.iter().any(|clause| clause.admits_prereleases())
    }

    /// Intersection is the union of clause lists, not arithmetic
    /// simplification: the caller's `contains` already treats an AND of
    /// clauses correctly, and keeping clauses unsimplified is what lets
    /// each constraint's provenance stay legible in `PackageNode`. "Union
    /// of clause lists" is a set
    /// union, though: an exact-duplicate clause contributes nothing new,
    /// so it is skipped rather than appended again. Without this, adding
    /// the same constraint to a node a second time (e.g. two paths
    /// re-deriving an identical transitive requirement) would make the
    /// envelope's displayed form grow even though its admitted-version set
    /// is unchanged, and `PackageNode::add_constraint` would report a
    /// spurious "changed" on every repeat.
    pub fn intersect(&self, other: &Specifier) -> Specifier {
        let mut clauses = self.clauses.clone();
        for clause in &other.clauses {
            if !clauses.contains(clause) {
                clauses.push(clause.clone());
            }
        }
        Specifier { clauses }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join(","))
    }
}

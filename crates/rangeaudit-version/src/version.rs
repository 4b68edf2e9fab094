//! PEP 440 version parsing and total ordering.
//!
//! The parsing grammar is the one published at the bottom of PEP 440; the
//! ordering is the `_cmpkey` algorithm from `packaging.version`, reimplemented
//! here with explicit sentinel bounds instead of the sentinel objects Python
//! uses, so that `Version` gets a real `Ord` impl.

use crate::error::VersionError;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(
        r#"(?xi)
        ^\s*v?
        (?:
            (?:(?P<epoch>[0-9]+)!)?
            (?P<release>[0-9]+(?:\.[0-9]+)*)
            (?P<pre>
                [-_\.]?
                (?P<pre_l>alpha|beta|preview|pre|a|b|c|rc)
                [-_\.]?
                (?P<pre_n>[0-9]+)?
            )?
            (?P<post>
                (?:-(?P<post_n1>[0-9]+))
                |
                (?:
                    [-_\.]?
                    (?P<post_l>post|rev|r)
                    [-_\.]?
                    (?P<post_n2>[0-9]+)?
                )
            )?
            (?P<dev>
                [-_\.]?
                (?P<dev_l>dev)
                [-_\.]?
                (?P<dev_n>[0-9]+)?
            )?
        )
        (?:\+(?P<local>[a-z0-9]+(?:[-_\.][a-z0-9]+)*))?
        \s*$"#
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseKind {
    Alpha,
    Beta,
    Rc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSegment {
    Str(String),
    Num(u64),
}

/// Orders a string segment below a numeric one at the same position, per
/// PEP 440's local-version comparison rule.
impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LocalSegment::Str(a), LocalSegment::Str(b)) => a.cmp(b),
            (LocalSegment::Num(a), LocalSegment::Num(b)) => a.cmp(b),
            (LocalSegment::Str(_), LocalSegment::Num(_)) => Ordering::Less,
            (LocalSegment::Num(_), LocalSegment::Str(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Str(s) => write!(f, "{s}"),
            LocalSegment::Num(n) => write!(f, "{n}"),
        }
    }
}

/// A totally ordered PEP 440 version.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    raw: String,
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreReleaseKind, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

/// A three-way sentinel: below every concrete value, a concrete value, or
/// above every concrete value. Mirrors the `NegativeInfinity`/`Infinity`
/// sentinels `packaging.version` uses in its comparison key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T: Ord> {
    NegInf,
    Val(T),
    PosInf,
}

type CmpKey = (u64, Vec<u64>, Bound<(u8, u64)>, Bound<u64>, Bound<u64>, Bound<Vec<LocalSegment>>);

fn strip_trailing_zeros(release: &[u64]) -> Vec<u64> {
    let mut v = release.to_vec();
    while v.last() == Some(&0) {
        v.pop();
    }
    v
}

impl Version {
    pub fn parse(input: &str) -> Result<Version, VersionError> {
        let caps = VERSION_RE
            .captures(input)
            .ok_or_else(|| VersionError::InvalidVersion(input.to_string()))?;

        let epoch: u64 = caps
            .name("epoch")
            .map(|m| m.as_str())
            .unwrap_or("0")
            .parse()
            .map_err(|_| VersionError::InvalidVersion(input.to_string()))?;

        let release: Vec<u64> = caps
            .name("release")
            .ok_or_else(|| VersionError::InvalidVersion(input.to_string()))?
            .as_str()
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::InvalidVersion(input.to_string()))?;

        let pre = caps.name("pre_l").map(|pre_l| {
            let kind = match pre_l.as_str().to_lowercase().as_str() {
                "a" | "alpha" => PreReleaseKind::Alpha,
                "b" | "beta" => PreReleaseKind::Beta,
                _ => PreReleaseKind::Rc, // c, rc, pre, preview
            };
            let n = caps
                .name("pre_n")
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0);
            (kind, n)
        });

        let post = if let Some(n1) = caps.name("post_n1") {
            n1.as_str().parse::<u64>().ok()
        } else if let Some(n2) = caps.name("post_n2") {
            n2.as_str().parse::<u64>().ok()
        } else {
            caps.name("post_l").map(|_| 0)
        };

        let dev = caps.name("dev_l").map(|_| {
            caps.name("dev_n")
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0)
        });

        let local: Vec<LocalSegment> = caps
            .name("local")
            .map(|m| m.as_str().split(['-', '_', '.']).collect::<Vec<_>>())
            .unwrap_or_default()
            .iter()
            .map(|segment| {
                if let Ok(n) = segment.parse::<u64>() {
                    LocalSegment::Num(n)
                } else {
                    LocalSegment::Str(segment.to_lowercase())
                }
            })
            .collect();

        Ok(Version {
            raw: input.trim().to_string(),
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Constructs a placeholder version carrying only the raw string, used
    /// by the `===` arbitrary-equality operator for operands that don't
    /// parse as PEP 440 versions at all (the operator compares strings,
    /// not parsed versions).
    pub fn arbitrary(raw: &str) -> Version {
        Version {
            raw: raw.trim().to_string(),
            epoch: 0,
            release: Vec::new(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn release_stripped(&self) -> Vec<u64> {
        strip_trailing_zeros(&self.release)
    }

    /// `(epoch, release)`, ignoring pre/post/dev/local — used to decide
    /// whether two versions share the same "base" release for the
    /// exclusive-comparison carve-outs in PEP 440's `<` and `>` operators.
    pub fn base_key(&self) -> (u64, Vec<u64>) {
        (self.epoch, self.release_stripped())
    }

    /// True if this version has a pre-release or dev-release segment.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    pub fn has_local(&self) -> bool {
        !self.local.is_empty()
    }

    pub fn local(&self) -> &[LocalSegment] {
        &self.local
    }

    fn pre_bound(&self) -> Bound<(u8, u64)> {
        match (&self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Bound::NegInf,
            (None, _, _) => Bound::PosInf,
            (Some((kind, n)), _, _) => Bound::Val((*kind as u8, *n)),
        }
    }

    fn post_bound(&self) -> Bound<u64> {
        match self.post {
            None => Bound::NegInf,
            Some(n) => Bound::Val(n),
        }
    }

    fn dev_bound(&self) -> Bound<u64> {
        match self.dev {
            None => Bound::PosInf,
            Some(n) => Bound::Val(n),
        }
    }

    fn local_bound(&self) -> Bound<Vec<LocalSegment>> {
        if self.local.is_empty() {
            Bound::NegInf
        } else {
            Bound::Val(self.local.clone())
        }
    }

    fn cmp_key(&self) -> CmpKey {
        (
            self.epoch,
            self.release_stripped(),
            self.pre_bound(),
            self.post_bound(),
            self.dev_bound(),
            self.local_bound(),
        )
    }

    /// Public-version equality: epoch, release, pre, post, and dev all
    /// match; local segment is ignored. Used by `==` clauses that don't
    /// themselves specify a local segment.
    pub fn public_eq(&self, other: &Version) -> bool {
        self.base_key() == other.base_key() && self.pre == other.pre && self.post == other.post && self.dev == other.dev
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key() == other.cmp_key()
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(&other.cmp_key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Version {
    /// Canonical PEP 440 string form: trailing-zero-stripped release,
    /// lowercase pre/post/dev tags with no separators, `+` local segment.
    /// Used where two differently-spelled versions (`1.0.0` vs `1.0`) must
    /// hash and dedup identically.
    pub fn normalize(&self) -> String {
        let mut out = String::new();
        if self.epoch != 0 {
            out.push_str(&format!("{}!", self.epoch));
        }
        let release = self.release_stripped();
        let release_str = if release.is_empty() {
            "0".to_string()
        } else {
            release
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(".")
        };
        out.push_str(&release_str);
        if let Some((kind, n)) = &self.pre {
            let tag = match kind {
                PreReleaseKind::Alpha => "a",
                PreReleaseKind::Beta => "b",
                PreReleaseKind::Rc => "rc",
            };
            out.push_str(&format!("{tag}{n}"));
        }
        if let Some(n) = self.post {
            out.push_str(&format!(".post{n}"));
        }
        if let Some(n) = self.dev {
            out.push_str(&format!(".dev{n}"));
        }
        if !self.local.is_empty() {
            let local_str = self
                .local
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(".");
            out.push_str(&format!("+{local_str}"));
        }
        out
    }
}

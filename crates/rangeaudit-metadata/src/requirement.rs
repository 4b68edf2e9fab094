//! A deliberately narrow PEP 508 requirement-string parser: just enough to
//! recover `(name, specifier)` pairs out of a `Requires-Dist` entry.
//! Extras are out of scope (they gate *optional* dependencies, which
//! range-mode auditing does not traverse), so a requirement gated on
//! `extra == "..."` is dropped rather than partially honored.
//!
//! Every other marker (`python_version`, `sys_platform`, `os_name`, ...) is
//! accepted unconditionally instead of evaluated against the current
//! environment: a requirement like `pywin32 ; sys_platform == "win32"`
//! is admitted into traversal on every platform, not just Windows. This
//! is an accepted narrowing, not an oversight — evaluating markers needs
//! an environment model (interpreter version, platform triple, ...) that
//! range-mode auditing does not otherwise carry, and over-admitting a
//! platform-gated dependency only risks a few spurious transitive nodes,
//! never a missed finding.

use lazy_static::lazy_static;
use rangeaudit_version::Specifier;
use regex::Regex;

lazy_static! {
    static ref REQUIREMENT_RE: Regex = Regex::new(
        r#"(?x)
        ^\s*
        (?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)
        \s*(?:\[[^\]]*\])?\s*
        (?:\((?P<paren_spec>[^)]*)\)|(?P<bare_spec>[^;]*))?
        (?:;\s*(?P<marker>.*))?
        \s*$
        "#
    )
    .unwrap();
}

pub fn parse_requires_dist(raw: &str) -> Option<(String, Specifier)> {
    let caps = REQUIREMENT_RE.captures(raw.trim())?;
    let name = caps.name("name")?.as_str().to_string();

    if let Some(marker) = caps.name("marker") {
        if marker.as_str().contains("extra") {
            return None;
        }
    }

    let spec_str = caps
        .name("paren_spec")
        .or_else(|| caps.name("bare_spec"))
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    let specifier = Specifier::parse(spec_str).ok()?;
    Some((name, specifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parenthesized_specifier() {
        let (name, spec) = parse_requires_dist("requests (>=2.0,<3.0)").unwrap();
        assert_eq!(name, "requests");
        assert_eq!(spec.clauses().len(), 2);
    }

    #[test]
    fn parses_bare_specifier_without_parens() {
        let (name, spec) = parse_requires_dist("click>=8.0").unwrap();
        assert_eq!(name, "click");
        assert_eq!(spec.clauses().len(), 1);
    }

    #[test]
    fn bare_name_has_empty_specifier() {
        let (name, spec) = parse_requires_dist("six").unwrap();
        assert_eq!(name, "six");
        assert!(spec.is_empty());
    }

    #[test]
    fn extras_gated_requirements_are_dropped() {
        assert!(parse_requires_dist("pytest (>=6.0) ; extra == 'test'").is_none());
    }

    #[test]
    fn non_extra_markers_are_admitted_unevaluated() {
        let (name, spec) = parse_requires_dist("pywin32>=300 ; sys_platform == 'win32'").unwrap();
        assert_eq!(name, "pywin32");
        assert!(spec.clauses().len() == 1);
    }
}

//! The overlap engine: does an allowed envelope admit any version a
//! vulnerability actually affects, given what the registry says exists?

use rangeaudit_version::{Specifier, Version};

/// Intersects `envelope` with the union of `affected` interval specifiers
/// over `catalog` (each entry a known release and its yanked flag),
/// returning every matching version as a witness, sorted ascending.
///
/// Yanked releases never produce a witness: a yanked release isn't
/// something a fresh resolve would ever select. Prereleases are excluded
/// unless `admit_prereleases` is set, mirroring PEP 440's default
/// prerelease-exclusion rule for dependency resolution.
pub fn ranges_overlap(
    envelope: &Specifier,
    affected: &[Specifier],
    catalog: &[(Version, bool)],
    admit_prereleases: bool,
) -> Vec<Version> {
    let mut witnesses: Vec<Version> = catalog
        .iter()
        .filter(|(_, yanked)| !yanked)
        .map(|(version, _)| version.clone())
        .filter(|version| admit_prereleases || !version.is_prerelease())
        .filter(|version| envelope.contains(version))
        .filter(|version| affected.iter().any(|union_member| union_member.contains(version)))
        .collect();
    witnesses.sort();
    witnesses.dedup();
    witnesses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn catalog(versions: &[(&str, bool)]) -> Vec<(Version, bool)> {
        versions.iter().map(|(s, yanked)| (v(s), *yanked)).collect()
    }

    #[test]
    fn finds_witnesses_in_the_intersection() {
        let envelope = Specifier::parse(">=1.0,<3.0").unwrap();
        let affected = vec![Specifier::parse(">=2.0,<4.0").unwrap()];
        let cat = catalog(&[("1.0", false), ("2.5", false), ("3.5", false)]);
        let witnesses = ranges_overlap(&envelope, &affected, &cat, false);
        assert_eq!(witnesses, vec![v("2.5")]);
    }

    #[test]
    fn yanked_releases_are_never_witnesses() {
        let envelope = Specifier::empty();
        let affected = vec![Specifier::parse(">=1.0").unwrap()];
        let cat = catalog(&[("2.0", true)]);
        assert!(ranges_overlap(&envelope, &affected, &cat, false).is_empty());
    }

    #[test]
    fn prereleases_excluded_unless_explicitly_admitted() {
        let envelope = Specifier::empty();
        let affected = vec![Specifier::parse(">=1.0").unwrap()];
        let cat = catalog(&[("2.0a1", false)]);
        assert!(ranges_overlap(&envelope, &affected, &cat, false).is_empty());
        assert_eq!(ranges_overlap(&envelope, &affected, &cat, true), vec![v("2.0a1")]);
    }

    #[test]
    fn witnesses_are_always_a_subset_of_the_catalog() {
        let envelope = Specifier::parse(">=0").unwrap();
        let affected = vec![Specifier::parse(">=0").unwrap()];
        let cat = catalog(&[("1.0", false), ("2.0", false), ("3.0", false)]);
        let witnesses = ranges_overlap(&envelope, &affected, &cat, false);
        let catalog_versions: Vec<Version> = cat.into_iter().map(|(v, _)| v).collect();
        assert!(witnesses.iter().all(|w| catalog_versions.contains(w)));
    }

    #[test]
    fn tightening_the_envelope_never_adds_witnesses() {
        let affected = vec![Specifier::parse(">=1.0,<5.0").unwrap()];
        let cat = catalog(&[("1.0", false), ("2.0", false), ("3.0", false), ("4.0", false)]);
        let wide = ranges_overlap(&Specifier::empty(), &affected, &cat, false);
        let tight = ranges_overlap(&Specifier::parse(">=2.0,<3.0").unwrap(), &affected, &cat, false);
        assert!(tight.iter().all(|w| wide.contains(w)));
        assert!(tight.len() <= wide.len());
    }

    #[test]
    fn empty_affected_union_never_overlaps() {
        let envelope = Specifier::empty();
        let cat = catalog(&[("1.0", false)]);
        assert!(ranges_overlap(&envelope, &[], &cat, false).is_empty());
    }
}

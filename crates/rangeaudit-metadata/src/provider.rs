use crate::error::MetadataError;
use crate::requirement::parse_requires_dist;
use crate::types::{MetadataStats, PackageMetadata};
use rangeaudit_version::Specifier;

fn canonicalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_sep = false;
    for c in name.chars() {
        if c == '-' || c == '_' || c == '.' {
            if !prev_sep && !out.is_empty() {
                out.push('-');
            }
            prev_sep = true;
        } else {
            out.push(c.to_ascii_lowercase());
            prev_sep = false;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// A registry metadata backend. `get_metadata` returns every release a
/// package has (version, yanked flag, `Requires-Dist` when known);
/// `get_requires_dist` narrows that down to the transitive dependencies
/// visible through versions an envelope actually admits.
pub trait MetadataProvider {
    fn get_metadata(&self, package: &str) -> Result<PackageMetadata, MetadataError>;

    /// Dependencies declared by any non-yanked release matching `envelope`,
    /// deduplicated by canonical name (first specifier seen per name wins,
    /// since any further occurrence is a different release's restatement
    /// of the same requirement rather than a new constraint to honor here —
    /// constraint accumulation itself happens one level up, in the graph).
    ///
    /// Updates `stats` with exactly one of `versions_with_requires_dist`,
    /// `versions_no_metadata_available`, or `versions_parse_failed` per
    /// matching version, keeping the coverage partition invariant intact.
    /// A version whose `requires_dist` is present but every entry fails to
    /// parse counts as `versions_parse_failed`, not
    /// `versions_with_requires_dist` — metadata existed but was unusable,
    /// the distinction callers need to judge audit completeness.
    fn get_requires_dist(
        &self,
        package: &str,
        envelope: &Specifier,
        stats: &mut MetadataStats,
    ) -> Result<Vec<(String, Specifier)>, MetadataError> {
        let metadata = self.get_metadata(package)?;

        let mut seen = std::collections::HashSet::new();
        let mut deps = Vec::new();

        for release in &metadata.versions {
            if release.yanked || !envelope.contains(&release.version) {
                continue;
            }
            stats.versions_examined += 1;

            match &release.requires_dist {
                Some(requirements) => {
                    let mut any_parsed = false;
                    for raw in requirements {
                        if let Some((name, specifier)) = parse_requires_dist(raw) {
                            any_parsed = true;
                            let key = canonicalize(&name);
                            if seen.insert(key) {
                                deps.push((name, specifier));
                            }
                        }
                    }
                    if any_parsed || requirements.is_empty() {
                        stats.versions_with_requires_dist += 1;
                    } else {
                        stats.versions_parse_failed += 1;
                    }
                }
                None => stats.versions_no_metadata_available += 1,
            }
        }

        Ok(deps)
    }
}

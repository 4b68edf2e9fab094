//! The breadth-first work-list traversal that populates a constraint graph
//! from a set of root dependencies, expanding transitively through
//! registry metadata until every reachable package's envelope has settled.

use crate::findings::{MetadataCoverage, UnsatisfiableEnvelope};
use rangeaudit_graph::{is_envelope_empty, ConstraintGraph};
use rangeaudit_metadata::{MetadataProvider, MetadataStats, PackageMetadata};
use rangeaudit_version::Specifier;
use std::collections::{HashMap, VecDeque};

pub struct BuildResult {
    pub graph: ConstraintGraph,
    pub metadata_coverage: MetadataCoverage,
    pub unsatisfiable: Vec<UnsatisfiableEnvelope>,
}

/// Drains a work-list of `(package, specifier, source, depth)` entries
/// until empty. A package is only re-expanded when a new constraint
/// actually tightens its envelope — not merely when it's seen again —
/// which is what keeps the traversal a fixpoint rather than an infinite
/// loop on diamond dependencies. `max_depth` bounds how far transitive
/// expansion goes; it does not bound how many times a shallow package can
/// be revisited as deeper branches tighten its envelope.
pub fn build_constraint_graph(
    roots: Vec<(String, Specifier)>,
    provider: &dyn MetadataProvider,
    max_depth: usize,
) -> BuildResult {
    let mut graph = ConstraintGraph::new();
    let mut stats = MetadataStats::default();
    let mut metadata_cache: HashMap<String, PackageMetadata> = HashMap::new();
    let mut packages_with_requires_dist: std::collections::HashSet<String> = std::collections::HashSet::new();

    let mut queue: VecDeque<(String, Specifier, String, usize)> = VecDeque::new();
    for (name, specifier) in roots {
        queue.push_back((name, specifier, "root".to_string(), 0));
    }

    while let Some((name, specifier, source, depth)) = queue.pop_front() {
        if depth > max_depth {
            continue;
        }

        let node = graph.get_or_create(&name);
        let changed = node.add_constraint(&specifier, source);
        let canonical = node.canonical_name().to_string();

        if !changed {
            continue;
        }

        let metadata = match metadata_cache.get(&canonical) {
            Some(cached) => cached.clone(),
            None => match provider.get_metadata(&name) {
                Ok(fetched) => {
                    metadata_cache.insert(canonical.clone(), fetched.clone());
                    fetched
                }
                Err(_) => {
                    stats.versions_examined += 1;
                    stats.versions_fetch_failed += 1;
                    continue;
                }
            },
        };

        let known_versions = metadata.known_versions();
        let node = graph.get(&name).expect("node was just created");
        if is_envelope_empty(node, Some(&known_versions)) == Some(true) {
            continue;
        }
        if depth == max_depth {
            continue;
        }

        let envelope = node.envelope().clone();
        let before = stats.versions_with_requires_dist;
        let deps = match provider.get_requires_dist(&name, &envelope, &mut stats) {
            Ok(found) => found,
            Err(_) => continue,
        };
        if stats.versions_with_requires_dist > before {
            packages_with_requires_dist.insert(canonical.clone());
        }

        for (dep_name, dep_specifier) in deps {
            let trans_source = format!("{dep_name}{dep_specifier} from {name}");
            queue.push_back((dep_name, dep_specifier, trans_source, depth + 1));
        }
    }

    let packages_total = graph.nodes().count();

    let unsatisfiable = graph
        .nodes()
        .filter_map(|node| {
            let known = metadata_cache
                .get(node.canonical_name())
                .map(|metadata| metadata.known_versions());
            if is_envelope_empty(node, known.as_deref()) == Some(true) {
                Some(UnsatisfiableEnvelope {
                    name: node.canonical_name().to_string(),
                    constraints: node
                        .constraints()
                        .iter()
                        .map(|(specifier, source)| (specifier.to_string(), source.clone()))
                        .collect(),
                })
            } else {
                None
            }
        })
        .collect();

    BuildResult {
        graph,
        metadata_coverage: MetadataCoverage::new(stats, packages_total, packages_with_requires_dist.len()),
        unsatisfiable,
    }
}

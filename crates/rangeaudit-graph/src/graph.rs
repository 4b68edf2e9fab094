use crate::canonical::canonicalize_name;
use crate::node::PackageNode;
use rangeaudit_version::Version;
use std::collections::HashMap;

/// The constraint graph keyed by canonical package name. Construction (the
/// breadth-first work-list traversal that populates it) is a separate
/// concern driven by a metadata provider; this crate only owns the node
/// storage and the envelope-emptiness query.
#[derive(Debug, Default)]
pub struct ConstraintGraph {
    nodes: HashMap<String, PackageNode>,
}

impl ConstraintGraph {
    pub fn new() -> ConstraintGraph {
        ConstraintGraph::default()
    }

    pub fn get_or_create(&mut self, name: &str) -> &mut PackageNode {
        let key = canonicalize_name(name);
        self.nodes
            .entry(key.clone())
            .or_insert_with(|| PackageNode::new(key))
    }

    pub fn get(&self, name: &str) -> Option<&PackageNode> {
        self.nodes.get(&canonicalize_name(name))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Whether a node's allowed envelope admits no version from a known
/// catalog. Three-valued by design: `None` means the catalog for this
/// package is unknown (we never fetched it, or the fetch failed), so
/// emptiness can't be decided at all; `Some(false)`/`Some(true)` are only
/// returned once a concrete catalog is in hand. Callers must not collapse
/// `None` into `Some(false)` — an unresolved catalog is not the same claim
/// as "satisfiable".
pub fn is_envelope_empty(node: &PackageNode, known_versions: Option<&[Version]>) -> Option<bool> {
    let known_versions = known_versions?;
    if known_versions.is_empty() {
        return None;
    }
    Some(!known_versions.iter().any(|v| node.envelope().contains(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeaudit_version::Specifier;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn get_or_create_is_keyed_by_canonical_name() {
        let mut graph = ConstraintGraph::new();
        graph.get_or_create("Flask").add_constraint(
            &Specifier::parse(">=1.0").unwrap(),
            "root".to_string(),
        );
        assert!(graph.get("flask").is_some());
        assert!(graph.get("FLASK").is_some());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn emptiness_is_unknown_without_a_catalog() {
        let mut graph = ConstraintGraph::new();
        let node = graph.get_or_create("flask");
        node.add_constraint(&Specifier::parse(">=1.0").unwrap(), "root".to_string());
        assert_eq!(is_envelope_empty(node, None), None);
        assert_eq!(is_envelope_empty(node, Some(&[])), None);
    }

    #[test]
    fn emptiness_is_decided_against_a_concrete_catalog() {
        let mut graph = ConstraintGraph::new();
        let node = graph.get_or_create("flask");
        node.add_constraint(&Specifier::parse(">=2.0").unwrap(), "root".to_string());
        let catalog = vec![v("1.0"), v("1.5")];
        assert_eq!(is_envelope_empty(node, Some(&catalog)), Some(true));

        let catalog_with_match = vec![v("1.0"), v("2.5")];
        assert_eq!(is_envelope_empty(node, Some(&catalog_with_match)), Some(false));
    }
}

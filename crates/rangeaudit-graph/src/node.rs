use rangeaudit_version::Specifier;

/// A single package's accumulated position in the constraint graph: every
/// `(specifier, source)` constraint seen for it so far, intersected into
/// one allowed envelope. Keeping the constraint list (not just the sources)
/// lets callers render `UnsatisfiableEnvelope` and `constraint_sources`
/// with the actual conflicting specifiers, not just their provenance
/// strings.
#[derive(Debug, Clone)]
pub struct PackageNode {
    canonical_name: String,
    envelope: Specifier,
    constraints: Vec<(Specifier, String)>,
}

impl PackageNode {
    pub fn new(canonical_name: impl Into<String>) -> PackageNode {
        PackageNode {
            canonical_name: canonical_name.into(),
            envelope: Specifier::empty(),
            constraints: Vec::new(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn envelope(&self) -> &Specifier {
        &self.envelope
    }

    pub fn constraints(&self) -> &[(Specifier, String)] {
        &self.constraints
    }

    pub fn sources(&self) -> Vec<String> {
        self.constraints.iter().map(|(_, source)| source.clone()).collect()
    }

    /// Intersects `specifier` into the node's envelope and records
    /// `(specifier, source)` as the constraint that produced it. Returns
    /// whether the envelope's displayed form actually changed, so callers
    /// (the graph builder) can decide whether this package's dependents
    /// need re-traversal.
    ///
    /// The first constraint recorded always counts as a change, even an
    /// empty specifier, so unpinned direct dependencies still drive
    /// transitive traversal.
    pub fn add_constraint(&mut self, specifier: &Specifier, source: String) -> bool {
        let before = self.envelope.to_string();
        let is_first = self.constraints.is_empty();
        self.envelope = self.envelope.intersect(specifier);
        self.constraints.push((specifier.clone(), source));
        is_first || self.envelope.to_string() != before
    }
}

//! Datums and the canonical-datum synonym graph (spec. §3, §4.2).
//!
//! The registry computes the canonical representative of each datum's
//! synonymy class by a union-find over `SYNONYM` datum-shift edges at
//! build time, following the teacher crate's pattern of building
//! derived/indexed state once from static tables in
//! `Context::new()`/`Minimal::new()` rather than mutating it lazily per
//! lookup.

use std::collections::BTreeMap;

/// A datum code, e.g. `"WGS84"`, `"NAD27"`, `"NAD83"`, `"OSGB36"`.
pub type DatumId = String;

/// `{code, ellipsoid_code, canonical_datum_code}` (spec. §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    code: DatumId,
    ellipsoid_code: &'static str,
    canonical: DatumId,
}

impl Datum {
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn ellipsoid_code(&self) -> &'static str {
        self.ellipsoid_code
    }

    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// Union-find over `SYNONYM` edges, used to collapse functionally
/// identical datums (e.g. NAD83 ↔ WGS84) into one canonical representative
/// per spec. §3/§4.2.
#[derive(Debug, Default, Clone)]
pub(crate) struct SynonymGraph {
    parent: BTreeMap<DatumId, DatumId>,
}

impl SynonymGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, code: &str) {
        self.parent
            .entry(code.to_string())
            .or_insert_with(|| code.to_string());
    }

    fn find(&mut self, code: &str) -> DatumId {
        self.ensure(code);
        let parent = self.parent[code].clone();
        if parent == code {
            return parent;
        }
        let root = self.find(&parent);
        self.parent.insert(code.to_string(), root.clone());
        root
    }

    /// Merge the synonymy classes of `a` and `b`; the lexicographically
    /// smaller code becomes the representative, giving deterministic,
    /// build-order-independent canonicalization.
    pub(crate) fn union(&mut self, a: &str, b: &str) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        if ra < rb {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(ra, rb);
        }
    }

    pub(crate) fn canonical_of(&mut self, code: &str) -> DatumId {
        self.find(code)
    }
}

/// Build a [`Datum`] given its code, ellipsoid, and the already-computed
/// canonical representative.
pub(crate) fn make_datum(code: &str, ellipsoid_code: &'static str, canonical: DatumId) -> Datum {
    Datum {
        code: code.to_string(),
        ellipsoid_code,
        canonical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_collapses_synonyms() {
        let mut g = SynonymGraph::new();
        g.union("NAD83", "WGS84");
        assert_eq!(g.canonical_of("NAD83"), g.canonical_of("WGS84"));
        // Deterministic: lexicographically smaller wins.
        assert_eq!(g.canonical_of("NAD83"), "NAD83");
    }

    #[test]
    fn transitive_closure() {
        let mut g = SynonymGraph::new();
        g.union("A", "B");
        g.union("B", "C");
        assert_eq!(g.canonical_of("A"), g.canonical_of("C"));
    }

    #[test]
    fn unrelated_datums_stay_distinct() {
        let mut g = SynonymGraph::new();
        g.union("NAD83", "WGS84");
        assert_ne!(g.canonical_of("NAD27"), g.canonical_of("WGS84"));
    }
}

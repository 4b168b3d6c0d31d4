use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Country normalizer
// ---------------------------------------------------------------------------

/// Fixed synonym table mapping raw country spellings to canonical names.
///
/// The mapping is case-insensitive on the input (keys are uppercased at
/// construction), total (unmapped values pass through uppercased), and
/// idempotent (every canonical name maps to itself).
#[derive(Debug, Clone, Default)]
pub struct CountryMap {
    mapping: BTreeMap<String, String>,
}

impl CountryMap {
    /// Build from a configured synonym table. Canonical names (the map
    /// values) are added as identity entries so re-normalizing is a no-op.
    pub fn new(synonyms: &BTreeMap<String, String>) -> Self {
        let mut mapping = BTreeMap::new();
        for (raw, canonical) in synonyms {
            let canonical = canonical.to_uppercase();
            mapping.insert(raw.to_uppercase(), canonical.clone());
            mapping.insert(canonical.clone(), canonical);
        }
        CountryMap { mapping }
    }

    /// Uppercase the input, then look it up; absent values pass through
    /// uppercased unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let upper = raw.trim().to_uppercase();
        match self.mapping.get(&upper) {
            Some(canonical) => canonical.clone(),
            None => upper,
        }
    }
}

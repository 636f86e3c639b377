//! Regeneration of hierarchical feature identifiers.
//!
//! Naming rules, applied root first:
//! - gene: `<base>`
//! - mRNA: `<base>.<n>`
//! - anything else: `<base>.<type>.<n>`
//!
//! `n` counts features of the same type within one gene model, so the second
//! exon of a transcript is `.exon.2`.

use crate::feature::{Feature, FeatureType, ID, NAME, PARENT, SOURCE};
use crate::types::{HashMap, HashMapExt};

/// Value written to the `source` qualifier of every normalized feature.
pub const NORMALIZED_SOURCE: &str = "apollo";

/// Per-type counters shared by every node of one gene model.
#[derive(Debug, Default)]
pub struct TypeCounter {
    counts: HashMap<String, usize>,
}

impl TypeCounter {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Increment the counter for `ty` and return its new value (first call is 1).
    pub fn increment(&mut self, ty: &str) -> usize {
        let count = self.counts.entry(ty.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Rewrite `ID`, `Name`, `Parent` and `source` of every feature in `features`
/// and their descendants, deriving identifiers from `base_id`.
pub fn normalize_ids(features: &mut [Feature], base_id: &str, counter: &mut TypeCounter) {
    for feature in features {
        match &feature.ty {
            FeatureType::Gene => {
                feature.set_qualifier(NAME, base_id);
                feature.set_qualifier(ID, base_id);
                feature.set_qualifier(SOURCE, NORMALIZED_SOURCE);
                normalize_ids(&mut feature.children, base_id, &mut TypeCounter::new());
            }
            FeatureType::Mrna => {
                let id = format!("{}.{}", base_id, counter.increment(FeatureType::Mrna.as_str()));
                feature.set_qualifier(NAME, id.as_str());
                feature.set_qualifier(ID, id.as_str());
                feature.set_qualifier(PARENT, base_id);
                feature.set_qualifier(SOURCE, NORMALIZED_SOURCE);
                normalize_ids(&mut feature.children, &id, counter);
            }
            FeatureType::Other(ty) => {
                let id = format!("{}.{}.{}", base_id, ty, counter.increment(ty));
                feature.set_qualifier(ID, id.as_str());
                feature.set_qualifier(PARENT, base_id);
                // Sub-features carry no display name of their own.
                feature.remove_qualifier(NAME);
                feature.set_qualifier(SOURCE, NORMALIZED_SOURCE);
                normalize_ids(&mut feature.children, &id, counter);
            }
        }
    }
}

/// Normalize a single gene model rooted at `feature` with a fresh counter.
pub fn normalize_model(feature: &mut Feature, base_id: &str) {
    normalize_ids(std::slice::from_mut(feature), base_id, &mut TypeCounter::new());
}

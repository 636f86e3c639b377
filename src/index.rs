//! Lookups built once from the original annotations before any edit is applied.

use crate::error::ReconcileError;
use crate::feature::{AnnotationSet, Feature};
use crate::types::{HashMap, HashMapExt, SeqSlot};

/// Sequence id -> position of its record in the original `AnnotationSet`.
#[derive(Debug, Default)]
pub struct SequenceIndex {
    slots: HashMap<String, SeqSlot>,
}

impl SequenceIndex {
    pub fn build(annotations: &AnnotationSet) -> Self {
        let slots = annotations
            .records()
            .iter()
            .enumerate()
            .map(|(slot, rec)| (rec.id.clone(), slot))
            .collect();
        Self { slots }
    }

    pub fn get(&self, seq_id: &str) -> Option<SeqSlot> {
        self.slots.get(seq_id).copied()
    }

    pub fn resolve(&self, seq_id: &str) -> Result<SeqSlot, ReconcileError> {
        self.get(seq_id).ok_or_else(|| ReconcileError::SequenceNotFound {
            seq_id: seq_id.to_string(),
        })
    }
}

/// What the name index remembers about one feature id.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexedFeature {
    /// A top-level gene model as it was when the index was built.
    TopLevel(Feature),
    /// A sub-feature. Only top-level models can be removed from a sequence,
    /// so nothing beyond the id is kept.
    Nested { id: String },
}

/// Feature id -> indexed feature, over every depth of every sequence.
///
/// Top-level models are stored as snapshots taken before any edit, which
/// costs one copy of the original gene models; sub-features cost only their
/// id. Removal is by equality against the live list, so a snapshot whose
/// feature was already removed or replaced no longer matches anything.
#[derive(Debug, Default)]
pub struct NameIndex {
    features: HashMap<String, IndexedFeature>,
}

impl NameIndex {
    /// Duplicate ids resolve to the last feature seen.
    pub fn build(annotations: &AnnotationSet) -> Self {
        let mut features = HashMap::new();
        for record in annotations.records() {
            for model in &record.features {
                if let Some(id) = model.id() {
                    features.insert(id.to_string(), IndexedFeature::TopLevel(model.clone()));
                }
                for sub in model.iter_tree().skip(1) {
                    if let Some(id) = sub.id() {
                        features.insert(id.to_string(), IndexedFeature::Nested { id: id.to_string() });
                    }
                }
            }
        }
        Self { features }
    }

    pub fn get(&self, name: &str) -> Option<&IndexedFeature> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&IndexedFeature, ReconcileError> {
        self.get(name).ok_or_else(|| ReconcileError::GeneNotFound {
            name: name.to_string(),
        })
    }
}

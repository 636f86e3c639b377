//! Ordered insertion and removal of gene models on one sequence.

use crate::error::ReconcileError;
use crate::feature::{Feature, SequenceRecord};
use crate::index::IndexedFeature;
use crate::normalize::normalize_model;

/// Leftmost index at which a feature starting at `start` keeps `features`
/// sorted; ties go before existing features with the same start.
pub fn insertion_point(features: &[Feature], start: usize) -> usize {
    features.partition_point(|f| f.start() < start)
}

/// Normalize `feature` under the name carried by its `description` qualifier
/// and insert it into `record` in start order. Returns the gene name.
pub fn insert_model(
    mut feature: Feature,
    record: &mut SequenceRecord,
) -> Result<String, ReconcileError> {
    let gene_name = feature
        .description()
        .ok_or_else(|| ReconcileError::MissingDescription {
            seq_id: record.id.clone(),
        })?
        .to_string();
    normalize_model(&mut feature, &gene_name);

    let site = insertion_point(&record.features, feature.start());
    tracing::info!(gene = %gene_name, seq = %record.id, "add gene: {}", gene_name);
    record.features.insert(site, feature);
    Ok(gene_name)
}

/// Remove the first top-level feature of `record` equal to `feature`.
pub fn delete_model(
    feature: &Feature,
    record: &mut SequenceRecord,
) -> Result<Feature, ReconcileError> {
    let pos = record
        .features
        .iter()
        .position(|f| f == feature)
        .ok_or_else(|| ReconcileError::FeatureNotPresent {
            id: feature.id().unwrap_or_default().to_string(),
            seq_id: record.id.clone(),
        })?;

    let gene_name = feature.name().or(feature.id()).unwrap_or_default();
    tracing::info!(gene = %gene_name, seq = %record.id, "delete gene: {}", gene_name);
    Ok(record.features.remove(pos))
}

/// Remove the model an index entry refers to. Sub-features are never
/// top-level, so naming one is a `FeatureNotPresent` error.
pub fn delete_indexed(
    entry: &IndexedFeature,
    record: &mut SequenceRecord,
) -> Result<Feature, ReconcileError> {
    match entry {
        IndexedFeature::TopLevel(feature) => delete_model(feature, record),
        IndexedFeature::Nested { id } => Err(ReconcileError::FeatureNotPresent {
            id: id.clone(),
            seq_id: record.id.clone(),
        }),
    }
}

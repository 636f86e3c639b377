//! Applies the gene models of a curated export onto the original annotations.
//!
//! Each top-level feature of the edited set states its intent through its
//! `description` qualifier:
//! - absent: ignored
//! - `"<name> delete"`: remove gene `<name>`
//! - an existing gene id: replace that gene with this model
//! - anything else: add this model as a new gene named after the description

use crate::edit::{delete_indexed, insert_model};
use crate::error::ReconcileError;
use crate::feature::{AnnotationSet, SequenceRecord};
use crate::index::{NameIndex, SequenceIndex};
use crate::types::SeqSlot;

const DELETE_MARKER: &str = "delete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Skip,
    Delete { name: String },
    Replace { name: String },
    Add { name: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: u64,
    pub replaced: u64,
    pub deleted: u64,
    pub skipped: u64,
}

/// Gene name targeted by a delete instruction.
///
/// The marker must not open the description; the character right before it
/// (normally a space) is dropped along with everything from the marker on.
pub fn delete_target(description: &str) -> Option<&str> {
    let marker = description.find(DELETE_MARKER)?;
    if marker == 0 {
        return None;
    }
    let head = &description[..marker];
    let cut = head.char_indices().last().map_or(0, |(i, _)| i);
    Some(&head[..cut])
}

pub fn classify(description: Option<&str>, names: &NameIndex) -> Action {
    let Some(description) = description else {
        return Action::Skip;
    };
    if let Some(name) = delete_target(description) {
        Action::Delete {
            name: name.to_string(),
        }
    } else if names.contains(description) {
        Action::Replace {
            name: description.to_string(),
        }
    } else {
        Action::Add {
            name: description.to_string(),
        }
    }
}

/// Merge `edited` into `original` in place.
///
/// Every edited sequence must exist in `original`; this is checked before any
/// change is made. Edits are applied in the edited set's order, each against
/// the current state of `original`. On error `original` may be partially
/// updated and should be discarded.
pub fn reconcile(
    original: &mut AnnotationSet,
    edited: AnnotationSet,
) -> Result<ReconcileStats, ReconcileError> {
    let seq_index = SequenceIndex::build(original);
    let names = NameIndex::build(original);

    let edited = edited.into_records();
    let slots = edited
        .iter()
        .map(|rec| seq_index.resolve(&rec.id))
        .collect::<Result<Vec<SeqSlot>, _>>()?;

    let mut stats = ReconcileStats::default();
    for (record, slot) in edited.into_iter().zip(slots) {
        let target = &mut original.records_mut()[slot];
        apply_record(record, target, &names, &mut stats)?;
    }
    Ok(stats)
}

fn apply_record(
    record: SequenceRecord,
    target: &mut SequenceRecord,
    names: &NameIndex,
    stats: &mut ReconcileStats,
) -> Result<(), ReconcileError> {
    for feature in record.features {
        match classify(feature.description(), names) {
            Action::Skip => {
                tracing::debug!(
                    seq = %record.id,
                    id = feature.id().unwrap_or_default(),
                    "skipping feature without description"
                );
                stats.skipped += 1;
            }
            Action::Delete { name } => {
                delete_indexed(names.resolve(&name)?, target)?;
                stats.deleted += 1;
            }
            Action::Replace { name } => {
                delete_indexed(names.resolve(&name)?, target)?;
                insert_model(feature, target)?;
                stats.replaced += 1;
            }
            Action::Add { .. } => {
                insert_model(feature, target)?;
                stats.added += 1;
            }
        }
    }
    Ok(())
}

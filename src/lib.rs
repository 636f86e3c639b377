//! gffmerge-rs: merge curated gene-model edits into a GFF3 annotation.
//!
//! # Library usage
//!
//! ```no_run
//! use gffmerge_rs::annotation::{load_annotations, save_annotations};
//! use gffmerge_rs::reconcile;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut annotations = load_annotations(Path::new("maker.gff3"))?;
//! let edits = load_annotations(Path::new("apollo.gff3"))?;
//! let stats = reconcile(&mut annotations, edits)?;
//! save_annotations(&annotations, Path::new("output.gff3"))?;
//! println!("added {} genes", stats.added);
//! # Ok(())
//! # }
//! ```

pub(crate) mod types;

pub mod annotation;
pub mod edit;
pub mod error;
pub mod feature;
pub mod index;
pub mod normalize;
pub mod reconcile;

// Flat re-exports for the most commonly used public types.
pub use error::ReconcileError;
pub use feature::{AnnotationSet, Feature, FeatureType, Location, Segment, SequenceRecord, Strand};
pub use index::{IndexedFeature, NameIndex, SequenceIndex};
pub use normalize::{normalize_ids, normalize_model, TypeCounter};
pub use reconcile::{reconcile, Action, ReconcileStats};
pub use types::SeqSlot;

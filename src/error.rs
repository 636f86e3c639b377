use thiserror::Error;

/// Fatal conditions raised while merging an edited annotation set into the
/// original one. None of them are retried; the run stops at the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("sequence {seq_id:?} from the edited annotations is not present in the original annotations")]
    SequenceNotFound { seq_id: String },

    #[error("gene {name:?} is not present in the original annotations")]
    GeneNotFound { name: String },

    #[error("feature {id:?} is no longer present on sequence {seq_id:?}")]
    FeatureNotPresent { id: String, seq_id: String },

    #[error("feature to insert on sequence {seq_id:?} has no description qualifier")]
    MissingDescription { seq_id: String },
}

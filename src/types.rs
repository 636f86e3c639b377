// Fast hash maps using AHash instead of the default SipHash.
// Import these throughout the codebase with `use crate::types::HashMap`.
// Also import `HashMapExt` when you need `::new()` or `::with_capacity()`.
pub(crate) type HashMap<K, V> = ahash::HashMap<K, V>;
pub(crate) use ahash::HashMapExt;

/// Position of a `SequenceRecord` within its `AnnotationSet`.
pub type SeqSlot = usize;

//! In-memory gene models: a tree of features per sequence.
//!
//! Coordinates follow the half-open convention used throughout the crate:
//! `start` is 0-based, `end` is exclusive (numerically the GFF3 end column).

use indexmap::IndexMap;
use std::fmt;

/// Ordered attribute name -> values mapping (GFF3 column 9, plus `source`).
pub type Qualifiers = IndexMap<String, Vec<String>>;

pub const ID: &str = "ID";
pub const NAME: &str = "Name";
pub const PARENT: &str = "Parent";
pub const SOURCE: &str = "source";
pub const DESCRIPTION: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Gene,
    /// Transcript.
    Mrna,
    /// exon, CDS, UTRs and anything else below a transcript.
    Other(String),
}

impl FeatureType {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureType::Gene => "gene",
            FeatureType::Mrna => "mRNA",
            FeatureType::Other(ty) => ty,
        }
    }
}

impl From<&str> for FeatureType {
    fn from(ty: &str) -> Self {
        match ty {
            "gene" => FeatureType::Gene,
            "mRNA" => FeatureType::Mrna,
            other => FeatureType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    None,
    Unknown,
}

impl Strand {
    pub fn as_char(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::None => '.',
            Strand::Unknown => '?',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
}

impl Location {
    pub fn new(start: usize, end: usize, strand: Strand) -> Self {
        Self { start, end, strand }
    }
}

/// A further piece of a discontinuous feature (e.g. one line of a
/// multi-line CDS). It shares the owning feature's type and qualifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub location: Location,
    pub score: Option<f32>,
    pub phase: Option<u8>,
}

/// One annotated element and the sub-features it owns.
///
/// `location`, `score` and `phase` describe the first segment; `segments`
/// holds the rest, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub ty: FeatureType,
    pub location: Location,
    pub score: Option<f32>,
    pub phase: Option<u8>,
    pub segments: Vec<Segment>,
    pub qualifiers: Qualifiers,
    pub children: Vec<Feature>,
}

impl Feature {
    pub fn new(ty: impl Into<FeatureType>, location: Location) -> Self {
        Self {
            ty: ty.into(),
            location,
            score: None,
            phase: None,
            segments: Vec::new(),
            qualifiers: Qualifiers::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style `set_qualifier`.
    pub fn with_qualifier(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_qualifier(key, value);
        self
    }

    pub fn with_child(mut self, child: Feature) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Every segment of this feature, the first one included.
    pub fn all_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let first = Segment {
            location: self.location,
            score: self.score,
            phase: self.phase,
        };
        std::iter::once(first).chain(self.segments.iter().copied())
    }

    pub fn start(&self) -> usize {
        self.location.start
    }

    /// The feature's identifier: the first `ID` value, if any.
    pub fn id(&self) -> Option<&str> {
        self.qualifier(ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.qualifier(NAME)
    }

    pub fn description(&self) -> Option<&str> {
        self.qualifier(DESCRIPTION)
    }

    /// First value stored under `key`.
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Replace every value under `key` with `value`. A new key is appended,
    /// an existing one keeps its position.
    pub fn set_qualifier(&mut self, key: &str, value: impl Into<String>) {
        let value = vec![value.into()];
        match self.qualifiers.get_mut(key) {
            Some(values) => *values = value,
            None => {
                self.qualifiers.insert(key.to_string(), value);
            }
        }
    }

    /// Remove `key`, keeping the order of the remaining qualifiers.
    pub fn remove_qualifier(&mut self, key: &str) -> Option<Vec<String>> {
        self.qualifiers.shift_remove(key)
    }

    /// Depth-first, pre-order walk over this feature and all descendants.
    pub fn iter_tree(&self) -> TreeIter<'_> {
        TreeIter { stack: vec![self] }
    }
}

pub struct TreeIter<'a> {
    stack: Vec<&'a Feature>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a Feature;

    fn next(&mut self) -> Option<Self::Item> {
        let feature = self.stack.pop()?;
        self.stack.extend(feature.children.iter().rev());
        Some(feature)
    }
}

/// One chromosome or contig and its top-level features, ordered by start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequenceRecord {
    pub id: String,
    pub features: Vec<Feature>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            features: Vec::new(),
        }
    }

    /// Stable sort of the top-level features by start.
    pub fn sort_features(&mut self) {
        self.features.sort_by_key(Feature::start);
    }

    pub fn is_sorted(&self) -> bool {
        self.features
            .windows(2)
            .all(|pair| pair[0].start() <= pair[1].start())
    }
}

/// All sequences of one annotation file, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationSet {
    records: Vec<SequenceRecord>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [SequenceRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<SequenceRecord> {
        self.records
    }

    pub fn get(&self, seq_id: &str) -> Option<&SequenceRecord> {
        self.records.iter().find(|rec| rec.id == seq_id)
    }

    /// Add `record`, or append its features to an existing record with the
    /// same id.
    pub fn push(&mut self, record: SequenceRecord) {
        match self.records.iter_mut().find(|rec| rec.id == record.id) {
            Some(existing) => existing.features.extend(record.features),
            None => self.records.push(record),
        }
    }

    pub fn sort_features(&mut self) {
        for record in &mut self.records {
            record.sort_features();
        }
    }
}

impl FromIterator<SequenceRecord> for AnnotationSet {
    fn from_iter<T: IntoIterator<Item = SequenceRecord>>(iter: T) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}

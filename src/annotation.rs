use crate::feature::{
    AnnotationSet, Feature, FeatureType, Location, Segment, SequenceRecord, Strand, ID, PARENT,
    SOURCE,
};
use crate::types::{HashMap, HashMapExt};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use noodles::core::Position;
use noodles::gff::feature::record::Phase;
use noodles::gff::feature::record_buf::attributes::field::{Tag, Value};
use noodles::gff::feature::record_buf::Attributes;
use noodles::gff::feature::RecordBuf;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const GFF3_HEADER: &str = "##gff-version 3";

#[derive(Debug)]
struct ParsedFeature {
    seq_id: String,
    parent: Option<String>,
    feature: Feature,
}

/// Load a GFF3 file into per-sequence feature trees.
///
/// Coordinate conventions:
/// - GFF3 is 1-based inclusive.
/// - Features store a 0-based, half-open [start, end), so `start` is
///   decremented and `end` kept as-is.
///
/// Each sequence's top-level features are sorted by start after loading;
/// input files are not assumed to be ordered.
pub fn load_annotations(path: &Path) -> Result<AnnotationSet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open annotations {}", path.display()))?;
    read_annotations(BufReader::new(file))
        .with_context(|| format!("failed to parse annotations {}", path.display()))
}

pub fn read_annotations<R: BufRead>(inner: R) -> Result<AnnotationSet> {
    let mut reader = noodles::gff::io::Reader::new(inner);
    let mut parsed = Vec::new();

    for result in reader.record_bufs() {
        let record = result?;
        parsed.push(parse_record(&record));
    }

    let mut annotations = assemble(parsed);
    annotations.sort_features();
    Ok(annotations)
}

fn parse_record(record: &RecordBuf) -> ParsedFeature {
    let ty = record.ty().to_string();
    let location = Location::new(
        record.start().get() - 1,
        record.end().get(),
        strand_from_record(record.strand()),
    );

    let mut feature = Feature::new(FeatureType::from(ty.as_str()), location);
    feature.score = record.score();
    feature.phase = record.phase().map(phase_to_u8);

    let source = record.source().to_string();
    if !source.is_empty() && source != "." {
        feature.set_qualifier(SOURCE, source);
    }

    let attributes: &IndexMap<_, _> = record.attributes().as_ref();
    for (key, value) in attributes {
        let values = value.iter().map(|v| v.to_string()).collect();
        feature.qualifiers.insert(key.to_string(), values);
    }

    ParsedFeature {
        seq_id: record.reference_sequence_name().to_string(),
        parent: feature.qualifier(PARENT).map(str::to_string),
        feature,
    }
}

/// Attach every feature to its first `Parent` and group the roots by sequence.
/// Features whose parent id never appears in the file become roots. Lines
/// repeating an earlier `ID` under the same parent are further segments of
/// that feature.
fn assemble(parsed: Vec<ParsedFeature>) -> AnnotationSet {
    let mut first_by_id: HashMap<String, usize> = HashMap::with_capacity(parsed.len());
    for (i, p) in parsed.iter().enumerate() {
        if let Some(id) = p.feature.id() {
            first_by_id.entry(id.to_string()).or_insert(i);
        }
    }

    let mut segment_of: Vec<Option<usize>> = vec![None; parsed.len()];
    for (i, p) in parsed.iter().enumerate() {
        let Some(&first) = p.feature.id().and_then(|id| first_by_id.get(id)) else {
            continue;
        };
        let head = &parsed[first];
        if first != i && head.parent == p.parent && head.seq_id == p.seq_id {
            segment_of[i] = Some(first);
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); parsed.len()];
    let mut roots = Vec::new();
    for (i, p) in parsed.iter().enumerate() {
        if segment_of[i].is_some() {
            continue;
        }
        match p.parent.as_deref().and_then(|pid| first_by_id.get(pid)) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    let mut slots: Vec<Option<ParsedFeature>> = parsed.into_iter().map(Some).collect();
    for (i, first) in segment_of.iter().enumerate() {
        let Some(first) = *first else { continue };
        let Some(part) = slots[i].take() else { continue };
        if let Some(head) = slots[first].as_mut() {
            head.feature.segments.push(Segment {
                location: part.feature.location,
                score: part.feature.score,
                phase: part.feature.phase,
            });
        }
    }

    let mut by_seq: IndexMap<String, Vec<Feature>> = IndexMap::new();
    for root in roots {
        if let Some((seq_id, feature)) = take_tree(root, &mut slots, &children) {
            by_seq.entry(seq_id).or_default().push(feature);
        }
    }

    let orphans = slots.iter().filter(|slot| slot.is_some()).count();
    if orphans > 0 {
        tracing::warn!(orphans, "dropped features with cyclic parent references");
    }

    by_seq
        .into_iter()
        .map(|(id, features)| SequenceRecord { id, features })
        .collect()
}

fn take_tree(
    idx: usize,
    slots: &mut [Option<ParsedFeature>],
    children: &[Vec<usize>],
) -> Option<(String, Feature)> {
    let ParsedFeature {
        seq_id,
        mut feature,
        ..
    } = slots[idx].take()?;
    for &child in &children[idx] {
        if let Some((_, sub)) = take_tree(child, slots, children) {
            feature.children.push(sub);
        }
    }
    Some((seq_id, feature))
}

/// Write `annotations` to `path` as GFF3, replacing any existing file.
pub fn save_annotations(annotations: &AnnotationSet, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_annotations(&mut writer, annotations)
        .and_then(|_| writer.flush())
        .with_context(|| format!("failed to write annotations {}", path.display()))
}

/// Serialize every feature depth-first, parents before children. A
/// discontinuous feature is written as one line per segment, all sharing its
/// attributes.
pub fn write_annotations<W: Write>(inner: &mut W, annotations: &AnnotationSet) -> io::Result<()> {
    writeln!(inner, "{}", GFF3_HEADER)?;
    let mut writer = noodles::gff::io::Writer::new(inner);

    for seq in annotations.records() {
        for feature in seq.features.iter().flat_map(Feature::iter_tree) {
            let attributes = build_attributes(feature);
            for segment in feature.all_segments() {
                let record = build_record(&seq.id, feature, segment, attributes.clone())?;
                writer.write_record(&record)?;
            }
        }
    }
    Ok(())
}

fn build_record(
    seq_id: &str,
    feature: &Feature,
    segment: Segment,
    attributes: Attributes,
) -> io::Result<RecordBuf> {
    let start = Position::new(segment.location.start + 1)
        .ok_or_else(|| invalid_position(feature, segment.location.start + 1))?;
    let end = Position::new(segment.location.end)
        .ok_or_else(|| invalid_position(feature, segment.location.end))?;

    let mut builder = RecordBuf::builder()
        .set_reference_sequence_name(seq_id.to_string())
        .set_source(feature.qualifier(SOURCE).unwrap_or(".").to_string())
        .set_type(feature.ty.as_str().to_string())
        .set_start(start)
        .set_end(end)
        .set_strand(strand_to_record(segment.location.strand))
        .set_attributes(attributes);
    if let Some(score) = segment.score {
        builder = builder.set_score(score);
    }
    if let Some(phase) = segment.phase.and_then(phase_from_u8) {
        builder = builder.set_phase(phase);
    }
    Ok(builder.build())
}

/// `ID` first, then the remaining qualifiers in order; `source` is column 2.
fn build_attributes(feature: &Feature) -> Attributes {
    let id = feature.qualifiers.get_key_value(ID);
    let rest = feature
        .qualifiers
        .iter()
        .filter(|(key, _)| key.as_str() != ID && key.as_str() != SOURCE);

    id.into_iter()
        .chain(rest)
        .map(|(key, values)| {
            let value = match values.as_slice() {
                [value] => Value::String(value.as_str().into()),
                values => Value::Array(values.iter().map(|v| v.as_str().into()).collect()),
            };
            (Tag::from(key.as_str()), value)
        })
        .collect()
}

fn invalid_position(feature: &Feature, pos: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!(
            "invalid position {} for feature {}",
            pos,
            feature.id().unwrap_or(feature.ty.as_str())
        ),
    )
}

fn strand_from_record(strand: noodles::gff::feature::record::Strand) -> Strand {
    use noodles::gff::feature::record::Strand as GffStrand;
    match strand {
        GffStrand::Forward => Strand::Forward,
        GffStrand::Reverse => Strand::Reverse,
        GffStrand::None => Strand::None,
        GffStrand::Unknown => Strand::Unknown,
    }
}

fn strand_to_record(strand: Strand) -> noodles::gff::feature::record::Strand {
    use noodles::gff::feature::record::Strand as GffStrand;
    match strand {
        Strand::Forward => GffStrand::Forward,
        Strand::Reverse => GffStrand::Reverse,
        Strand::None => GffStrand::None,
        Strand::Unknown => GffStrand::Unknown,
    }
}

fn phase_from_u8(phase: u8) -> Option<Phase> {
    match phase {
        0 => Some(Phase::Zero),
        1 => Some(Phase::One),
        2 => Some(Phase::Two),
        _ => None,
    }
}

fn phase_to_u8(phase: Phase) -> u8 {
    match phase {
        Phase::Zero => 0,
        Phase::One => 1,
        Phase::Two => 2,
    }
}

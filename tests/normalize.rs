use gffmerge_rs::feature::{Location, Segment, Strand};
use gffmerge_rs::normalize::NORMALIZED_SOURCE;
use gffmerge_rs::{normalize_ids, normalize_model, Feature, TypeCounter};
use pretty_assertions::assert_eq;

fn feature(ty: &str, start: usize, end: usize) -> Feature {
    Feature::new(ty, Location::new(start, end, Strand::Forward))
}

fn ids(root: &Feature) -> Vec<String> {
    root.iter_tree()
        .map(|f| f.id().unwrap_or_default().to_string())
        .collect()
}

/// gene G1: mRNA(exon, exon), mRNA(CDS)
fn two_transcript_gene() -> Feature {
    feature("gene", 100, 900)
        .with_qualifier("ID", "apollo-gene-7f3a")
        .with_qualifier("Name", "apollo-gene-7f3a")
        .with_qualifier("description", "G1")
        .with_child(
            feature("mRNA", 100, 500)
                .with_qualifier("ID", "tx-a")
                .with_child(feature("exon", 100, 200).with_qualifier("Name", "e1"))
                .with_child(feature("exon", 300, 500)),
        )
        .with_child(
            feature("mRNA", 600, 900)
                .with_qualifier("ID", "tx-b")
                .with_child(feature("CDS", 650, 850).with_qualifier("ID", "cds-b")),
        )
}

#[test]
fn ids_follow_naming_grammar() {
    let mut gene = two_transcript_gene();
    normalize_model(&mut gene, "G1");

    assert_eq!(
        ids(&gene),
        vec!["G1", "G1.1", "G1.1.exon.1", "G1.1.exon.2", "G1.2", "G1.2.CDS.1"]
    );
}

#[test]
fn parents_point_at_enclosing_feature() {
    let mut gene = two_transcript_gene();
    normalize_model(&mut gene, "G1");

    let parents: Vec<Option<&str>> = gene.iter_tree().map(|f| f.qualifier("Parent")).collect();
    assert_eq!(
        parents,
        vec![
            None,
            Some("G1"),
            Some("G1.1"),
            Some("G1.1"),
            Some("G1"),
            Some("G1.2"),
        ]
    );
}

#[test]
fn names_only_on_gene_and_transcripts() {
    let mut gene = two_transcript_gene();
    normalize_model(&mut gene, "G1");

    assert_eq!(gene.name(), Some("G1"));
    assert_eq!(gene.children[0].name(), Some("G1.1"));
    assert_eq!(gene.children[1].name(), Some("G1.2"));
    // The first exon had a Name, the second did not; neither keeps one.
    assert_eq!(gene.children[0].children[0].name(), None);
    assert_eq!(gene.children[0].children[1].name(), None);
    assert_eq!(gene.children[1].children[0].name(), None);
}

#[test]
fn every_node_gets_normalized_source() {
    let mut gene = two_transcript_gene();
    normalize_model(&mut gene, "G1");

    assert!(gene
        .iter_tree()
        .all(|f| f.qualifier("source") == Some(NORMALIZED_SOURCE)));
}

#[test]
fn type_counters_continue_across_transcripts_of_one_gene() {
    let mut gene = feature("gene", 0, 100)
        .with_child(feature("mRNA", 0, 50).with_child(feature("exon", 0, 50)))
        .with_child(feature("mRNA", 60, 100).with_child(feature("exon", 60, 100)));
    normalize_model(&mut gene, "G2");

    assert_eq!(ids(&gene), vec!["G2", "G2.1", "G2.1.exon.1", "G2.2", "G2.2.exon.2"]);
}

#[test]
fn separate_genes_do_not_share_counters() {
    let mut genes = vec![
        feature("gene", 0, 100).with_child(feature("mRNA", 0, 100)),
        feature("gene", 200, 300).with_child(feature("mRNA", 200, 300)),
    ];
    normalize_ids(&mut genes[..1], "A", &mut TypeCounter::new());
    normalize_ids(&mut genes[1..], "B", &mut TypeCounter::new());

    assert_eq!(genes[0].children[0].id(), Some("A.1"));
    assert_eq!(genes[1].children[0].id(), Some("B.1"));
}

#[test]
fn other_qualifiers_are_kept_in_place() {
    let mut gene = feature("gene", 0, 100)
        .with_qualifier("description", "G3")
        .with_qualifier("ID", "old")
        .with_qualifier("Note", "curated");
    normalize_model(&mut gene, "G3");

    let keys: Vec<&str> = gene.qualifiers.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["description", "ID", "Note", "Name", "source"]);
    assert_eq!(gene.qualifier("Note"), Some("curated"));
}

#[test]
fn counter_starts_at_one() {
    let mut counter = TypeCounter::new();
    assert_eq!(counter.increment("exon"), 1);
    assert_eq!(counter.increment("exon"), 2);
    assert_eq!(counter.increment("CDS"), 1);
    assert_eq!(counter.increment("exon"), 3);
}

#[test]
fn segments_share_one_normalized_id() {
    let cds = feature("CDS", 150, 300).with_qualifier("ID", "cds-x").with_segment(Segment {
        location: Location::new(500, 850, Strand::Forward),
        score: None,
        phase: Some(2),
    });
    let mut gene = feature("gene", 100, 900).with_child(
        feature("mRNA", 100, 900)
            .with_child(cds)
            .with_child(feature("CDS", 860, 890)),
    );
    normalize_model(&mut gene, "G4");

    assert_eq!(ids(&gene), vec!["G4", "G4.1", "G4.1.CDS.1", "G4.1.CDS.2"]);
    assert_eq!(gene.children[0].children[0].all_segments().count(), 2);
}

//! Integration tests for fragment assembly and reconciliation
//!
//! Exercises the merge → finalize → serialize path the way an aligner drives
//! it: fragments parsed from text, merged per owner, then reconciled.

use fave_common::{
    AssemblyConfig, AssemblyStats, Document, DocumentAssembler, Error, Interval, IntervalTier,
    Item, Point, PointTier, ReconcileConfig, TextGridCodec, Tier, TierReconciler,
};

/// Fragment with one "phone" and one "word" tier, starting at zero
fn chunk(phones: &[(f64, f64, &str)], word: &str) -> Document {
    let end = phones.last().map(|p| p.1).unwrap_or(0.0);
    let mut phone = IntervalTier::new("phone", 0.0, end);
    for (start, stop, label) in phones {
        phone.append(Interval::new(*start, *stop, *label));
    }
    let mut words = IntervalTier::new("word", 0.0, end);
    words.append(Interval::new(0.0, end, word));

    let mut doc = Document::with_domain(0.0, end);
    doc.append(phone);
    doc.append(words);
    doc
}

fn labels(doc: &Document, tier: &str) -> Vec<String> {
    doc.tier(tier)
        .unwrap()
        .items()
        .iter()
        .map(|i| i.label().to_string())
        .collect()
}

#[test]
fn test_same_owner_fragments_concatenate_unsorted() {
    let assembler = DocumentAssembler::default();
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();

    let first = chunk(&[(0.0, 0.4, "K"), (0.4, 1.0, "AE")], "CAT");
    let second = chunk(&[(0.0, 0.5, "D"), (0.5, 0.9, "AO")], "DOG");
    assembler
        .merge_fragment(&mut master, second, "Speaker1", 5.0, &mut stats)
        .unwrap();
    assembler
        .merge_fragment(&mut master, first, "Speaker1", 1.0, &mut stats)
        .unwrap();

    assert_eq!(master.len(), 2);
    assert_eq!(labels(&master, "Speaker1 - phone"), ["D", "AO", "K", "AE"]);
    assert!(!master.tier("Speaker1 - phone").unwrap().is_sorted());
    assert_eq!(stats.items_merged, 6);
}

#[test]
fn test_full_assembly_two_speakers() {
    let assembler = DocumentAssembler::default();
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();

    let fragments = [
        ("Speaker1", 0.5, chunk(&[(0.0, 0.4, "K"), (0.4, 1.0, "AE")], "CAT")),
        ("Speaker2", 1.0, chunk(&[(0.0, 0.5, "D")], "DO")),
        ("Speaker1", 2.0, chunk(&[(0.0, 0.5, "T")], "TEA")),
    ];
    for (owner, offset, doc) in fragments {
        assembler
            .merge_fragment(&mut master, doc, owner, offset, &mut stats)
            .unwrap();
    }

    let report = assembler.finalize(&mut master, 0.0, 3.0, &mut stats).unwrap();
    assert!(report.conflicts.is_empty());
    assert_eq!(report.stats.fragments_merged, 3);
    assert_eq!(report.stats.tiers_created, 4);

    assert_eq!(
        labels(&master, "Speaker1 - phone"),
        ["sp", "K", "AE", "sp", "T", "sp"]
    );
    assert_eq!(labels(&master, "Speaker2 - word"), ["sp", "DO", "sp"]);
    for tier in master.iter() {
        assert_eq!((tier.min(), tier.max()), (0.0, 3.0));
        let items = tier.items();
        assert_eq!(items.first().unwrap().start(), 0.0);
        assert_eq!(items.last().unwrap().end(), 3.0);
        assert!(items.windows(2).all(|w| w[0].end() == w[1].start()));
    }

    // Output survives a write/read cycle
    let codec = TextGridCodec::default();
    let text = codec.serialize(&master).unwrap();
    assert_eq!(codec.parse(&text).unwrap(), master);
}

#[test]
fn test_chronological_merge_is_associative() {
    let assembler = DocumentAssembler::default();
    let parts = || {
        vec![
            (0.0, chunk(&[(0.0, 1.0, "A")], "ONE")),
            (2.0, chunk(&[(0.0, 1.0, "B")], "TWO")),
            (4.0, chunk(&[(0.0, 1.0, "C")], "THREE")),
        ]
    };

    let mut all_at_once = Document::new();
    let mut stats = AssemblyStats::new();
    for (offset, doc) in parts() {
        assembler
            .merge_fragment(&mut all_at_once, doc, "S", offset, &mut stats)
            .unwrap();
    }
    assembler
        .reconciler()
        .reconcile_document(&mut all_at_once, &mut stats);

    let mut staged = Document::new();
    let mut stats = AssemblyStats::new();
    let mut parts = parts().into_iter();
    for (offset, doc) in parts.by_ref().take(2) {
        assembler
            .merge_fragment(&mut staged, doc, "S", offset, &mut stats)
            .unwrap();
    }
    assembler.reconciler().reconcile_document(&mut staged, &mut stats);
    for (offset, doc) in parts {
        assembler
            .merge_fragment(&mut staged, doc, "S", offset, &mut stats)
            .unwrap();
    }
    assembler.reconciler().reconcile_document(&mut staged, &mut stats);

    assert_eq!(staged, all_at_once);
    assert_eq!(labels(&staged, "S - phone"), ["A", "sp", "B", "sp", "C"]);
}

#[test]
fn test_overlapping_fragments_are_reported_not_repaired() {
    let assembler = DocumentAssembler::default();
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();
    assembler
        .merge_fragment(&mut master, chunk(&[(0.0, 1.5, "AY")], "I"), "S", 0.0, &mut stats)
        .unwrap();
    assembler
        .merge_fragment(&mut master, chunk(&[(0.0, 1.0, "N")], "IN"), "S", 1.0, &mut stats)
        .unwrap();

    let report = assembler.finalize(&mut master, 0.0, 2.0, &mut stats).unwrap();
    assert_eq!(report.conflicts.len(), 2);
    assert_eq!(report.stats.overlaps_detected, 2);
    assert!(report.stats.has_problems());

    let phone = &report.conflicts[0];
    assert_eq!(phone.tier, "S - phone");
    assert_eq!(phone.first, Item::Interval(Interval::new(0.0, 1.5, "AY")));
    assert_eq!(phone.second, Item::Interval(Interval::new(1.0, 2.0, "N")));
    assert_eq!(labels(&master, "S - phone"), ["sp", "AY", "N", "sp"]);
    assert_eq!(
        phone.to_string(),
        "<Interval \"AY\" 0.000000:1.500000> and <Interval \"N\" 1.000000:2.000000> on tier S - phone"
    );
}

#[test]
fn test_reconcile_twice_adds_nothing_new() {
    let reconciler = TierReconciler::default();
    let mut tier = IntervalTier::new("phone", 0.0, 0.0);
    tier.append(Interval::new(3.0, 4.0, "T"));
    tier.append(Interval::new(0.0, 1.5, "AY"));
    tier.append(Interval::new(1.0, 2.0, "N"));
    let mut tier = Tier::Interval(tier);

    let first = reconciler.reconcile(&mut tier);
    let after_first = tier.clone();
    let second = reconciler.reconcile(&mut tier);

    assert_eq!(tier, after_first);
    assert_eq!(first.len(), 1);
    assert!(second.iter().all(|c| first.contains(c)));
}

#[test]
fn test_point_tiers_merge_and_widen_without_fillers() {
    let assembler = DocumentAssembler::default();
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();

    let mut tones = PointTier::new("tones", 0.0, 1.0);
    tones.append(Point::new(0.25, "H*"));
    let mut fragment = Document::new();
    fragment.append(tones);
    assembler
        .merge_fragment(&mut master, fragment, "S", 1.0, &mut stats)
        .unwrap();

    assembler.finalize(&mut master, 0.0, 4.0, &mut stats).unwrap();
    let tier = master.tier("S - tones").unwrap();
    assert_eq!(tier.len(), 1);
    assert_eq!((tier.min(), tier.max()), (0.0, 4.0));
    assert_eq!(tier.item(0).unwrap().start(), 1.25);
    assert_eq!(stats.fillers_inserted, 0);
}

#[test]
fn test_custom_separator_and_filler() {
    let assembler = DocumentAssembler::new(
        AssemblyConfig {
            tier_separator: "/".to_string(),
            ..AssemblyConfig::default()
        },
        ReconcileConfig {
            filler_label: "".to_string(),
            ..ReconcileConfig::default()
        },
    );
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();
    assembler
        .merge_fragment(&mut master, chunk(&[(0.0, 1.0, "K")], "CAT"), "S", 1.0, &mut stats)
        .unwrap();
    assembler.finalize(&mut master, 0.0, 2.0, &mut stats).unwrap();

    assert_eq!(labels(&master, "S/phone"), ["", "K", ""]);
    let tail = master.tier("S/phone").unwrap().item(2).unwrap();
    assert_eq!((tail.start(), tail.end()), (2.0, 2.0));
}

#[test]
fn test_finalize_domain_error_names_tier() {
    let assembler = DocumentAssembler::default();
    let mut master = Document::new();
    let mut stats = AssemblyStats::new();
    assembler
        .merge_fragment(&mut master, chunk(&[(0.0, 1.0, "K")], "CAT"), "S", 2.5, &mut stats)
        .unwrap();

    match assembler.finalize(&mut master, 0.0, 3.0, &mut stats) {
        Err(Error::Domain(err)) => {
            assert_eq!(err.tier, "S - phone");
            assert_eq!(err.current_max, 3.5);
            assert_eq!(err.requested_max, 3.0);
        }
        other => panic!("expected a domain error, got {:?}", other),
    }
    assert_eq!(stats.fillers_inserted, 0);
}

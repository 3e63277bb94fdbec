use super::*;
use crate::race::snapshot::Snapshot;

fn snap(year: i32, counts: &[(&str, f64)]) -> Snapshot {
    Snapshot::new(
        year,
        counts.iter().map(|(name, v)| (name.to_string(), *v)),
    )
}

fn series(categories: &[&str], snapshots: Vec<Snapshot>) -> SnapshotSeries {
    SnapshotSeries::new(
        categories.iter().map(|c| c.to_string()).collect(),
        snapshots,
    )
    .unwrap()
}

fn value(frame: &Keyframe, name: &str) -> f64 {
    frame.entry(name).unwrap().value
}

#[test]
fn ferrari_lotus_scenario_produces_eleven_frames() {
    let s = series(
        &["Ferrari", "Lotus"],
        vec![
            snap(1958, &[("Ferrari", 1.0)]),
            snap(1963, &[("Ferrari", 1.0), ("Lotus", 1.0)]),
        ],
    );
    let frames = build_keyframes(&s, 10).unwrap();

    assert_eq!(frames.len(), 11);
    assert_eq!(value(&frames[0], "Ferrari"), 1.0);
    assert_eq!(value(&frames[0], "Lotus"), 0.0);
    assert_eq!(value(&frames[10], "Ferrari"), 1.0);
    assert_eq!(value(&frames[10], "Lotus"), 1.0);
    assert!((value(&frames[5], "Lotus") - 0.5).abs() < 1e-12);

    assert_eq!(frames[0].time, 1958.0);
    assert_eq!(frames[5].time, 1960.5);
    assert_eq!(frames[5].year(), 1960);
    assert_eq!(frames[10].time, 1963.0);
    assert!(frames[10].exact);
    assert!(!frames[9].exact);
}

#[test]
fn frame_count_is_substeps_times_intervals_plus_one() {
    let s = series(
        &["A"],
        vec![
            snap(2000, &[("A", 1.0)]),
            snap(2005, &[("A", 2.0)]),
            snap(2010, &[("A", 4.0)]),
            snap(2012, &[("A", 5.0)]),
        ],
    );
    assert_eq!(build_keyframes(&s, 10).unwrap().len(), 31);
    assert_eq!(build_keyframes(&s, 3).unwrap().len(), 10);
}

#[test]
fn t_zero_reproduces_each_earlier_snapshot() {
    let snapshots = vec![
        snap(1958, &[("Ferrari", 1.0), ("Cooper", 0.0)]),
        snap(1963, &[("Ferrari", 1.0), ("Cooper", 2.0), ("Lotus", 1.0)]),
        snap(1968, &[("Ferrari", 2.0), ("Cooper", 2.0), ("Lotus", 3.0)]),
    ];
    let s = series(&["Ferrari", "Cooper", "Lotus"], snapshots.clone());
    let frames = build_keyframes(&s, 10).unwrap();

    for (interval, snapshot) in snapshots[..2].iter().enumerate() {
        let frame = &frames[interval * 10];
        assert!(frame.exact);
        for name in ["Ferrari", "Cooper", "Lotus"] {
            assert_eq!(value(frame, name), snapshot.value(name));
        }
    }
}

#[test]
fn final_keyframe_matches_last_snapshot_ranking() {
    let last = snap(1968, &[("Ferrari", 2.0), ("Cooper", 2.0), ("Lotus", 3.0)]);
    let s = series(
        &["Ferrari", "Cooper", "Lotus"],
        vec![snap(1958, &[("Ferrari", 1.0)]), last.clone()],
    );
    let frames = build_keyframes(&s, 7).unwrap();
    let expected = rank(s.categories(), |name| last.value(name));
    assert_eq!(frames.last().unwrap().ranking, expected);
    assert_eq!(
        expected.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["Lotus", "Ferrari", "Cooper"]
    );
}

#[test]
fn ranks_are_a_permutation_with_descending_values() {
    let s = series(
        &["A", "B", "C", "D"],
        vec![
            snap(1990, &[("A", 4.0), ("B", 0.0), ("C", 2.0)]),
            snap(1995, &[("A", 4.0), ("B", 6.0), ("C", 2.0), ("D", 9.0)]),
        ],
    );
    for frame in build_keyframes(&s, 10).unwrap() {
        assert_eq!(frame.ranking.len(), 4);
        for (i, entry) in frame.ranking.iter().enumerate() {
            assert_eq!(entry.rank, i);
        }
        for w in frame.ranking.windows(2) {
            assert!(w[0].value >= w[1].value);
        }
    }
}

#[test]
fn ties_keep_category_order() {
    let ranking = rank(
        &["B".to_string(), "A".to_string(), "C".to_string()],
        |name| if name == "C" { 3.0 } else { 1.0 },
    );
    let names: Vec<_> = ranking.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["C", "B", "A"]);
}

#[test]
fn unchanged_equal_categories_stay_identical() {
    let s = series(
        &["A", "B"],
        vec![
            snap(2000, &[("A", 10.0), ("B", 10.0)]),
            snap(2005, &[("A", 10.0), ("B", 10.0)]),
        ],
    );
    for frame in build_keyframes(&s, 10).unwrap() {
        assert_eq!(value(&frame, "A"), 10.0);
        assert_eq!(value(&frame, "B"), 10.0);
        assert_eq!(frame.ranking[0].name, "A");
    }
}

#[test]
fn single_snapshot_gives_one_exact_frame() {
    let s = series(&["A"], vec![snap(2024, &[("A", 3.0)])]);
    let frames = build_keyframes(&s, 10).unwrap();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].exact);
    assert_eq!(frames[0].year(), 2024);
}

#[test]
fn empty_series_gives_no_frames() {
    let frames = build_keyframes(&SnapshotSeries::default(), 10).unwrap();
    assert!(frames.is_empty());
}

#[test]
fn zero_substeps_is_rejected() {
    let s = series(&["A"], vec![snap(2024, &[("A", 3.0)])]);
    assert!(build_keyframes(&s, 0).is_err());
}

#[test]
fn build_is_deterministic() {
    let s = series(
        &["A", "B"],
        vec![snap(2000, &[("A", 1.0)]), snap(2005, &[("B", 3.0)])],
    );
    assert_eq!(build_keyframes(&s, 10).unwrap(), build_keyframes(&s, 10).unwrap());
}

#[test]
fn top_truncates_to_available_entries() {
    let s = series(&["A", "B"], vec![snap(2000, &[("A", 1.0)])]);
    let frame = &build_keyframes(&s, 10).unwrap()[0];
    assert_eq!(frame.top(8).len(), 2);
    assert_eq!(frame.top(1).len(), 1);
}

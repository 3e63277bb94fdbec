use super::*;
use crate::data::ingest::ChampionRow;

fn tally_over(first: i32, last: i32) -> TitleTally {
    let rows: Vec<ChampionRow> = (first..=last)
        .map(|year| ChampionRow {
            year,
            constructor: if year % 2 == 0 { "Ferrari" } else { "Lotus" }.to_string(),
        })
        .collect();
    TitleTally::from_rows(&rows).unwrap()
}

#[test]
fn stride_includes_unaligned_final_year() {
    let series = SnapshotSeries::sample(&tally_over(1958, 2024), 5).unwrap();
    let years = series.years();
    assert_eq!(years.first(), Some(&1958));
    assert_eq!(&years[years.len() - 2..], &[2023, 2024]);
    assert!((2024 - 1958) % 5 != 0);
    assert_eq!(years.len(), 15);
}

#[test]
fn aligned_final_year_is_not_duplicated() {
    let series = SnapshotSeries::sample(&tally_over(1960, 1970), 5).unwrap();
    assert_eq!(series.years(), vec![1960, 1965, 1970]);
}

#[test]
fn zero_stride_is_rejected() {
    assert!(SnapshotSeries::sample(&tally_over(1960, 1961), 0).is_err());
}

#[test]
fn empty_tally_gives_empty_series() {
    let series = SnapshotSeries::sample(&TitleTally::default(), 5).unwrap();
    assert!(series.is_empty());
}

#[test]
fn snapshot_values_are_cumulative_counts() {
    let series = SnapshotSeries::sample(&tally_over(1960, 1965), 5).unwrap();
    let last = &series.snapshots()[1];
    assert_eq!(last.year, 1965);
    assert_eq!(last.value("Ferrari"), 3.0);
    assert_eq!(last.value("Lotus"), 3.0);
    assert_eq!(last.value("Brabham"), 0.0);
}

#[test]
fn hand_built_series_requires_increasing_years() {
    let a = Snapshot::new(1960, [("A".to_string(), 1.0)]);
    let b = Snapshot::new(1960, [("B".to_string(), 1.0)]);
    assert!(SnapshotSeries::new(vec![], vec![a.clone(), b]).is_err());

    let c = Snapshot::new(1965, [("C".to_string(), 2.0)]);
    let series = SnapshotSeries::new(vec!["Z".to_string()], vec![a, c]).unwrap();
    assert_eq!(series.categories(), ["Z", "A", "C"]);
}

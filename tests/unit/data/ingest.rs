use super::*;

#[test]
fn parses_and_trims_rows() {
    let csv = "year,constructor\n1958, Vanwall \n1959,Cooper\n";
    let rows = read_champions(csv.as_bytes()).unwrap();
    assert_eq!(
        rows,
        vec![
            ChampionRow {
                year: 1958,
                constructor: "Vanwall".to_string()
            },
            ChampionRow {
                year: 1959,
                constructor: "Cooper".to_string()
            },
        ]
    );
}

#[test]
fn header_match_is_case_insensitive_and_ignores_extra_columns() {
    let csv = "Season,Constructor,Engine,Year\nx,Ferrari,Ferrari,1961\n";
    let rows = read_champions(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].year, 1961);
    assert_eq!(rows[0].constructor, "Ferrari");
}

#[test]
fn missing_column_is_a_dataset_error() {
    let err = read_champions("year,team\n1958,Vanwall\n".as_bytes()).unwrap_err();
    assert!(matches!(err, PodiumError::Dataset(_)));
    assert!(err.to_string().contains("constructor"));
}

#[test]
fn malformed_year_reports_line() {
    let err = read_champions("year,constructor\n1958,Vanwall\nabc,Cooper\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, PodiumError::Dataset(_)));
    assert!(err.to_string().contains("line 3"));
}

#[test]
fn empty_table_is_not_an_error() {
    assert!(read_champions("year,constructor\n".as_bytes()).unwrap().is_empty());
}

#[test]
fn blank_constructors_are_skipped() {
    let rows = read_champions("year,constructor\n1958,\n1959,Cooper\n".as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].constructor, "Cooper");
}

#[test]
fn missing_file_is_a_dataset_error() {
    let err = load_champions(Path::new("definitely/not/here.csv")).unwrap_err();
    assert!(matches!(err, PodiumError::Dataset(_)));
}

#[test]
fn source_parse_distinguishes_urls() {
    assert_eq!(
        DatasetSource::parse("https://example.org/champions.csv"),
        DatasetSource::Url("https://example.org/champions.csv".to_string())
    );
    assert_eq!(
        DatasetSource::parse("data/champions.csv"),
        DatasetSource::Path(PathBuf::from("data/champions.csv"))
    );
}

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::foundation::error::{PodiumError, PodiumResult};

/// One championship result: the constructor that won the title in `year`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChampionRow {
    pub year: i32,
    pub constructor: String,
}

/// Where the champions table is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Path(PathBuf),
    /// Fetched once with a single GET. Requires the `http` feature.
    Url(String),
}

impl DatasetSource {
    /// Interpret `input` as a URL when it starts with `http://` or `https://`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }

    /// Directory that relative theme assets resolve against, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => p.parent(),
            Self::Url(_) => None,
        }
    }

    #[tracing::instrument]
    pub fn load(&self) -> PodiumResult<Vec<ChampionRow>> {
        match self {
            Self::Path(path) => load_champions(path),
            Self::Url(url) => fetch_champions(url),
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

pub fn load_champions(path: &Path) -> PodiumResult<Vec<ChampionRow>> {
    let file = File::open(path).map_err(|e| {
        PodiumError::dataset(format!("open dataset '{}': {e}", path.display()))
    })?;
    read_champions(file).map_err(|e| match e {
        PodiumError::Dataset(msg) => PodiumError::dataset(format!("{}: {msg}", path.display())),
        other => other,
    })
}

#[cfg(feature = "http")]
fn fetch_champions(url: &str) -> PodiumResult<Vec<ChampionRow>> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| PodiumError::dataset(format!("GET {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PodiumError::dataset(format!("GET {url}: status {status}")));
    }

    let body = response
        .text()
        .map_err(|e| PodiumError::dataset(format!("GET {url}: read body: {e}")))?;
    read_champions(body.as_bytes())
}

#[cfg(not(feature = "http"))]
fn fetch_champions(url: &str) -> PodiumResult<Vec<ChampionRow>> {
    Err(PodiumError::dataset(format!(
        "cannot fetch '{url}': podium was built without the `http` feature"
    )))
}

/// Parse a champions table.
///
/// The header must contain `year` and `constructor` (case-insensitive); other columns
/// are ignored. Cells are trimmed. Rows with a blank constructor are skipped.
pub fn read_champions<R: Read>(reader: R) -> PodiumResult<Vec<ChampionRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv
        .headers()
        .map_err(|e| PodiumError::dataset(format!("read csv header: {e}")))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
            .ok_or_else(|| PodiumError::dataset(format!("csv header is missing `{name}`")))
    };
    let year_col = column("year")?;
    let constructor_col = column("constructor")?;

    let mut rows = Vec::new();
    for (i, record) in csv.records().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let record =
            record.map_err(|e| PodiumError::dataset(format!("csv line {line}: {e}")))?;

        let constructor = record.get(constructor_col).unwrap_or("").trim();
        if constructor.is_empty() {
            tracing::warn!(line, "skipping row without a constructor");
            continue;
        }

        let year_raw = record.get(year_col).unwrap_or("");
        let year = year_raw.parse::<i32>().map_err(|_| {
            PodiumError::dataset(format!("csv line {line}: invalid year '{year_raw}'"))
        })?;

        rows.push(ChampionRow {
            year,
            constructor: constructor.to_string(),
        });
    }

    tracing::debug!(rows = rows.len(), "parsed champions table");
    Ok(rows)
}

#[cfg(test)]
#[path = "../../tests/unit/data/ingest.rs"]
mod tests;

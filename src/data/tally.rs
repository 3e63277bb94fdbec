use std::collections::{BTreeMap, HashMap};

use crate::data::ingest::ChampionRow;
use crate::foundation::error::{PodiumError, PodiumResult};

/// Widest year range a dataset may cover. One tally row is kept per year.
pub const MAX_YEAR_SPAN: u32 = 1000;

/// Cumulative title counts for every year of the dataset.
///
/// Categories keep the order in which they first appear in the rows; that order
/// breaks ranking ties downstream. Every year between the first and last row is
/// present, including years nobody won.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleTally {
    categories: Vec<String>,
    first_year: i32,
    // One row per year starting at `first_year`, one column per category.
    cumulative: Vec<Vec<u32>>,
}

impl TitleTally {
    #[tracing::instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: &[ChampionRow]) -> PodiumResult<Self> {
        let Some(first_year) = rows.iter().map(|r| r.year).min() else {
            return Ok(Self::default());
        };
        let last_year = rows.iter().map(|r| r.year).max().unwrap_or(first_year);
        let span = i64::from(last_year) - i64::from(first_year) + 1;
        if span > i64::from(MAX_YEAR_SPAN) {
            return Err(PodiumError::dataset(format!(
                "years {first_year}..={last_year} span {span} years (max {MAX_YEAR_SPAN})"
            )));
        }

        let mut categories: Vec<String> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            if !index.contains_key(row.constructor.as_str()) {
                index.insert(row.constructor.as_str(), categories.len());
                categories.push(row.constructor.clone());
            }
        }

        // A year listed twice keeps its last row.
        let champion_by_year: BTreeMap<i32, usize> = rows
            .iter()
            .map(|r| (r.year, index[r.constructor.as_str()]))
            .collect();

        let mut running = vec![0u32; categories.len()];
        let mut cumulative = Vec::with_capacity(span as usize);
        for year in first_year..=last_year {
            if let Some(&winner) = champion_by_year.get(&year) {
                running[winner] += 1;
            }
            cumulative.push(running.clone());
        }

        tracing::debug!(
            categories = categories.len(),
            years = cumulative.len(),
            "tallied cumulative titles"
        );

        Ok(Self {
            categories,
            first_year,
            cumulative,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn first_year(&self) -> Option<i32> {
        (!self.is_empty()).then_some(self.first_year)
    }

    pub fn last_year(&self) -> Option<i32> {
        (!self.is_empty()).then(|| self.first_year + self.cumulative.len() as i32 - 1)
    }

    /// Counts for `year`, aligned with [`TitleTally::categories`].
    pub fn counts_at(&self, year: i32) -> Option<&[u32]> {
        let offset = usize::try_from(year.checked_sub(self.first_year)?).ok()?;
        self.cumulative.get(offset).map(Vec::as_slice)
    }

    /// Cumulative titles of `name` at `year`; unknown names and years read as 0.
    pub fn count(&self, year: i32, name: &str) -> u32 {
        let Some(col) = self.categories.iter().position(|c| c == name) else {
            return 0;
        };
        self.counts_at(year).map_or(0, |counts| counts[col])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/tally.rs"]
mod tests;

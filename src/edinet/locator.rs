use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use std::fmt;

use super::error::ResolveError;
use super::registry::{DocCategory, FilingRecord, FilingRegistry};

/// One resolve invocation's search parameters. Immutable once built.
#[derive(Debug, Clone)]
pub struct FilingQuery {
    /// Case-sensitive substring matched against the registry's filer name.
    pub filer_pattern: String,
    pub categories: CategoryFilter,
    /// Calendar-day scan budget; weekend days skipped by
    /// `business_days_only` still consume it.
    pub days_back: u32,
    pub business_days_only: bool,
}

impl FilingQuery {
    pub fn new(filer_pattern: impl Into<String>) -> FilingQuery {
        FilingQuery {
            filer_pattern: filer_pattern.into(),
            categories: CategoryFilter::default(),
            days_back: 60,
            business_days_only: true,
        }
    }
}

/// Which document categories a filing must belong to. Defaults to the
/// three periodic reports.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    allowed: Vec<DocCategory>,
}

impl CategoryFilter {
    pub fn periodic_reports() -> CategoryFilter {
        CategoryFilter {
            allowed: vec![
                DocCategory::AnnualReport,
                DocCategory::QuarterlyReport,
                DocCategory::SemiAnnualReport,
            ],
        }
    }

    pub fn only(allowed: Vec<DocCategory>) -> CategoryFilter {
        CategoryFilter { allowed }
    }

    pub fn matches(&self, category: &DocCategory) -> bool {
        self.allowed.contains(category)
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        CategoryFilter::periodic_reports()
    }
}

/// Aggregated per-day outcomes of one scan. Failed days are swallowed by
/// the scan but kept here so a NotFound can say what actually happened.
#[derive(Debug, Clone, Default)]
pub struct ScanLog {
    pub queried: u32,
    pub skipped: u32,
    pub failures: Vec<(NaiveDate, String)>,
}

impl fmt::Display for ScanLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} day(s) queried, {} skipped as non-business, {} registry failure(s)",
            self.queried,
            self.skipped,
            self.failures.len()
        )
    }
}

/// Backward date-window scan against the paginated-by-day registry.
pub struct Locator<'a, R> {
    registry: &'a R,
}

impl<'a, R: FilingRegistry> Locator<'a, R> {
    pub fn new(registry: &'a R) -> Locator<'a, R> {
        Locator { registry }
    }

    pub async fn locate(&self, query: &FilingQuery) -> Result<FilingRecord, ResolveError> {
        self.locate_from(query, Local::now().date_naive()).await
    }

    /// Scan `query.days_back` calendar days backward starting the day
    /// before `today`. Within a day, records are checked in registry order
    /// and the first predicate match wins; across days, the nearer day
    /// wins because it is reached first. A failed day is recorded and the
    /// scan moves on.
    pub async fn locate_from(
        &self,
        query: &FilingQuery,
        today: NaiveDate,
    ) -> Result<FilingRecord, ResolveError> {
        let mut scan = ScanLog::default();

        for offset in 1..=i64::from(query.days_back) {
            let date = today - Duration::days(offset);
            if query.business_days_only
                && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
            {
                scan.skipped += 1;
                continue;
            }

            scan.queried += 1;
            let listing = match self.registry.list_documents(date).await {
                Ok(listing) => listing,
                Err(e) => {
                    log::warn!("Registry query for {} failed: {}", date, e);
                    scan.failures.push((date, e.to_string()));
                    continue;
                }
            };

            log::debug!("{}: {} filing(s) listed", date, listing.results.len());
            for record in listing.results {
                if record.doc_id.is_empty() {
                    continue;
                }
                if record.filer_name.contains(&query.filer_pattern)
                    && query.categories.matches(&record.category())
                {
                    log::info!(
                        "Located {} | {} | docID {} on {}",
                        record.filer_name,
                        record.description,
                        record.doc_id,
                        date
                    );
                    return Ok(record);
                }
            }
        }

        Err(ResolveError::DocumentNotFound {
            pattern: query.filer_pattern.clone(),
            days: query.days_back,
            scan,
        })
    }
}

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::archive::{self, Payload};
use super::error::{AttemptError, ResolveError};
use super::locator::{FilingQuery, Locator};
use super::metrics::{AliasTable, MetricSet};
use super::registry::{DownloadKind, FilingRecord, FilingRegistry};
use super::{tabular, tagged, Representation};

/// A successful extraction, tagged with the representation that actually
/// produced the metrics.
#[derive(Debug, Serialize)]
pub struct Extraction {
    #[serde(skip)]
    pub record: FilingRecord,
    pub representation: Representation,
    pub metrics: MetricSet,
}

/// Sequences locate -> fetch -> extract with a single fallback to the
/// alternate representation. Owns no state across calls; every invocation
/// runs its own scan and its own attempts.
pub struct Orchestrator<R> {
    registry: R,
    aliases: AliasTable,
}

impl<R: FilingRegistry> Orchestrator<R> {
    pub fn new(registry: R) -> Orchestrator<R> {
        Orchestrator {
            registry,
            aliases: AliasTable::default(),
        }
    }

    pub fn with_aliases(registry: R, aliases: AliasTable) -> Orchestrator<R> {
        Orchestrator { registry, aliases }
    }

    pub async fn resolve_and_extract(
        &self,
        query: &FilingQuery,
    ) -> Result<Extraction, ResolveError> {
        self.resolve_and_extract_from(query, Local::now().date_naive())
            .await
    }

    /// `today` is injectable so scans are reproducible under test.
    pub async fn resolve_and_extract_from(
        &self,
        query: &FilingQuery,
        today: NaiveDate,
    ) -> Result<Extraction, ResolveError> {
        let record = Locator::new(&self.registry)
            .locate_from(query, today)
            .await?;

        let preferred = if record.has_tabular_variant() {
            Representation::Tabular
        } else {
            Representation::Tagged
        };

        match self.attempt(&record.doc_id, preferred).await {
            Ok(metrics) => Ok(Extraction {
                record,
                representation: preferred,
                metrics,
            }),
            Err(first) => {
                let fallback = preferred.alternate();
                // Only the last cause is surfaced; the first is logged.
                log::warn!(
                    "{} attempt failed for {} ({}), falling back to {}",
                    preferred,
                    record.doc_id,
                    first,
                    fallback
                );
                match self.attempt(&record.doc_id, fallback).await {
                    Ok(metrics) => Ok(Extraction {
                        record,
                        representation: fallback,
                        metrics,
                    }),
                    Err(last) => Err(ResolveError::ExtractionFailed {
                        doc_id: record.doc_id,
                        representation: fallback,
                        cause: last,
                    }),
                }
            }
        }
    }

    async fn attempt(
        &self,
        doc_id: &str,
        representation: Representation,
    ) -> Result<MetricSet, AttemptError> {
        let download = self.registry.fetch_archive(doc_id, representation).await?;
        match download.kind {
            DownloadKind::Archive => {}
            DownloadKind::Document(kind) => {
                return Err(AttemptError::UnexpectedContentType(kind));
            }
            DownloadKind::Unrecognized(raw) => {
                return Err(AttemptError::UnexpectedContentType(raw));
            }
        }

        let entry = archive::extract_entry(&download.bytes, representation)?;
        match entry.payload {
            Payload::Tabular { bytes, encoding } => {
                tabular::extract_metrics(&bytes, &encoding, &self.aliases)
            }
            Payload::Tagged { text } => tagged::extract_metrics(&text, &self.aliases),
        }
    }
}

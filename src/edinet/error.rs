use thiserror::Error;

use super::locator::ScanLog;
use super::Representation;

/// Failure of a single registry or archive-server call. Listing failures
/// are swallowed per day by the locator; download failures feed the
/// orchestrator's fallback.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("registry returned HTTP {0}")]
    Status(u16),
    #[error("malformed registry response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure of one retrieval+extraction attempt against one representation.
/// Any variant triggers the orchestrator's single fallback to the
/// alternate representation.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("archive download failed")]
    Download(#[from] RegistryError),
    #[error("server responded with {0:?} instead of a zip archive")]
    UnexpectedContentType(String),
    #[error("archive is not a valid zip container")]
    CorruptArchive(#[source] zip::result::ZipError),
    #[error("archive holds no {0} entry")]
    NoMatchingEntry(Representation),
    #[error("failed to decode archive entry as {encoding}")]
    PayloadDecode {
        encoding: String,
        #[source]
        source: std::io::Error,
    },
    #[error("table is missing required column(s): {missing}")]
    MalformedTabularSchema { missing: String },
    #[error("tagged document failed to parse")]
    MalformedTaggedDocument(#[from] roxmltree::Error),
}

/// Terminal outcome of a full resolve-and-extract run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no filing matched `{pattern}` within the last {days} day(s) ({scan})")]
    DocumentNotFound {
        pattern: String,
        days: u32,
        scan: ScanLog,
    },
    #[error("extraction failed for document {doc_id}; last attempt ({representation}) did not succeed")]
    ExtractionFailed {
        doc_id: String,
        representation: Representation,
        #[source]
        cause: AttemptError,
    },
}

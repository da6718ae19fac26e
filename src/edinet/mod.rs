pub mod archive;
pub mod error;
pub mod locator;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod tabular;
pub mod tagged;

use serde::Serialize;
use std::fmt;

pub use error::{AttemptError, RegistryError, ResolveError};
pub use locator::{CategoryFilter, FilingQuery, Locator, ScanLog};
pub use metrics::{AliasTable, Metric, MetricSet, MetricValue};
pub use orchestrator::{Extraction, Orchestrator};
pub use registry::{DayListing, DocCategory, FilingRecord, FilingRegistry, HttpRegistry};

/// The two mutually exclusive payload formats an EDINET archive may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Representation {
    /// Flat CSV export (`csvFlag = "1"` filings).
    Tabular,
    /// XBRL instance document under the public-document tree.
    Tagged,
}

impl Representation {
    /// `type` parameter of the document-retrieval endpoint. Code 2 (raw
    /// PDF) exists in the API but is never requested here.
    pub fn type_code(self) -> u8 {
        match self {
            Representation::Tabular => 5,
            Representation::Tagged => 1,
        }
    }

    pub fn alternate(self) -> Representation {
        match self {
            Representation::Tabular => Representation::Tagged,
            Representation::Tagged => Representation::Tabular,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Tabular => write!(f, "tabular (csv)"),
            Representation::Tagged => write!(f, "tagged (xbrl)"),
        }
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use mime::Mime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::error::RegistryError;
use super::Representation;
use crate::core::config::EdinetConfig;

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// `type` parameter of the listing endpoint: 2 = metadata plus results.
const LISTING_TYPE: u8 = 2;

const LISTING_TIMEOUT: Duration = Duration::from_secs(10);
const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(15);

/// Document category derived from the registry's `docTypeCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocCategory {
    /// 有価証券報告書 (code 120)
    AnnualReport,
    /// 四半期報告書 (code 140)
    QuarterlyReport,
    /// 半期報告書 (code 160)
    SemiAnnualReport,
    Other(String),
}

impl DocCategory {
    pub fn from_code(code: &str) -> DocCategory {
        match code {
            "120" => DocCategory::AnnualReport,
            "140" => DocCategory::QuarterlyReport,
            "160" => DocCategory::SemiAnnualReport,
            other => DocCategory::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for DocCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annual" => Ok(DocCategory::AnnualReport),
            "quarterly" => Ok(DocCategory::QuarterlyReport),
            "semiannual" => Ok(DocCategory::SemiAnnualReport),
            other => Err(format!(
                "unknown category `{}` (expected annual, quarterly or semiannual)",
                other
            )),
        }
    }
}

/// One filing as listed by the registry for a given day. Consumed
/// read-only; `doc_id` is the sole key ever used to request an archive.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingRecord {
    #[serde(rename = "docID", default)]
    pub doc_id: String,
    #[serde(rename = "filerName", default)]
    pub filer_name: String,
    #[serde(rename = "docDescription", default)]
    pub description: String,
    #[serde(rename = "docTypeCode", default)]
    pub doc_type_code: String,
    #[serde(rename = "csvFlag", default)]
    pub csv_flag: String,
}

impl FilingRecord {
    pub fn category(&self) -> DocCategory {
        DocCategory::from_code(&self.doc_type_code)
    }

    pub fn has_tabular_variant(&self) -> bool {
        self.csv_flag == "1"
    }
}

/// The registry's listing for one calendar day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayListing {
    #[serde(default)]
    pub results: Vec<FilingRecord>,
}

/// What the archive endpoint actually returned, classified from the
/// response `Content-Type` instead of leaking header strings downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadKind {
    Archive,
    Document(String),
    Unrecognized(String),
}

#[derive(Debug, Clone)]
pub struct ArchiveDownload {
    pub kind: DownloadKind,
    pub bytes: Vec<u8>,
}

pub(crate) fn classify_content_type(raw: &str) -> DownloadKind {
    if raw.contains("zip") {
        return DownloadKind::Archive;
    }
    match raw.parse::<Mime>() {
        Ok(m) if m == mime::APPLICATION_PDF => DownloadKind::Document("pdf".to_string()),
        Ok(m) => DownloadKind::Unrecognized(m.to_string()),
        Err(_) => DownloadKind::Unrecognized(raw.to_string()),
    }
}

/// The date-indexed filings registry and its archive server.
#[async_trait]
pub trait FilingRegistry {
    /// One external call per scanned day.
    async fn list_documents(&self, date: NaiveDate) -> Result<DayListing, RegistryError>;

    /// Fetch the packaged archive for `doc_id` in the given representation.
    async fn fetch_archive(
        &self,
        doc_id: &str,
        representation: Representation,
    ) -> Result<ArchiveDownload, RegistryError>;
}

/// EDINET v2 HTTP implementation.
pub struct HttpRegistry {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl HttpRegistry {
    pub fn new(config: &EdinetConfig) -> HttpRegistry {
        HttpRegistry {
            client: Client::new(),
            endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl FilingRegistry for HttpRegistry {
    async fn list_documents(&self, date: NaiveDate) -> Result<DayListing, RegistryError> {
        let url = format!("{}/documents.json", self.endpoint);
        log::debug!("Listing request: {} date={}", url, date);

        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .query(&[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("type", LISTING_TYPE.to_string()),
            ])
            .timeout(LISTING_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        log::debug!("Listing response status: {}", status);
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let listing: DayListing = serde_json::from_str(&body)?;
        Ok(listing)
    }

    async fn fetch_archive(
        &self,
        doc_id: &str,
        representation: Representation,
    ) -> Result<ArchiveDownload, RegistryError> {
        let url = format!("{}/documents/{}", self.endpoint, doc_id);
        log::debug!(
            "Archive request: {} type={}",
            url,
            representation.type_code()
        );

        let response = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .query(&[("type", representation.type_code().to_string())])
            .timeout(ARCHIVE_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let kind = classify_content_type(&content_type);
        log::debug!("Archive response content-type: {:?} -> {:?}", content_type, kind);

        let bytes = response.bytes().await?.to_vec();
        Ok(ArchiveDownload { kind, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_map_to_report_kinds() {
        assert_eq!(DocCategory::from_code("120"), DocCategory::AnnualReport);
        assert_eq!(DocCategory::from_code("140"), DocCategory::QuarterlyReport);
        assert_eq!(DocCategory::from_code("160"), DocCategory::SemiAnnualReport);
        assert_eq!(
            DocCategory::from_code("030"),
            DocCategory::Other("030".to_string())
        );
    }

    #[test]
    fn content_type_classification() {
        assert_eq!(
            classify_content_type("application/zip"),
            DownloadKind::Archive
        );
        assert_eq!(
            classify_content_type("application/x-zip-compressed; charset=binary"),
            DownloadKind::Archive
        );
        assert_eq!(
            classify_content_type("application/pdf"),
            DownloadKind::Document("pdf".to_string())
        );
        assert_eq!(
            classify_content_type("application/json"),
            DownloadKind::Unrecognized("application/json".to_string())
        );
        assert_eq!(
            classify_content_type(""),
            DownloadKind::Unrecognized("".to_string())
        );
    }

    #[test]
    fn listing_parses_registry_shape() {
        let body = r#"{
            "metadata": {"status": "200"},
            "results": [
                {
                    "docID": "S100ABCD",
                    "filerName": "トヨタ自動車株式会社",
                    "docDescription": "有価証券報告書",
                    "docTypeCode": "120",
                    "csvFlag": "1"
                },
                {"docID": "S100WXYZ"}
            ]
        }"#;
        let listing: DayListing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.results.len(), 2);
        assert!(listing.results[0].has_tabular_variant());
        assert_eq!(listing.results[0].category(), DocCategory::AnnualReport);
        assert!(!listing.results[1].has_tabular_variant());
        assert_eq!(listing.results[1].filer_name, "");
    }

    #[test]
    fn listing_without_results_defaults_empty() {
        let listing: DayListing = serde_json::from_str(r#"{"metadata": {}}"#).unwrap();
        assert!(listing.results.is_empty());
    }
}

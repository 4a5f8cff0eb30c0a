use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::{Client, Error as ReqwestError, multipart};
use std::env;
use std::time::Duration;

use crate::application::ports::metadata_extractor::{MetadataExtractionError, MetadataExtractor};
use crate::domain::value_objects::DocumentMetadata;

#[derive(Debug, Clone)]
pub struct GrobidClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GrobidClientConfig {
    fn default() -> Self {
        let base_url =
            env::var("GROBID_URL").unwrap_or_else(|_| "http://localhost:8070".to_string());

        Self {
            base_url,
            timeout_secs: 60,
        }
    }
}

/// GROBID header extraction: posts the PDF to `processFulltextDocument` and
/// reads the bibliographic fields out of the returned TEI XML.
pub struct GrobidClient {
    client: Client,
    config: GrobidClientConfig,
}

impl GrobidClient {
    pub fn new(config: GrobidClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ReqwestError> {
        Self::new(GrobidClientConfig::default())
    }
}

#[async_trait]
impl MetadataExtractor for GrobidClient {
    async fn extract_metadata(
        &self,
        pdf_bytes: &[u8],
        file_name: &str,
    ) -> Result<DocumentMetadata, MetadataExtractionError> {
        let part = multipart::Part::bytes(pdf_bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| MetadataExtractionError::ExtractionFailed(e.to_string()))?;
        let form = multipart::Form::new().part("input", part);

        let url = format!("{}/api/processFulltextDocument", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MetadataExtractionError::Timeout(e.without_url().to_string())
                } else {
                    MetadataExtractionError::ServiceUnavailable(e.without_url().to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(MetadataExtractionError::ExtractionFailed(format!(
                "GROBID returned status {}",
                response.status()
            )));
        }

        let tei = response
            .text()
            .await
            .map_err(|e| MetadataExtractionError::ExtractionFailed(e.without_url().to_string()))?;

        if tei.trim().is_empty() {
            return Err(MetadataExtractionError::ExtractionFailed(
                "GROBID returned an empty document".to_string(),
            ));
        }

        parse_tei_metadata(&tei).map_err(MetadataExtractionError::ParseError)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/isalive", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Pull title, authors, abstract, publication date and reference count out
/// of a TEI document. Only the header's first title and the analytic author
/// list are considered; body authors of cited works are skipped because they
/// live under `listBibl`.
pub fn parse_tei_metadata(tei: &str) -> Result<DocumentMetadata, String> {
    let mut reader = Reader::from_str(tei);
    reader.config_mut().trim_text(true);

    let mut title: Option<String> = None;
    let mut authors: Vec<String> = Vec::new();
    let mut abstract_text = String::new();
    let mut publication_date: Option<String> = None;
    let mut reference_count = 0;

    let mut in_title_stmt = false;
    let mut in_title = false;
    let mut in_abstract = false;
    let mut in_list_bibl = false;
    let mut in_author = false;
    let mut in_pers_name = false;
    let mut in_forename = false;
    let mut in_surname = false;
    let mut title_text = String::new();
    let mut forename = String::new();
    let mut surname = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"titleStmt" => in_title_stmt = true,
                b"title" if in_title_stmt && title.is_none() => {
                    in_title = true;
                    title_text.clear();
                }
                b"abstract" => in_abstract = true,
                b"listBibl" => in_list_bibl = true,
                b"biblStruct" if in_list_bibl => reference_count += 1,
                b"author" if !in_list_bibl => {
                    in_author = true;
                    forename.clear();
                    surname.clear();
                }
                b"persName" if in_author => in_pers_name = true,
                b"forename" if in_pers_name => in_forename = true,
                b"surname" if in_pers_name => in_surname = true,
                b"date" if publication_date.is_none() && !in_list_bibl => {
                    publication_date = when_attribute(&e);
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"date" if publication_date.is_none() && !in_list_bibl => {
                    publication_date = when_attribute(&e);
                }
                b"biblStruct" if in_list_bibl => reference_count += 1,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| err.to_string())?;
                if in_title {
                    title_text.push_str(&text);
                } else if in_forename {
                    forename.push_str(&text);
                } else if in_surname {
                    surname.push_str(&text);
                } else if in_abstract {
                    if !abstract_text.is_empty() {
                        abstract_text.push(' ');
                    }
                    abstract_text.push_str(text.trim());
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"titleStmt" => in_title_stmt = false,
                b"title" if in_title => {
                    in_title = false;
                    if !title_text.trim().is_empty() {
                        title = Some(title_text.trim().to_string());
                    }
                }
                b"abstract" => in_abstract = false,
                b"listBibl" => in_list_bibl = false,
                b"author" if in_author => {
                    in_author = false;
                    let full_name = format!("{} {}", forename.trim(), surname.trim())
                        .trim()
                        .to_string();
                    if !full_name.is_empty() {
                        authors.push(full_name);
                    }
                }
                b"persName" => in_pers_name = false,
                b"forename" => in_forename = false,
                b"surname" => in_surname = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("Malformed TEI XML: {}", e)),
            _ => {}
        }
    }

    let appears_academic = !abstract_text.is_empty() || reference_count > 0;

    let mut metadata = DocumentMetadata::new()
        .with_title(title)
        .with_authors(if authors.is_empty() {
            None
        } else {
            Some(authors.join(", "))
        })
        .with_abstract(if abstract_text.is_empty() {
            None
        } else {
            Some(abstract_text)
        })
        .with_publication_date(publication_date);
    metadata.reference_count = Some(reference_count);
    metadata.appears_academic = appears_academic;

    Ok(metadata)
}

fn when_attribute(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        if attr.key.local_name().as_ref() == b"when" {
            String::from_utf8(attr.value.to_vec()).ok()
        } else {
            None
        }
    })
}

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::value_objects::{DocumentMetadata, DocumentStatus};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: i32,
    pub file_name: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<i32>,
    pub reference_count: Option<i32>,
    pub appears_academic: bool,
    pub file_path: String,
    pub file_size: i64,
    pub file_hash: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub chunk_count: Option<i32>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub file_name: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<i32>,
    pub reference_count: Option<i32>,
    pub appears_academic: bool,
    pub file_path: String,
    pub file_size: i64,
    pub file_hash: Option<String>,
    pub status: String,
}

impl From<&NewDocument> for NewDocumentModel {
    fn from(new_document: &NewDocument) -> Self {
        Self {
            file_name: new_document.file_name.clone(),
            title: new_document.metadata.title.clone(),
            authors: new_document.metadata.authors.clone(),
            abstract_text: new_document.metadata.abstract_text.clone(),
            publication_date: new_document.metadata.publication_date.clone(),
            page_count: new_document.metadata.page_count,
            reference_count: new_document.metadata.reference_count,
            appears_academic: new_document.metadata.appears_academic,
            file_path: new_document.file_path.clone(),
            file_size: new_document.file_size,
            file_hash: new_document.file_hash.clone(),
            status: DocumentStatus::Uploaded.as_str().to_string(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_parts(&model.status, model.error_message.as_deref())?;

        let mut metadata = DocumentMetadata::new()
            .with_title(model.title)
            .with_authors(model.authors)
            .with_abstract(model.abstract_text)
            .with_publication_date(model.publication_date)
            .with_page_count(model.page_count);
        metadata.reference_count = model.reference_count;
        metadata.appears_academic = model.appears_academic;

        Ok(Document::from_parts(
            model.id,
            model.file_name,
            model.file_path,
            model.file_size,
            model.file_hash,
            metadata,
            status,
            model.chunk_count,
            model.uploaded_at,
            model.updated_at,
        ))
    }
}

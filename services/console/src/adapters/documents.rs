//! services/console/src/adapters/documents.rs
//!
//! Document upload, OCR status and payable creation. Implements the
//! `DocumentGateway` port.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use wonderpay_core::domain::{DocumentState, UploadedDocument};
use wonderpay_core::ports::{DocumentGateway, PortError, PortResult};
use wonderpay_core::{ClientHandle, NewPayable, Payable, UploadFile};

use super::http::MoniteHttp;

#[derive(Clone)]
pub struct MoniteDocumentAdapter {
    http: MoniteHttp,
}

impl MoniteDocumentAdapter {
    pub fn new(http: MoniteHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DocumentGateway for MoniteDocumentAdapter {
    async fn upload(&self, client: &ClientHandle, file: &UploadFile) -> PortResult<UploadedDocument> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| PortError::Transport(e.to_string()))?;
        }
        let request = self
            .http
            .scoped(client, Method::POST, "documents")
            .await?
            .multipart(Form::new().part("file", part));
        MoniteHttp::send_json(request).await
    }

    async fn status(&self, client: &ClientHandle, document_id: &str) -> PortResult<DocumentState> {
        let request = self
            .http
            .scoped(client, Method::GET, &format!("documents/{document_id}"))
            .await?;
        MoniteHttp::send_json(request).await
    }

    async fn create_payable(&self, client: &ClientHandle, payable: &NewPayable) -> PortResult<Payable> {
        let request = self
            .http
            .scoped(client, Method::POST, "payables")
            .await?
            .json(payable);
        MoniteHttp::send_json(request).await
    }
}

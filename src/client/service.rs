//! Service calls: PDF analysis upload, Word conversion, plain-language rewrite

use super::{ApiError, ApiResult};
use crate::config::{Endpoints, Settings};
use crate::models::AnalysisRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest converted document accepted from the Word service.
pub const MAX_DOCUMENT_BYTES: u64 = 50 * 1024 * 1024;

const MULTIPART_BOUNDARY: &str = "----creditlens-7d9f3a2c1b";

#[derive(Debug, Serialize)]
pub struct SimplifyRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SimplifyResponse {
    #[serde(default)]
    pub simplified_text: Option<String>,
}

/// Client for the remote services, one agent shared by every call.
pub struct ServiceClient {
    endpoints: Endpoints,
    agent: ureq::Agent,
}

fn make_agent(endpoints: &Endpoints) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // statuses are mapped to ApiError::Status below
        .timeout_global(Some(endpoints.timeout))
        .build()
        .new_agent()
}

impl ServiceClient {
    pub fn new(endpoints: Endpoints) -> Self {
        let agent = make_agent(&endpoints);
        Self { endpoints, agent }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Upload a PDF with the current settings and return the analysis record.
    pub fn analyze(&self, pdf: &Path, settings: &Settings) -> ApiResult<AnalysisRecord> {
        let bytes = std::fs::read(pdf)?;
        let file_name = pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        self.analyze_bytes(&file_name, &bytes, settings)
    }

    /// Upload in-memory PDF bytes as multipart `file` plus a `settings` JSON field.
    pub fn analyze_bytes(
        &self,
        file_name: &str,
        pdf: &[u8],
        settings: &Settings,
    ) -> ApiResult<AnalysisRecord> {
        let url = &self.endpoints.analyze_url;
        let settings_json =
            serde_json::to_string(settings).map_err(|e| ApiError::Parse(e.to_string()))?;
        let body = multipart_body(file_name, pdf, &settings_json);

        tracing::info!("uploading {} ({} bytes) to {}", file_name, pdf.len(), url);
        let response = self
            .agent
            .post(url)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .send(&body[..])
            .map_err(|e| transport(url, e))?;

        let response = check_status(url, response)?;
        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Post the record to the conversion service and return the `.docx` bytes.
    pub fn export_word(&self, record: &AnalysisRecord) -> ApiResult<Vec<u8>> {
        let url = &self.endpoints.word_export_url;
        tracing::info!("requesting Word conversion from {}", url);

        let response = self
            .agent
            .post(url)
            .header("Content-Type", "application/json")
            .send_json(record)
            .map_err(|e| transport(url, e))?;

        let response = check_status(url, response)?;
        let mut body = response.into_body();
        let bytes = body
            .with_config()
            .limit(MAX_DOCUMENT_BYTES)
            .read_to_vec()
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        tracing::debug!("received {} byte document", bytes.len());
        Ok(bytes)
    }

    /// Rewrite `text` in plain language. Any failure returns `text` unchanged.
    pub fn simplify(&self, text: &str, api_key: &str) -> String {
        match self.try_simplify(text, api_key) {
            Ok(simplified) => simplified,
            Err(e) => {
                tracing::warn!("simplify failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }

    /// Like [`simplify`](Self::simplify) but reporting the failure.
    pub fn try_simplify(&self, text: &str, api_key: &str) -> ApiResult<String> {
        let url = &self.endpoints.simplify_url;
        let mut req = self
            .agent
            .post(url)
            .header("Content-Type", "application/json");
        if !api_key.is_empty() {
            req = req.header("Authorization", &format!("Bearer {}", api_key));
        }

        let response = req
            .send_json(&SimplifyRequest { text })
            .map_err(|e| transport(url, e))?;
        let response = check_status(url, response)?;
        let resp: SimplifyResponse = response
            .into_body()
            .read_json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(resp
            .simplified_text
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| text.to_string()))
    }
}

fn transport(url: &str, e: ureq::Error) -> ApiError {
    ApiError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    }
}

fn check_status(
    url: &str,
    response: ureq::http::Response<ureq::Body>,
) -> ApiResult<ureq::http::Response<ureq::Body>> {
    let status = response.status().as_u16();
    if status >= 400 {
        let message = response.into_body().read_to_string().unwrap_or_default();
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
            message,
        });
    }
    Ok(response)
}

fn multipart_body(file_name: &str, pdf: &[u8], settings_json: &str) -> Vec<u8> {
    let file_name = file_name.replace('"', "");
    let mut body = Vec::with_capacity(pdf.len() + settings_json.len() + 512);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(pdf);
    body.extend_from_slice(
        format!(
            "\r\n--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"settings\"\r\n\r\n\
             {settings_json}\r\n\
             --{MULTIPART_BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    body
}

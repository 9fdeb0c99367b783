use std::fmt;
use std::time::Duration;

use actix_web::client::Client;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Deserialize;

use system::PresentationManifest;

const CONVERT_TIMEOUT: Duration = Duration::from_secs(120);

/// Response shape of the conversion service: the slide images plus the
/// whole-deck PDF it produced for one upload.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    slides: Vec<String>,
    pdf: String,
}

#[derive(Debug)]
pub enum ConvertError {
    Unreachable(String),
    Status(StatusCode),
    BadManifest(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Unreachable(reason) => {
                write!(f, "conversion service unreachable: {}", reason)
            }
            ConvertError::Status(status) => {
                write!(f, "conversion service responded with {}", status)
            }
            ConvertError::BadManifest(reason) => {
                write!(f, "conversion service returned an invalid manifest: {}", reason)
            }
        }
    }
}

impl ResponseError for ConvertError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadGateway().body(self.to_string())
    }
}

/// Client for the external slide-conversion service. Runs entirely in the
/// HTTP handler; room state is only touched once a manifest came back.
#[derive(Clone)]
pub struct ConvertClient {
    base_url: String,
    api_key: Option<String>,
}

impl ConvertClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self { base_url, api_key }
    }

    pub async fn convert(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<PresentationManifest, ConvertError> {
        let client = Client::builder().timeout(CONVERT_TIMEOUT).finish();

        let mut request = client
            .post(format!("{}/upload", self.base_url))
            .header("x-file-name", file_name);
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key.as_str());
        }

        let mut response = request
            .send_body(data)
            .await
            .map_err(|err| ConvertError::Unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ConvertError::Status(response.status()));
        }

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|err| ConvertError::BadManifest(err.to_string()))?;
        Ok(PresentationManifest {
            slide_urls: body.slides,
            pdf_url: body.pdf,
        })
    }
}

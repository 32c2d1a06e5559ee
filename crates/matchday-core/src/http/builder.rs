//! Per-call request construction
//!
//! A [`RequestConfig`] is built fresh for every attempt and consumed when it
//! is dispatched.

use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::http::auth::{build_headers, AuthHandler};
use crate::http::{RequestError, UrlResolver};

/// Multipart field name the backend reads uploads from
pub const UPLOAD_FIELD: &str = "file";

/// A binary payload for upload operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: Option<String>,
}

impl FileUpload {
    pub fn new(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Body of a single request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(FileUpload),
}

/// Everything needed for one network call
#[derive(Debug)]
pub struct RequestConfig {
    /// Resolved target, absolute or site-relative
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub cancel: Option<CancellationToken>,
}

/// Builder for request configurations
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    resolver: UrlResolver,
    origin: Option<Url>,
}

impl RequestBuilder {
    pub fn new(resolver: UrlResolver, origin: Option<Url>) -> Self {
        Self { resolver, origin }
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    /// Build a request configuration for `path`
    pub fn build(
        &self,
        method: Method,
        path: &str,
        auth: &dyn AuthHandler,
        body: Option<RequestBody>,
        cancel: Option<&CancellationToken>,
    ) -> RequestConfig {
        let json = !matches!(body, Some(RequestBody::Multipart(_)));
        RequestConfig {
            url: self.resolver.resolve(path),
            headers: build_headers(auth, json),
            method,
            body,
            cancel: cancel.cloned(),
        }
    }

    /// Build a configuration for a binary download (no JSON content type)
    pub fn build_binary(
        &self,
        path: &str,
        auth: &dyn AuthHandler,
        cancel: Option<&CancellationToken>,
    ) -> RequestConfig {
        RequestConfig {
            url: self.resolver.resolve(path),
            headers: build_headers(auth, false),
            method: Method::GET,
            body: None,
            cancel: cancel.cloned(),
        }
    }

    /// Turn a resolved target into an absolute URL
    ///
    /// Site-relative targets are joined onto the configured origin.
    pub fn absolute_url(&self, target: &str) -> Result<Url, RequestError> {
        if target.starts_with('/') {
            let origin = self.origin.as_ref().ok_or_else(|| {
                RequestError::transport(format!(
                    "Cannot send site-relative request {} without a configured origin",
                    target
                ))
            })?;
            return origin
                .join(target)
                .map_err(|e| RequestError::transport(format!("Invalid request URL {}: {}", target, e)));
        }

        Url::parse(target).map_err(|e| RequestError::transport(format!("Invalid request URL {}: {}", target, e)))
    }

    /// Convert a configuration into a reqwest request, returning its cancellation handle
    pub fn prepare(
        &self,
        client: &reqwest::Client,
        config: RequestConfig,
    ) -> Result<(reqwest::RequestBuilder, Option<CancellationToken>), RequestError> {
        let RequestConfig {
            url,
            method,
            headers,
            body,
            cancel,
        } = config;

        let url = self.absolute_url(&url)?;
        let mut request = client.request(method, url).headers(headers);

        match body {
            Some(RequestBody::Json(value)) => {
                request = request.json(&value);
            }
            Some(RequestBody::Multipart(upload)) => {
                let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
                if let Some(mime) = upload.mime_type {
                    part = part
                        .mime_str(&mime)
                        .map_err(|e| RequestError::transport(format!("Invalid upload content type {}: {}", mime, e)))?;
                }
                request = request.multipart(Form::new().part(UPLOAD_FIELD, part));
            }
            None => {}
        }

        Ok((request, cancel))
    }
}

// File: src/client/core.rs
use crate::client::error::ApiError;
use crate::client::middleware::{CsrfLayer, CsrfService, CsrfToken, UserAgentLayer, UserAgentService};
use crate::config::Config;
use crate::model::{ApiReply, CSRF_FIELD, Endpoint};

use http::{Method, Request, Uri, header};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};

#[cfg(not(target_os = "android"))]
use rustls_native_certs;

type HttpsClient = UserAgentService<
    CsrfService<
        Client<
            hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
            String,
        >,
    >,
>;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Encodes `(name, value)` pairs as an `application/x-www-form-urlencoded` body.
pub fn encode_form(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Client for the words/lists API.
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: HttpsClient,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .map_err(|_| ApiError::InvalidUrl(base_url.clone()))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let is_https = uri.scheme_str() == Some("https");

        let mut root_store = rustls::RootCertStore::empty();
        #[cfg(not(target_os = "android"))]
        {
            let result = rustls_native_certs::load_native_certs();
            root_store.add_parsable_certificates(result.certs);
        }
        if is_https && root_store.is_empty() {
            return Err(ApiError::NoCertificates);
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let http = ServiceBuilder::new()
            .layer(UserAgentLayer::new(user_agent.to_string()))
            .layer(CsrfLayer)
            .service(http_client);

        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.server_url, &config.user_agent, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_uri(&self, endpoint: Endpoint) -> Result<Uri, ApiError> {
        let full = format!("{}{}", self.base_url, endpoint.path());
        full.parse().map_err(|_| ApiError::InvalidUrl(full))
    }

    /// Posts `fields` plus the CSRF token to `endpoint` and decodes the JSON reply.
    ///
    /// A reply with `success: false` is still `Ok`: validation errors travel
    /// inside the reply. Only transport problems become `Err`.
    pub async fn post_form(
        &self,
        endpoint: Endpoint,
        fields: &[(&str, String)],
        csrf_token: &str,
    ) -> Result<ApiReply, ApiError> {
        let mut all = fields.to_vec();
        all.push((CSRF_FIELD, csrf_token.to_string()));
        let body = encode_form(&all);

        let req = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint_uri(endpoint)?)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::ACCEPT, "application/json")
            .header("x-requested-with", "XMLHttpRequest")
            .extension(CsrfToken(csrf_token.to_string()))
            .body(body)?;

        log::info!("POST {} ({} fields)", endpoint, fields.len());

        let send = self.http.clone().oneshot(req);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| ApiError::Timeout(limit))?,
            None => send.await,
        }
        .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ApiError::Body(e.to_string()))?
            .to_bytes();

        let reply: ApiReply = serde_json::from_slice(&bytes)?;
        log::debug!(
            "{} answered success={} errors={}",
            endpoint,
            reply.success,
            reply.errors.len()
        );
        Ok(reply)
    }
}

//! PostgREST-style gateway (the protocol Supabase exposes under `/rest/v1`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use tracing::debug;

use super::domain::{ApplicationId, ApplicationRecord, NewApplication};
use super::gateway::{ApplicationGateway, RemoteError, RemoteOperation};
use crate::config::StoreConfig;

const REST_PREFIX: &str = "rest/v1";
/// `id` is a non-null primary key, so this matches every row without naming a sentinel id.
const MATCH_ALL_ROWS: (&str, &str) = ("id", "not.is.null");

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid store URL '{value}'")]
    InvalidUrl { value: String },
    #[error("API key contains characters not allowed in a header")]
    InvalidApiKey,
}

/// Gateway backed by a REST table endpoint.
#[derive(Clone)]
pub struct RestGateway {
    client: Client,
    table_url: Url,
}

impl RestGateway {
    pub fn new(config: &StoreConfig) -> Result<Self, RestError> {
        Self::with_builder(config, Client::builder())
    }

    fn with_builder(config: &StoreConfig, builder: ClientBuilder) -> Result<Self, RestError> {
        let table_url = table_url(&config.base_url, &config.table)?;

        let mut headers = HeaderMap::new();
        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| RestError::InvalidApiKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| RestError::InvalidApiKey)?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = builder
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, table_url })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, RestError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ApplicationGateway for RestGateway {
    async fn list_all(&self) -> Result<Vec<ApplicationRecord>, RemoteError> {
        let url = list_url(&self.table_url);
        debug!(%url, "listing applications");

        let fetch = async {
            let body = self.execute(self.client.get(url)).await?;
            Ok::<_, RestError>(decode_records(&body)?)
        };

        fetch
            .await
            .map_err(|err| RemoteError::new(RemoteOperation::List, err))
    }

    async fn insert(&self, application: &NewApplication) -> Result<(), RemoteError> {
        debug!(company = %application.company, role = %application.role, "inserting application");

        let request = self
            .client
            .post(self.table_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(application);

        self.execute(request)
            .await
            .map(|_| ())
            .map_err(|err| RemoteError::new(RemoteOperation::Insert, err))
    }

    async fn delete_one(&self, id: &ApplicationId) -> Result<(), RemoteError> {
        let url = delete_one_url(&self.table_url, id);
        debug!(%url, "deleting application");

        self.execute(self.client.delete(url))
            .await
            .map(|_| ())
            .map_err(|err| RemoteError::new(RemoteOperation::DeleteOne, err))
    }

    async fn delete_all(&self) -> Result<(), RemoteError> {
        let url = delete_all_url(&self.table_url);
        debug!(%url, "deleting all applications");

        self.execute(self.client.delete(url))
            .await
            .map(|_| ())
            .map_err(|err| RemoteError::new(RemoteOperation::DeleteAll, err))
    }
}

fn table_url(base_url: &str, table: &str) -> Result<Url, RestError> {
    let raw = format!("{}/{REST_PREFIX}/{}", base_url.trim_end_matches('/'), table);
    Url::parse(&raw).map_err(|_| RestError::InvalidUrl { value: raw })
}

fn list_url(table_url: &Url) -> Url {
    let mut url = table_url.clone();
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "created_at.desc");
    url
}

fn delete_one_url(table_url: &Url, id: &ApplicationId) -> Url {
    let mut url = table_url.clone();
    url.query_pairs_mut()
        .append_pair("id", &format!("eq.{}", id.as_str()));
    url
}

fn delete_all_url(table_url: &Url) -> Url {
    let mut url = table_url.clone();
    url.query_pairs_mut()
        .append_pair(MATCH_ALL_ROWS.0, MATCH_ALL_ROWS.1);
    url
}

fn decode_records(body: &str) -> Result<Vec<ApplicationRecord>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body)
}

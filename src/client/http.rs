//! HTTP client implementation for the Domo API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE,
};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, info_span, warn, Instrument, Span};
use url::Url;

use crate::api::{
    AccountsService, DataSetsService, GroupsService, PagesService, RolesService, StreamsService,
    UsersService,
};
use crate::auth::Credentials;
use crate::models::{DataSetId, Table};
use crate::upload::{CreateDataSetOptions, StreamUploader, UploadOptions, UploadReport};
use crate::{Error, Result};

use super::config::ClientConfig;

/// The main client for interacting with the Domo API.
///
/// The client owns one set of OAuth credentials and hands out service
/// structs for each resource family. Cloning is cheap; clones share the
/// same credentials and connection pool.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{DomoClient, ListOptions};
///
/// # async fn example() -> domo_rs::Result<()> {
/// let client = DomoClient::new("client-id", "client-secret").await?;
///
/// let mut users = client.users().list(ListOptions::default().limit(120))?;
/// while let Some(user) = users.next().await {
///     let user = user?;
///     println!("{} <{}>", user.name, user.email);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DomoClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Credentials,
    pub(crate) config: ClientConfig,
    base_url: Url,
    span: Span,
}

impl DomoClient {
    /// Create a client with the default configuration.
    ///
    /// An access token is fetched before this returns.
    pub async fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(client_id, client_secret, ClientConfig::default()).await
    }

    /// Create a client with a custom configuration.
    pub async fn with_config(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_url = config.base_url()?;
        let http = config.build_http_client()?;
        let span = match config.log_name {
            Some(ref name) => info_span!("domo", client = %name),
            None => info_span!("domo"),
        };

        let credentials = Credentials::acquire(
            http.clone(),
            &base_url,
            client_id,
            client_secret,
            config.scope.as_deref(),
        )
        .instrument(span.clone())
        .await?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                credentials,
                config,
                base_url,
                span,
            }),
        })
    }

    /// Get the datasets service.
    pub fn datasets(&self) -> DataSetsService {
        DataSetsService::new(self.inner.clone())
    }

    /// Get the streams service.
    pub fn streams(&self) -> StreamsService {
        StreamsService::new(self.inner.clone())
    }

    /// Get the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self.inner.clone())
    }

    /// Get the groups service.
    pub fn groups(&self) -> GroupsService {
        GroupsService::new(self.inner.clone())
    }

    /// Get the pages service.
    pub fn pages(&self) -> PagesService {
        PagesService::new(self.inner.clone())
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the roles service.
    pub fn roles(&self) -> RolesService {
        RolesService::new(self.inner.clone())
    }

    /// Get the chunked stream uploader.
    pub fn uploader(&self) -> StreamUploader {
        StreamUploader::new(self.inner.clone())
    }

    /// Upload a table into an existing dataset through its stream.
    ///
    /// See [`StreamUploader::upload`].
    pub async fn stream_upload(
        &self,
        dataset_id: &DataSetId,
        table: &Table,
        options: UploadOptions,
    ) -> Result<UploadReport> {
        self.uploader().upload(dataset_id, table, options).await
    }

    /// Create a stream-backed dataset with the table's inferred schema and
    /// upload the table into it. Returns the new dataset id.
    pub async fn create_dataset_from_table(
        &self,
        table: &Table,
        name: &str,
        description: &str,
        options: CreateDataSetOptions,
    ) -> Result<DataSetId> {
        self.uploader()
            .create_and_upload(table, name, description, options)
            .await
    }

    /// Replace or append a dataset's rows with the table's contents.
    pub async fn update_dataset_from_table(
        &self,
        dataset_id: &DataSetId,
        table: &Table,
    ) -> Result<UploadReport> {
        self.stream_upload(dataset_id, table, UploadOptions::default())
            .await
    }

    /// Export a dataset and parse it into a [`Table`].
    ///
    /// Columns are typed by the dataset schema, so `STRING` values such as
    /// `"02134"` come back as text.
    pub async fn export_table(&self, dataset_id: &DataSetId) -> Result<Table> {
        let datasets = self.datasets();
        let schema = datasets.get(dataset_id).await?.schema.unwrap_or_default();
        let csv = datasets.export(dataset_id, true).await?;
        Table::from_csv_with_schema(&csv, &schema)
    }

    /// Issue a raw request through the authenticated transport.
    ///
    /// Status interpretation is left to the caller.
    pub async fn send(&self, request: RequestTemplate) -> Result<ApiResponse> {
        self.inner.send(request).await
    }

    /// Get the credentials used by this client.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Get the configuration used by this client.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

/// Media type of a request or response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// `application/json`
    Json,
    /// `text/csv`
    Csv,
}

impl MediaType {
    fn as_str(self) -> &'static str {
        match self {
            MediaType::Json => "application/json",
            MediaType::Csv => "text/csv",
        }
    }
}

/// Body of an outbound request.
///
/// File-backed bodies are streamed from disk and reopened for each
/// attempt, so a retried upload never needs the whole file in memory.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body
    Empty,
    /// Serialized JSON
    Json(Bytes),
    /// CSV text
    Csv(Bytes),
    /// Gzip-compressed CSV
    GzipCsv(Bytes),
    /// CSV streamed from a file
    CsvFile(PathBuf),
}

impl Payload {
    /// Serialize a value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Json(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// Wrap CSV text.
    pub fn csv(text: impl Into<String>) -> Self {
        Payload::Csv(Bytes::from(text.into()))
    }

    fn content_type(&self) -> Option<MediaType> {
        match self {
            Payload::Empty => None,
            Payload::Json(_) => Some(MediaType::Json),
            Payload::Csv(_) | Payload::GzipCsv(_) | Payload::CsvFile(_) => Some(MediaType::Csv),
        }
    }

    fn content_encoding(&self) -> Option<&'static str> {
        match self {
            Payload::GzipCsv(_) => Some("gzip"),
            _ => None,
        }
    }

    async fn to_body(&self) -> Result<Option<reqwest::Body>> {
        Ok(match self {
            Payload::Empty => None,
            Payload::Json(bytes) | Payload::Csv(bytes) | Payload::GzipCsv(bytes) => {
                Some(reqwest::Body::from(bytes.clone()))
            }
            Payload::CsvFile(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        Error::Validation(format!("CSV file {} does not exist", path.display()))
                    }
                    _ => Error::Io(e),
                })?;
                Some(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            }
        })
    }
}

/// A request built once and replayed for each attempt.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    accept: MediaType,
    payload: Payload,
}

impl RequestTemplate {
    /// Start a request for `path` (e.g. `/v1/datasets`).
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            accept: MediaType::Json,
            payload: Payload::Empty,
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters.
    pub fn queries<K, V, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in pairs {
            self.query.push((key.into(), value.to_string()));
        }
        self
    }

    /// Set the media type expected in the response.
    pub fn accept(mut self, accept: MediaType) -> Self {
        self.accept = accept;
        self
    }

    /// Set the request body.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns `true` for 2xx responses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the body is empty or whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Fail with [`Error::Resource`] unless the status is one of `accepted`.
    pub(crate) fn expect_status(
        self,
        accepted: &[StatusCode],
        operation: &'static str,
        resource: &str,
    ) -> Result<Self> {
        if accepted.contains(&self.status) {
            Ok(self)
        } else {
            Err(Error::resource(
                operation,
                resource,
                self.status.as_u16(),
                self.text(),
            ))
        }
    }
}

impl ClientInner {
    /// Send a request and read the whole response body.
    pub(crate) async fn send(&self, request: RequestTemplate) -> Result<ApiResponse> {
        let response = self.dispatch(&request).await?;
        ApiResponse::read(response).await
    }

    /// Send a request and hand back the unread response for streaming.
    pub(crate) async fn send_streaming(&self, request: RequestTemplate) -> Result<reqwest::Response> {
        self.dispatch(&request).await
    }

    /// Run one request with the renew-and-retry-once policy.
    async fn dispatch(&self, request: &RequestTemplate) -> Result<reqwest::Response> {
        async {
            self.credentials.ensure_fresh().await?;

            let token = self.credentials.access_token().await;
            let response = self.execute(request, &token).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            info!(path = %request.path, "received 401, renewing access token");
            self.credentials.renew_after_rejection(&token).await?;

            let token = self.credentials.access_token().await;
            let retry = self.execute(request, &token).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                warn!(path = %request.path, "still unauthorized after token renewal");
                let body = retry.text().await.unwrap_or_default();
                return Err(Error::Authentication {
                    status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                    message: body,
                });
            }

            Ok(retry)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Execute a single attempt (no retry logic).
    async fn execute(
        &self,
        request: &RequestTemplate,
        token: &SecretString,
    ) -> Result<reqwest::Response> {
        let url = self.base_url.join(&request.path)?;
        let headers = build_headers(request, token)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.payload.to_body().await? {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let result = builder.send().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    status = response.status().as_u16(),
                    elapsed_ms,
                    "request completed"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    method = %request.method,
                    path = %request.path,
                    elapsed_ms,
                    timeout = err.is_timeout(),
                    "request failed"
                );
                Err(err.into())
            }
        }
    }

    /// Make a GET request expecting JSON.
    pub(crate) async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        self.send(RequestTemplate::new(Method::GET, path).queries(query.iter().cloned()))
            .await
    }

    /// Make a GET request expecting CSV.
    pub(crate) async fn get_csv(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        self.send(
            RequestTemplate::new(Method::GET, path)
                .queries(query.iter().cloned())
                .accept(MediaType::Csv),
        )
        .await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        query: &[(&str, String)],
    ) -> Result<ApiResponse> {
        self.send(
            RequestTemplate::new(Method::POST, path)
                .queries(query.iter().cloned())
                .payload(Payload::json(body)?),
        )
        .await
    }

    /// Make a PUT request with a JSON body.
    pub(crate) async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(RequestTemplate::new(Method::PUT, path).payload(Payload::json(body)?))
            .await
    }

    /// Make a PUT request with a CSV body.
    pub(crate) async fn put_csv(
        &self,
        path: &str,
        payload: Payload,
        query: &[(&str, String)],
    ) -> Result<ApiResponse> {
        self.send(
            RequestTemplate::new(Method::PUT, path)
                .queries(query.iter().cloned())
                .payload(payload),
        )
        .await
    }

    /// Make a PATCH request with a JSON body.
    pub(crate) async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(RequestTemplate::new(Method::PATCH, path).payload(Payload::json(body)?))
            .await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(RequestTemplate::new(Method::DELETE, path)).await
    }

    /// Create a resource, accepting 200 or 201.
    pub(crate) async fn create<T, B>(
        &self,
        path: &str,
        body: &B,
        query: &[(&str, String)],
        resource: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post(path, body, query)
            .await?
            .expect_status(&[StatusCode::OK, StatusCode::CREATED], "creating", resource)?
            .json()
    }

    /// Retrieve a resource, accepting 200.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        self.get(path, &[])
            .await?
            .expect_status(&[StatusCode::OK], "retrieving", resource)?
            .json()
    }

    /// Update a resource with PUT or PATCH.
    ///
    /// An empty body (typically with 204) yields `Ok(None)`.
    pub(crate) async fn modify<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        accepted: &[StatusCode],
        resource: &str,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = if method == Method::PATCH {
            self.patch(path, body).await?
        } else {
            self.put(path, body).await?
        };

        let response = response.expect_status(accepted, "updating", resource)?;
        if response.is_empty() {
            Ok(None)
        } else {
            Ok(Some(response.json()?))
        }
    }

    /// Delete a resource, accepting 204.
    pub(crate) async fn remove(&self, path: &str, resource: &str) -> Result<()> {
        self.delete(path)
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "deleting", resource)?;
        Ok(())
    }
}

fn build_headers(request: &RequestTemplate, token: &SecretString) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("bearer {}", token.expose_secret()))
            .map_err(|_| Error::Validation("Invalid token format".to_string()))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static(request.accept.as_str()));

    if let Some(content_type) = request.payload.content_type() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type.as_str()));
    }
    if let Some(encoding) = request.payload.content_encoding() {
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding));
    }

    Ok(headers)
}

impl Clone for DomoClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for DomoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomoClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

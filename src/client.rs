use std::fmt;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    request::RequestBody, retry::RetryState, AssetType, ClientOptions, Environment, FileUpload,
    FindQuery, KnackProxyError, Record, RecordsPage, RequestDescriptor, Result, UploadedAsset,
};

/// Emits a `tracing` debug event when the client runs in development.
#[cfg(feature = "tracing")]
macro_rules! diagnostic {
    ($client:expr, $($event:tt)+) => {
        if $client.options.environment.is_development() {
            tracing::debug!($($event)+);
        }
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! diagnostic {
    ($client:expr, $($event:tt)+) => {};
}

#[derive(Clone)]
/// HTTP client for the Knack records proxy.
pub struct KnackProxyClient {
    http: reqwest::Client,
    application_id: String,
    options: ClientOptions,
}

impl fmt::Debug for KnackProxyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnackProxyClient")
            .field("application_id", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl KnackProxyClient {
    /// Creates a client for `application_id` against the default proxy.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            application_id: application_id.into().trim().to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `KNACK_PROXY_APP_ID` — proxy application id (required)
    /// - `KNACK_PROXY_URL` — proxy origin (optional)
    /// - `KNACK_PROXY_ENV` — `production` or `development` (optional)
    ///
    /// **Not available on `wasm32` targets** — browser runtimes have no
    /// environment; use [`KnackProxyClient::new`] instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use knack_proxy_http::KnackProxyClient;
    ///
    /// let proxy = KnackProxyClient::from_env().expect("missing KNACK_PROXY_APP_ID");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let application_id = std::env::var("KNACK_PROXY_APP_ID").map_err(|_| {
            KnackProxyError::Config("missing KNACK_PROXY_APP_ID environment variable".to_owned())
        })?;
        if application_id.trim().is_empty() {
            return Err(KnackProxyError::Config(
                "KNACK_PROXY_APP_ID is set but empty".to_owned(),
            ));
        }

        let mut options = ClientOptions::default();
        if let Ok(url) = std::env::var("KNACK_PROXY_URL") {
            if !url.trim().is_empty() {
                options.proxy_url = url;
            }
        }
        if let Ok(env) = std::env::var("KNACK_PROXY_ENV") {
            options.environment = env
                .parse::<Environment>()
                .map_err(|err| KnackProxyError::Config(format!("KNACK_PROXY_ENV: {err}")))?;
        }

        Ok(Self::new(application_id.trim()).with_options(options))
    }

    /// Applies client options such as proxy origin and timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Points the client at a different proxy origin.
    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.options.proxy_url = proxy_url.into();
        self
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists records of `object_id` matching `query`.
    pub async fn find(&self, object_id: &str, query: &FindQuery) -> Result<RecordsPage> {
        self.execute(&RequestDescriptor::find(object_id, query)?)
            .await
    }

    /// Fetches a single record.
    pub async fn find_by_id(&self, object_id: &str, id: &str) -> Result<Record> {
        self.execute(&RequestDescriptor::find_by_id(object_id, id))
            .await
    }

    /// Creates a record and returns it as stored.
    ///
    /// Server errors are retried like any other call, so a create that
    /// failed after the record was written may be applied more than once.
    pub async fn create<T: Serialize + ?Sized>(&self, object_id: &str, data: &T) -> Result<Record> {
        self.execute(&RequestDescriptor::create(object_id, data)?)
            .await
    }

    /// Updates a record and returns it as stored.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        object_id: &str,
        id: &str,
        data: &T,
    ) -> Result<Record> {
        self.execute(&RequestDescriptor::update(object_id, id, data)?)
            .await
    }

    /// Deletes a record and returns the proxy's acknowledgement.
    pub async fn delete(&self, object_id: &str, id: &str) -> Result<serde_json::Value> {
        self.execute(&RequestDescriptor::delete(object_id, id))
            .await
    }

    /// Deletes every record matching `query`.
    ///
    /// Returns `Ok(None)` without issuing a delete when nothing matches.
    pub async fn delete_multiple(
        &self,
        object_id: &str,
        query: &FindQuery,
    ) -> Result<Option<serde_json::Value>> {
        let ids = self.find(object_id, query).await?.ids();
        if ids.is_empty() {
            return Ok(None);
        }

        let response = self
            .execute(&RequestDescriptor::delete_ids(object_id, &ids)?)
            .await?;
        Ok(Some(response))
    }

    /// Uploads a file into the application's asset bucket.
    pub async fn upload(&self, asset_type: AssetType, file: FileUpload) -> Result<UploadedAsset> {
        let descriptor = RequestDescriptor::upload(&self.application_id, asset_type, file);
        self.execute(&descriptor).await
    }

    /// Runs `descriptor` through the retry loop and decodes the JSON body.
    ///
    /// An empty success body decodes as JSON `null`.
    pub async fn execute<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
        let body = self.send_with_retry(descriptor).await?;
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str::<T>(body).map_err(|err| {
            KnackProxyError::Decode(format!("invalid proxy response JSON: {err}; body: {body}"))
        })
    }

    async fn send_with_retry(&self, descriptor: &RequestDescriptor) -> Result<String> {
        let url = descriptor.url(&self.options.proxy_url);
        let headers = descriptor.headers(&self.application_id)?;
        let mut retry = RetryState::new();

        loop {
            diagnostic!(
                self,
                method = %descriptor.method(),
                url = %url,
                attempt = retry.attempt() + 1,
                "sending proxy request"
            );

            let mut request = self
                .http
                .request(descriptor.method().clone(), &url)
                .headers(headers.clone())
                .timeout(Duration::from_millis(self.options.timeout_ms));

            request = match descriptor.body() {
                Some(RequestBody::Json(bytes)) => request.body(bytes.clone()),
                Some(RequestBody::Multipart(file)) => request.multipart(file.to_form()?),
                None => request,
            };

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    diagnostic!(
                        self,
                        method = %descriptor.method(),
                        url = %url,
                        error = %err,
                        "proxy request failed without a response"
                    );
                    return Err(KnackProxyError::Transport(err));
                }
            };

            let status = response.status();
            let body = response.text().await.map_err(KnackProxyError::Transport)?;

            if status.is_success() {
                diagnostic!(
                    self,
                    method = %descriptor.method(),
                    url = %url,
                    status = status.as_u16(),
                    retries = retry.attempt(),
                    "proxy request succeeded"
                );
                return Ok(body);
            }

            if retry.should_retry(status) {
                retry.advance();
                diagnostic!(
                    self,
                    method = %descriptor.method(),
                    url = %url,
                    status = status.as_u16(),
                    attempt = retry.attempt(),
                    "retrying proxy request after server error"
                );
                continue;
            }

            diagnostic!(
                self,
                method = %descriptor.method(),
                url = %url,
                status = status.as_u16(),
                retries = retry.attempt(),
                "proxy request failed"
            );
            return Err(KnackProxyError::Http {
                status: status.as_u16(),
                body,
            });
        }
    }
}

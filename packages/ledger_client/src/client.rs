use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_TYPE, DATE, HeaderMap};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::ClientOptions;
use crate::envelope;
use crate::error::{ClientError, Result, TransportFailure};

const JSON_CONTENT_TYPE: &str = "application/json";

/// RFC 850 timestamp layout used for the `Date` header.
pub const DATE_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S GMT";

/// Executes envelope-wrapped JSON requests against one base address.
///
/// Cloning is cheap and clones share the underlying HTTP transport.
/// Separately constructed clients never do.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    options: ClientOptions,
}

/// What the remote answered: status line, headers and the buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Vec<u8>,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw body bytes. Empty when the remote sent none or the body could not be read.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    #[cfg(test)]
    pub(crate) fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            url: Url::parse("http://localhost/").unwrap(),
            body: Vec::new(),
        }
    }
}

impl Client {
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_endpoint).map_err(|e| {
            ClientError::InvalidConfig(format!(
                "base endpoint {:?}: {}",
                options.base_endpoint, e
            ))
        })?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            options,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Join `path` onto the base address with exactly one `/` between them.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| ClientError::request_build(format!("invalid url {joined:?}"), e))
    }

    /// Build a request for `path`, wrapping `payload` in the data envelope when given.
    pub fn request<P>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&P>,
    ) -> Result<reqwest::Request>
    where
        P: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;
        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(DATE, http_date(Utc::now()));

        if let Some(payload) = payload {
            let body = envelope::wrap(payload)
                .map_err(|e| ClientError::request_build("failed to encode payload", e))?;
            builder = builder.body(body);
        }

        builder
            .build()
            .map_err(|e| ClientError::request_build("invalid request", e))
    }

    pub fn get(&self, path: &str) -> Result<reqwest::Request> {
        self.request::<()>(Method::GET, path, None)
    }

    pub fn post<P>(&self, path: &str, payload: &P) -> Result<reqwest::Request>
    where
        P: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(payload))
    }

    pub fn delete(&self, path: &str) -> Result<reqwest::Request> {
        self.request::<()>(Method::DELETE, path, None)
    }

    /// Run `request` without decoding a target.
    ///
    /// Fails with [`ClientError::Remote`] when the body is an error envelope,
    /// whatever the status code says.
    pub async fn execute(
        &self,
        ctx: Option<&CancellationToken>,
        request: reqwest::Request,
    ) -> Result<Response> {
        let response = self.round_trip(ctx, request).await?;

        if let Some(message) = envelope::detect_error(&response.body) {
            debug!(status = response.status.as_u16(), %message, "remote reported an error");
            return Err(ClientError::Remote {
                message,
                response: Box::new(response),
            });
        }

        Ok(response)
    }

    /// Run `request` and decode the `data` member of the response into `T`.
    pub async fn execute_into<T: DeserializeOwned>(
        &self,
        ctx: Option<&CancellationToken>,
        request: reqwest::Request,
    ) -> Result<(T, Response)> {
        let response = self.execute(ctx, request).await?;

        match envelope::unwrap(&response.body) {
            Ok(target) => Ok((target, response)),
            Err(source) => Err(ClientError::Decode {
                source,
                response: Box::new(response),
            }),
        }
    }

    async fn round_trip(
        &self,
        ctx: Option<&CancellationToken>,
        request: reqwest::Request,
    ) -> Result<Response> {
        let Some(ctx) = ctx else {
            return Err(ClientError::InvalidContext);
        };

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let resp = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                debug!(%method, %url, "request cancelled");
                return Err(ClientError::transport(TransportFailure::Cancelled));
            }
            result = self.http.execute(request) => {
                result.map_err(|e| ClientError::transport(e))?
            }
        };

        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().clone();
        debug!(status = status.as_u16(), %url, "received response");

        // Past this point the remote has answered; failures keep what it sent so far.
        let partial = |source: TransportFailure| ClientError::Transport {
            source,
            response: Some(Box::new(Response {
                status,
                headers: headers.clone(),
                url: url.clone(),
                body: Vec::new(),
            })),
        };

        let body = tokio::select! {
            biased;
            _ = ctx.cancelled() => {
                debug!(%method, %url, "request cancelled while reading body");
                return Err(partial(TransportFailure::Cancelled));
            }
            result = resp.bytes() => result.map_err(|e| partial(e.into()))?,
        };
        trace!(len = body.len(), "read response body");

        Ok(Response {
            status,
            headers,
            url,
            body: body.to_vec(),
        })
    }
}

/// Format `now` for the `Date` header.
pub fn http_date(now: DateTime<Utc>) -> String {
    now.format(DATE_FORMAT).to_string()
}

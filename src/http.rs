//! HTTP implementation of [`Fetch`] on top of `reqwest`.
//!
//! On wasm32 `reqwest` drives the browser's `fetch`; the timeout there is a
//! race against a `gloo-timers` future since the browser backend has no
//! request timeout of its own. Native builds use the client's timeout.

use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

use crate::cache::Fetch;
use crate::config::REQUEST_TIMEOUT_MS;
use crate::FetchError;

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_ms: u32,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT_MS)
    }

    pub fn with_timeout(timeout_ms: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout_ms,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}

async fn get_json(client: reqwest::Client, url: String, timeout_ms: u32) -> Result<Value, FetchError> {
    let request = client.get(&url);
    #[cfg(not(target_arch = "wasm32"))]
    let request = request.timeout(std::time::Duration::from_millis(timeout_ms as u64));

    let response = request.send().await.map_err(|e| classify(&url, e, timeout_ms))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url,
            status: status.as_u16(),
        });
    }

    response.json::<Value>().await.map_err(|e| {
        if e.is_decode() {
            FetchError::Decode {
                url: url.clone(),
                message: e.to_string(),
            }
        } else {
            classify(&url, e, timeout_ms)
        }
    })
}

fn classify(url: &str, err: reqwest::Error, timeout_ms: u32) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
            after_ms: timeout_ms,
        }
    } else {
        FetchError::Transport {
            url: url.to_owned(),
            message: err.to_string(),
        }
    }
}

impl Fetch for HttpFetcher {
    #[cfg(not(target_arch = "wasm32"))]
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
        get_json(self.client.clone(), url.to_owned(), self.timeout_ms).boxed_local()
    }

    #[cfg(target_arch = "wasm32")]
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
        use futures::future::{select, Either};
        use gloo_timers::future::TimeoutFuture;

        let request = get_json(self.client.clone(), url.to_owned(), self.timeout_ms);
        let url = url.to_owned();
        let timeout_ms = self.timeout_ms;

        async move {
            let request = Box::pin(request);
            match select(request, TimeoutFuture::new(timeout_ms)).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(FetchError::Timeout {
                    url,
                    after_ms: timeout_ms,
                }),
            }
        }
        .boxed_local()
    }
}

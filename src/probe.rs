use log::{debug, info};
use reqwest::{Client, StatusCode};
use std::future::Future;

use crate::error::Error;

/// A single reachability test against one URL.
///
/// Implementations must never fail: every error is folded into `false`.
pub trait Probe: Send + Sync + 'static {
    fn check(&self, url: &str) -> impl Future<Output = bool> + Send;
}

/// Probe backed by a plain `GET` request.
///
/// The client keeps reqwest's defaults: redirects are followed and there is
/// no request timeout. Deadlines are applied by the [`Checker`](crate::Checker).
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns an error if the TLS backend fails to initialise.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_client(Client::builder().build()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Probe for HttpProbe {
    /// Returns `true` only for a response with status exactly 200.
    async fn check(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(resp) => {
                debug!("{url} answered {}", resp.status());
                resp.status() == StatusCode::OK
            }
            Err(e) => {
                info!("Error when checking the site {url}: {e}");
                false
            }
        }
    }
}

//! Authenticated transactions-endpoint client over `ureq`.

use crate::creds::Token;
use momoda::http::header::{InvalidHeaderValue, AUTHORIZATION};
use momoda::tx::Transaction;
use momoda::MomoApi;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, trace};
use ureq::http::StatusCode;
use ureq::tls::{TlsConfig, TlsProvider};
use ureq::Agent;

#[derive(Debug, Error)]
pub enum MomoClientError {
    #[error("Invalid transactions API URI")]
    ApiUri(#[from] momoda::http::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error")]
    Network(#[source] ureq::Error),

    #[error("API error: HTTP status {0}")]
    Http(u16),

    #[error("Malformed transaction list in response body")]
    Malformed(#[source] ureq::Error),

    #[error("Stored token does not form a valid Authorization header")]
    Token(#[source] InvalidHeaderValue),
}

/// Classified outcome of a single authenticated fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server accepted the credentials and returned the transaction list.
    Transactions(Vec<Transaction>),

    /// HTTP 401. Recoverable: the orchestrator clears stored credentials and re-prompts.
    AuthRejected,
}

/// The fetch seam between the orchestrator and the network.
///
/// Exists as a trait so that unit tests can mock the fetch outcomes.
pub trait TransactionSource {
    fn fetch_transactions(&self, token: &Token) -> Result<FetchOutcome, FetchError>;
}

/// Synchronous client for the transactions endpoint.
///
/// Does not touch credential storage. Issues exactly one request per call: no automatic
/// retries, no timeout.
pub struct MomoClient {
    agent: Agent,
    api: MomoApi,
}

impl MomoClient {
    /// Create a new client with the provided API server URI.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> Result<(), momoviz::client::MomoClientError> {
    /// # use momoviz::client::MomoClient;
    /// let client = MomoClient::new("http://localhost:8090")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_server: &str) -> Result<Self, MomoClientError> {
        // Non-2xx statuses come back as responses so 401 can be classified, not as errors.
        let agent = Agent::from(
            Agent::config_builder()
                .http_status_as_error(false)
                .tls_config(
                    TlsConfig::builder()
                        .provider(TlsProvider::NativeTls)
                        .build(),
                )
                .build(),
        );

        Ok(Self {
            agent,
            api: MomoApi::new(api_server)?,
        })
    }
}

impl TransactionSource for MomoClient {
    fn fetch_transactions(&self, token: &Token) -> Result<FetchOutcome, FetchError> {
        let mut req = self.api.get_transactions();
        let auth = momoda::basic_auth(token.as_str()).map_err(FetchError::Token)?;
        req.headers_mut().insert(AUTHORIZATION, auth);

        info!("Fetching transactions from `{}`", req.uri());

        let start = Instant::now();
        let mut resp = self.agent.run(req).map_err(FetchError::Network)?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Ok(FetchOutcome::AuthRejected);
        }
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let txs: Vec<Transaction> = resp
            .body_mut()
            .read_json()
            .map_err(FetchError::Malformed)?;
        let dur = start.elapsed();

        info!("{} transactions received in {dur:?}", txs.len());
        trace!("{txs:#?}");

        Ok(FetchOutcome::Transactions(txs))
    }
}

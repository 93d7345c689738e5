//! The dashboard orchestrator: acquire credentials, fetch, aggregate, render.

use crate::aggregate;
use crate::client::{FetchError, FetchOutcome, TransactionSource};
use crate::creds::{self, CredentialStore, CredsError, OperatorPrompt, Token};
use crate::render::RenderSink;
use momoda::tx::Transaction;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Upper bound on credential prompt cycles per run.
///
/// A 401 clears the stored token and re-prompts, so each retry requires fresh operator input.
/// The bound is the escape hatch that keeps repeated rejections from looping forever.
pub const MAX_AUTH_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Credentials are required to access data")]
    MissingCredentials,

    #[error("Authentication rejected after {0} attempts")]
    AuthAttemptsExhausted(usize),

    #[error("Credential storage error")]
    Creds(#[from] CredsError),

    #[error("Transaction fetch error")]
    Fetch(#[from] FetchError),
}

/// Pipeline phases. Control flow is linear with one conditional loop: an auth rejection
/// re-enters `Authenticating` after the stored token is cleared.
enum Phase {
    Authenticating,
    Fetching(Token),
    Rendering(Vec<Transaction>),
}

/// Composes the credential store, the fetcher, the aggregator, and the rendering sink.
///
/// All failure classes are caught here; none escape to the sink. User-visible messages stay
/// generic, full detail goes to the diagnostics log.
pub struct Dashboard<'a, F, S, P, R>
where
    F: TransactionSource,
    S: CredentialStore,
    P: OperatorPrompt,
    R: RenderSink,
{
    source: &'a F,
    store: &'a S,
    prompt: &'a mut P,
    sink: &'a mut R,
}

impl<'a, F, S, P, R> Dashboard<'a, F, S, P, R>
where
    F: TransactionSource,
    S: CredentialStore,
    P: OperatorPrompt,
    R: RenderSink,
{
    pub fn new(source: &'a F, store: &'a S, prompt: &'a mut P, sink: &'a mut R) -> Self {
        Self {
            source,
            store,
            prompt,
            sink,
        }
    }

    /// Run the pipeline once, to rendering or to the first terminal failure.
    pub fn run(&mut self) -> Result<(), DashboardError> {
        let mut attempts = 0;
        let mut phase = Phase::Authenticating;

        loop {
            phase = match phase {
                Phase::Authenticating => {
                    attempts += 1;
                    if attempts > MAX_AUTH_ATTEMPTS {
                        error!("Giving up after {MAX_AUTH_ATTEMPTS} authentication attempts");
                        return Err(DashboardError::AuthAttemptsExhausted(MAX_AUTH_ATTEMPTS));
                    }

                    match creds::obtain(self.store, self.prompt)? {
                        Some(token) => Phase::Fetching(token),
                        None => return Err(DashboardError::MissingCredentials),
                    }
                }

                Phase::Fetching(token) => match self.source.fetch_transactions(&token) {
                    Ok(FetchOutcome::Transactions(txs)) => {
                        debug!("Fetched {} transactions", txs.len());
                        Phase::Rendering(txs)
                    }
                    Ok(FetchOutcome::AuthRejected) => {
                        warn!("Server rejected credentials, clearing stored token");
                        self.store.clear()?;
                        self.prompt
                            .notify("Authentication failed, please enter credentials again.");
                        Phase::Authenticating
                    }
                    Err(err) => {
                        error!("Transaction fetch failed: {err}");
                        self.prompt.notify("Error fetching data.");
                        return Err(err.into());
                    }
                },

                Phase::Rendering(txs) => {
                    self.sink.render(&aggregate::volume_by_date(&txs));
                    self.sink.render(&aggregate::bucket_amounts(&txs));
                    self.sink.render(&aggregate::type_distribution(&txs));
                    return Ok(());
                }
            };
        }
    }
}

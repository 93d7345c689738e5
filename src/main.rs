//  momoviz: Mobile Money transactions dashboard

#![forbid(unsafe_code)]

use directories::ProjectDirs;
use error_iter::ErrorIter as _;
use is_terminal::IsTerminal as _;
use momoviz::client::MomoClient;
use momoviz::creds::{FileCredentialStore, TermPrompt};
use momoviz::dashboard::Dashboard;
use momoviz::errors::{DashboardError, MomoClientError};
use momoviz::render::{JsonSink, TermSink};
use onlyargs::CliError;
use onlyargs_derive::OnlyArgs;
use std::path::PathBuf;
use std::{env, process::ExitCode};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

const TOKEN_FILE: &str = "momo_token";

/// Fetch Mobile Money transactions and render aggregate charts.
#[derive(Debug, OnlyArgs)]
#[footer = "Additional environment variables:"]
#[footer = "  - MOMO_API_URL accepts a http: or https: URL for the transactions API"]
#[footer = "      default is \"http://localhost:8090\""]
#[footer = "  - RUST_LOG configures diagnostics verbosity, e.g. RUST_LOG=debug"]
#[footer = "  - TERM_COLOR accepts \"always\" to override automatic terminal sensing"]
struct Args {
    /// Transactions API endpoint. Overrides MOMO_API_URL.
    #[short('e')]
    endpoint: Option<String>,

    /// Override the default credential token file path.
    #[long]
    token_file: Option<PathBuf>,

    /// Write the aggregate series as a JSON array to stdout instead of tables.
    json: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("Argument parsing error")]
    Args(#[from] CliError),

    #[error("Unable to locate user cache directory")]
    CacheDir,

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Transactions client error")]
    Client(#[from] MomoClientError),

    #[error("Dashboard error")]
    Dashboard(#[from] DashboardError),

    #[error("Unable to serialize series output")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    // Initialize the tracing subscriber for instrumentation.
    // Uses the `RUST_LOG` environment var for configuration. E.g. `RUST_LOG=debug cargo run`
    //
    // See: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/struct.EnvFilter.html#directives
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let term_color = env::var("TERM_COLOR")
        .map(|color| color == "always")
        .unwrap_or_else(|_| std::io::stdout().is_terminal());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(term_color))
        .with(env_filter)
        .init();

    match run(onlyargs::parse()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            for source in err.sources().skip(1) {
                eprintln!("  Caused by: {source}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(args: Result<Args, CliError>) -> Result<(), Error> {
    let args = args?;

    let endpoint = args
        .endpoint
        .or_else(|| env::var("MOMO_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8090".to_string());

    // Find the user's cache directory for the token file and make sure it exists.
    let token_path = match args.token_file {
        Some(path) => path,
        None => {
            let project_dir =
                ProjectDirs::from("rw", "momo", "momoviz").ok_or(Error::CacheDir)?;
            let cache_dir = project_dir.cache_dir();
            std::fs::create_dir_all(cache_dir)?;
            cache_dir.join(TOKEN_FILE)
        }
    };
    debug!("Credential token file: {token_path:?}");

    let store = FileCredentialStore::new(token_path);
    let mut prompt = TermPrompt;
    let client = MomoClient::new(&endpoint)?;

    if args.json {
        let mut sink = JsonSink::default();
        Dashboard::new(&client, &store, &mut prompt, &mut sink).run()?;
        println!("{}", sink.into_json()?);
    } else {
        let mut sink = TermSink;
        Dashboard::new(&client, &store, &mut prompt, &mut sink).run()?;
    }

    Ok(())
}

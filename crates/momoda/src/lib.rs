//! A Mobile Money transactions API client, [sans I/O]. (Bring your own sync/async HTTP client!)
//!
//! This library handles the protocol-layer aspects of the transactions API: the wire model,
//! request construction, and the `Basic` authorization header.
//!
//! [sans I/O]: https://sans-io.readthedocs.io/how-to-sans-io.html
//!
//! # Sync example with `ureq`
//!
//! ```no_run
//! use momoda::tx::Transaction;
//! use momoda::MomoApi;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = ureq::agent();
//!     let api = MomoApi::new("http://localhost:8090")?;
//!
//!     let mut req = api.get_transactions();
//!     req.headers_mut()
//!         .insert(http::header::AUTHORIZATION, momoda::basic_auth("dXNlcjpwYXNz")?);
//!
//!     let txs: Vec<Transaction> = agent.run(req)?.body_mut().read_json()?;
//!
//!     println!("{txs:#?}");
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub use http;
pub use rust_decimal;

pub mod tx;

use http::header::{HeaderValue, InvalidHeaderValue};
use http::{Request, Uri};

pub type Req = http::Request<()>;

/// The main transactions API client.
#[derive(Clone, Debug)]
pub struct MomoApi {
    req: Req,
}

impl MomoApi {
    /// Transactions API client constructor.
    ///
    /// The API endpoint string must be a valid [`Uri`].
    ///
    /// # Example
    ///
    /// ```
    /// # use momoda::MomoApi;
    /// # fn main() -> Result<(), http::Error> {
    /// let api = MomoApi::new("http://localhost:8090")?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Panics
    ///
    /// This function asserts that the API server URL has both a scheme and host component. This
    /// disallows the use of relative URIs like `/hello/world` and non-network URIs like `data:`
    /// and `mailto:`.
    pub fn new<U>(api: U) -> Result<Self, http::Error>
    where
        U: TryInto<Uri>,
        <U as TryInto<Uri>>::Error: Into<http::Error>,
    {
        let req = Request::get(api).body(())?;
        assert!(req.uri().scheme().is_some());
        assert!(req.uri().host().is_some());

        Ok(Self { req })
    }

    /// Get the full transaction list.
    ///
    /// Returns a [`Req`] which can be sent by your preferred HTTP client. No query parameters,
    /// no request body.
    ///
    /// The response can be deserialized from JSON into a `Vec<`[`Transaction`]`>`.
    ///
    /// [`Transaction`]: tx::Transaction
    pub fn get_transactions(&self) -> Req {
        let mut req = self.req.clone();
        append_path(&mut req, "transactions");

        req
    }
}

/// Build an `Authorization` header value carrying the opaque token in `Basic` form.
///
/// The value is marked sensitive so HTTP clients avoid echoing it in diagnostics.
pub fn basic_auth(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Basic {token}"))?;
    value.set_sensitive(true);

    Ok(value)
}

/// Append a path to the request.
fn append_path(req: &mut Req, path: &str) {
    // The `http` crate has really bad ergonomics for updating paths.
    // SEE: https://github.com/hyperium/http/issues/594
    let req_uri = req.uri_mut();
    let mut uri_parts = req_uri.clone().into_parts();
    let root = req_uri.path();
    uri_parts.path_and_query = Some(format!("{root}{path}").parse().unwrap());
    *req_uri = http::Uri::from_parts(uri_parts).unwrap();
}

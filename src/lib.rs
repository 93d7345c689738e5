#![forbid(unsafe_code)]

pub use momoda;

pub mod aggregate;
pub mod client;
pub mod creds;
pub mod dashboard;
pub mod errors;
pub mod render;

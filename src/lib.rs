//! crude_server - Minimal single-connection HTTP server
//!
//! Serves static files from a document root, accepts form-encoded
//! submissions into an in-memory store, and supports basic resource
//! deletion. Connections are handled strictly one at a time: a single
//! bounded read, one dispatched response, and the socket closes.
//!
//! # Protocol Support
//!
//! - Methods: `OPTIONS`, `GET`, `POST`, `DELETE`; anything else answers
//!   `501 Not Implemented`
//! - Responses are always `HTTP/1.1`, with no keep-alive, chunking, or
//!   bodies beyond a single read buffer
//!
//! # Examples
//!
//! Quick start:
//! ```no_run
//! use crude_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     Server::builder()
//!         .document_root("./public")
//!         .build()
//!         .launch()
//!         .await
//! }
//! ```
//! Custom address and limits:
//! ```no_run
//! use crude_server::{limits::ServerLimits, Server};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     Server::builder()
//!         .addr("0.0.0.0:8080".parse().unwrap())
//!         .limits(ServerLimits {
//!             read_buffer_size: 4 * 1024,
//!             ..ServerLimits::default()
//!         })
//!         .build()
//!         .launch()
//!         .await
//! }
//! ```

pub(crate) mod http {
    pub mod query;
    pub(crate) mod request;
    pub(crate) mod response;
    pub(crate) mod types;
}
pub(crate) mod server {
    pub(crate) mod dispatch;
    pub(crate) mod server_impl;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::ParseError,
    http::{
        query,
        request::Request,
        response::Response,
        types::{guess_content_type, Method, StatusCode},
    },
    server::{
        dispatch::{Dispatcher, SubmissionStore},
        server_impl::{Server, ServerBuilder},
    },
};

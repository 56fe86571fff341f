//! Server tunables.
//!
//! The defaults reproduce the target system's fixed constants: one bounded
//! read per connection and a small listen backlog. Raising the buffer size
//! is the only way to accept larger requests, because the server never
//! reassembles multiple reads.

/// Listener and per-connection resource limits.
///
/// # Examples
///
/// ```
/// use crude_server::limits::ServerLimits;
///
/// let limits = ServerLimits {
///     read_buffer_size: 4 * 1024,
///     ..ServerLimits::default()
/// };
/// assert_eq!(limits.backlog, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ServerLimits {
    /// Size of the single read buffer per connection (default: `1024 B`).
    ///
    /// A request line, all headers, and any POST body must arrive within
    /// one read of this size; anything beyond it is never seen.
    pub read_buffer_size: usize,

    /// Listen backlog passed to the socket (default: `5`).
    pub backlog: i32,
}

impl Default for ServerLimits {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024,
            backlog: 5,
        }
    }
}

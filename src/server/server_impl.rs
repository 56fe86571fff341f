use crate::{limits::ServerLimits, server::dispatch::Dispatcher};
use socket2::{Domain, Protocol, Socket, Type};
use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};
use tracing::{info, warn};

const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8888);

/// An HTTP server handling one connection at a time.
///
/// Each accepted connection gets exactly one bounded read, one dispatch,
/// one write, and then the socket is closed. There is no concurrency and
/// no connection reuse; the next client waits in the listen backlog.
///
/// # Examples
///
/// ```no_run
/// use crude_server::Server;
///
/// #[tokio::main]
/// async fn main() -> std::io::Result<()> {
///     Server::builder()
///         .document_root("./public")
///         .build()
///         .launch()
///         .await
/// }
/// ```
pub struct Server {
    addr: SocketAddr,
    document_root: PathBuf,
    limits: ServerLimits,
}

impl Server {
    /// Creates a new builder for configuring the server instance.
    #[inline]
    pub fn builder() -> ServerBuilder {
        ServerBuilder {
            addr: None,
            document_root: None,
            limits: None,
        }
    }

    /// Binds the listener and serves connections forever.
    ///
    /// Only listener construction can fail. Per-connection read and write
    /// errors are logged and the loop moves on to the next accept.
    pub async fn launch(self) -> io::Result<()> {
        let listener = self.bind()?;
        info!(addr = %self.addr, "listening");

        let mut dispatcher = Dispatcher::new(self.document_root);
        let mut buffer = vec![0u8; self.limits.read_buffer_size];

        loop {
            let (mut stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            info!(peer = %peer, "connected");

            let read = match stream.read(&mut buffer).await {
                Ok(0) => continue,
                Ok(n) => n,
                Err(e) => {
                    warn!(peer = %peer, error = %e, "read failed");
                    continue;
                }
            };

            let response = dispatcher.dispatch(&buffer[..read]).await;

            if let Err(e) = stream.write_all(&response).await {
                warn!(peer = %peer, error = %e, "write failed");
            }
        }
    }

    // The listener is built by hand to set SO_REUSEADDR and the small
    // fixed backlog before handing the socket to tokio.
    fn bind(&self) -> io::Result<TcpListener> {
        let socket = Socket::new(
            Domain::for_address(self.addr),
            Type::STREAM,
            Some(Protocol::TCP),
        )?;

        socket.set_reuse_address(true)?;
        socket.bind(&self.addr.into())?;
        socket.listen(self.limits.backlog)?;
        socket.set_nonblocking(true)?;

        TcpListener::from_std(socket.into())
    }
}

/// Builder for configuring and creating [`Server`] instances.
///
/// Every knob has a default matching the target system: address
/// `127.0.0.1:8888`, document root `.`, default [`ServerLimits`].
pub struct ServerBuilder {
    addr: Option<SocketAddr>,
    document_root: Option<PathBuf>,
    limits: Option<ServerLimits>,
}

impl ServerBuilder {
    /// Sets the address the listener binds to.
    #[inline(always)]
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets the directory file paths are resolved against.
    #[inline(always)]
    pub fn document_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.document_root = Some(root.into());
        self
    }

    /// Configures listener and connection limits.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crude_server::{limits::ServerLimits, Server};
    ///
    /// let server = Server::builder()
    ///     .limits(ServerLimits {
    ///         read_buffer_size: 4 * 1024,
    ///         ..ServerLimits::default()
    ///     })
    ///     .build();
    /// ```
    #[inline(always)]
    pub fn limits(mut self, limits: ServerLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Finalizes the builder and constructs a [`Server`] instance.
    #[inline]
    pub fn build(self) -> Server {
        Server {
            addr: self.addr.unwrap_or(DEFAULT_ADDR),
            document_root: self.document_root.unwrap_or_else(|| PathBuf::from(".")),
            limits: self.limits.unwrap_or_default(),
        }
    }
}

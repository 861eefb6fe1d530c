use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use trellis_config::ServerConfig;

use crate::dispatch::Dispatcher;
use crate::errors::{ServerError, ServerResult};
use crate::request::read_request;
use crate::response::{write_response, ResponseDescriptor};
use crate::types::{HyperResponse, JoinHandle};

/// `Operator` is a long running piece of the server that stops once a
/// message arrives on (or the sender side closes) its signal channel.
pub trait Operator {
    fn run(&self, signal: broadcast::Receiver<()>) -> JoinHandle<()>;
}

/// `HttpServer` accepts HTTP/1 connections and pushes every request through
/// the normalize, dispatch and write pipeline.
pub struct HttpServer {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

// -- Constructors

impl HttpServer {
    #[must_use]
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    #[must_use]
    pub fn shared(config: ServerConfig, dispatcher: Dispatcher) -> Arc<Self> {
        Arc::new(Self::new(config, dispatcher))
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

// -- Operator trait implementation

impl Operator for Arc<HttpServer> {
    fn run(&self, signal: broadcast::Receiver<()>) -> JoinHandle<()> {
        let server = self.clone();
        tokio::spawn(async move { server.listen(signal).await.map_err(Into::into) })
    }
}

// -- Accept loop

impl HttpServer {
    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address can't be bound and
    /// [`ServerError::Accept`] when accepting a connection fails.
    pub async fn listen(&self, shutdown: broadcast::Receiver<()>) -> ServerResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|err| ServerError::Bind(addr.clone(), err))?;

        self.serve_listener(listener, shutdown).await
    }

    /// Serves connections from an already bound `listener`. Each connection
    /// gets its own task; the loop itself only waits on `accept` and on
    /// `shutdown`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Accept`] when accepting a connection fails.
    pub async fn serve_listener(
        &self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> ServerResult<()> {
        if let Ok(local_addr) = listener.local_addr() {
            trellis_trace::info!("Listening on http://{}", local_addr);
        }

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    trellis_trace::info!("Shutting down http server");
                    return Ok(());
                }

                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let dispatcher = self.dispatcher.clone();
                            tokio::spawn(async move {
                                if let Err(err) = serve_connection(stream, peer, dispatcher).await {
                                    trellis_trace::error!(
                                        "Failed to serve connection from {}: {}",
                                        peer,
                                        err
                                    );
                                }
                            });
                        }
                        Err(err) => {
                            trellis_trace::error!("Failed to get new client connection {:?}", err);
                            return Err(ServerError::Accept(err));
                        }
                    }
                }
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<Dispatcher>,
) -> ServerResult<()> {
    trellis_trace::debug!("Accepted connection from {}", peer);

    http1::Builder::new()
        .serve_connection(TokioIo::new(stream), UnifiedService { dispatcher })
        .await
        .map_err(ServerError::Connection)
}

/// Hyper service shared by every request on a connection.
struct UnifiedService {
    dispatcher: Arc<Dispatcher>,
}

type ServiceFuture = Pin<Box<dyn Future<Output = ServerResult<HyperResponse>> + Send + 'static>>;

impl Service<hyper::Request<Incoming>> for UnifiedService {
    type Response = HyperResponse;
    type Error = ServerError;
    type Future = ServiceFuture;

    fn call(&self, request: hyper::Request<Incoming>) -> Self::Future {
        let dispatcher = self.dispatcher.clone();
        let method = request.method().as_str().to_lowercase();

        Box::pin(async move {
            match read_request(request).await {
                Ok(data) => Ok(dispatcher.dispatch(data).await),
                Err(ServerError::Normalize(err)) => {
                    trellis_trace::warn!("Rejected request: {}", err);
                    Ok(write_response(
                        &method,
                        "",
                        ResponseDescriptor::bad_request(err.to_string()),
                    ))
                }
                Err(err) => {
                    trellis_trace::error!("Failed to read request: {}", err);
                    Err(err)
                }
            }
        })
    }
}

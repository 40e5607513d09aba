//! HTTP/1 server for the dashboard.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clusterwatch::{AppContext, ClusterSource};
//! use clusterwatch_adapters::couchbase::Timeouts;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::new(ClusterSource::File("config.json".into()), Timeouts::default());
//!
//!     // Dashboard at http://127.0.0.1:5000/
//!     clusterwatch::server::serve(Arc::new(ctx), "127.0.0.1:5000").await?;
//!     Ok(())
//! }
//! ```

mod routes;

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::error::ServerError;

pub use routes::{route, Reply};

/// Bind `listen_addr` and serve until Ctrl-C.
pub async fn serve(ctx: Arc<AppContext>, listen_addr: &str) -> Result<(), ServerError> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|_| ServerError::InvalidAddress(listen_addr.to_string()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: listen_addr.to_string(),
            source,
        })?;

    info!(addr = %addr, "dashboard listening");

    run(listener, ctx, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Accept connections on `listener` until `shutdown` resolves.
///
/// Connections already accepted keep running on their own tasks.
pub async fn run(
    listener: TcpListener,
    ctx: Arc<AppContext>,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ServerError> {
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted.map_err(ServerError::Accept)?,
            _ = &mut shutdown => {
                info!("shutting down");
                return Ok(());
            }
        };

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let ctx = Arc::clone(&ctx);
                async move { handle_request(&ctx, req).await }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(peer = %peer, error = %e, "connection error");
            }
        });
    }
}

async fn handle_request(
    ctx: &AppContext,
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    debug!(method = %req.method(), path = req.uri().path(), "request");

    let reply = route(ctx, req.method(), req.uri().path()).await;

    let mut response = Response::new(Full::new(reply.body));
    *response.status_mut() = reply.status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(reply.content_type));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterwatch_adapters::couchbase::Timeouts;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use crate::context::ClusterSource;

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let ctx = Arc::new(AppContext::new(
            ClusterSource::Fixed(Vec::new()),
            Timeouts::default(),
        ));
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, ctx, async {
            let _ = stopped.await;
        }));

        let health = get(addr, "/health").await;
        assert!(health.starts_with("HTTP/1.1 200"));
        assert!(health.ends_with("OK"));

        let clusters = get(addr, "/api/clusters").await;
        assert!(clusters.starts_with("HTTP/1.1 500"));
        assert!(clusters.contains("application/json"));
        assert!(clusters.contains(r#"{"error":"No clusters configured"}"#));

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_invalid_listen_address() {
        let ctx = Arc::new(AppContext::new(
            ClusterSource::Fixed(Vec::new()),
            Timeouts::default(),
        ));

        let err = serve(ctx, "not an address").await.unwrap_err();

        assert!(matches!(err, ServerError::InvalidAddress(_)));
    }
}

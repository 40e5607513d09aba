//! In-process stand-in for a Couchbase management API, used by tests.

use std::convert::Infallible;
use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::AUTHORIZATION;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password";

// base64("admin:password")
const ADMIN_AUTHORIZATION: &str = "Basic YWRtaW46cGFzc3dvcmQ=";

const SUMMARY: &str = r#"{
    "clusterName": "test-cluster",
    "uuid": "12345-67890",
    "nodes": [{"hostname": "10.0.0.1:8091", "status": "healthy"}],
    "bucketNames": [{"bucketName": "travel-sample"}, {"bucketName": "missing"}]
}"#;

/// Start the fixture on an ephemeral port. It runs until the test runtime stops.
pub async fn serve() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(handle_request))
                    .await;
            });
        }
    });

    addr
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(ADMIN_AUTHORIZATION);

    let (status, body) = if !authorized {
        (StatusCode::UNAUTHORIZED, "{}")
    } else {
        match req.uri().path() {
            "/pools/default" => (StatusCode::OK, SUMMARY),
            "/pools/default/buckets/travel-sample" => {
                (StatusCode::OK, r#"{"bucketType": "membase"}"#)
            }
            "/pools/default/buckets/travel-sample/stats" => (
                StatusCode::OK,
                r#"{"op": {"samples": {"timestamp": [123456789]}}}"#,
            ),
            "/pools/default/buckets/broken" => (StatusCode::OK, "not json"),
            "/indexStatus" => (StatusCode::OK, r#"{"indexes": [{"name": "test-index"}]}"#),
            _ => (StatusCode::NOT_FOUND, "{}"),
        }
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    Ok(response)
}

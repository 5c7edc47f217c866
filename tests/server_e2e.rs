mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use nanolink::AppError;
use nanolink::application::services::LinkApi;
use nanolink::domain::entities::Link;
use nanolink::domain::redirect::RedirectOptions;
use nanolink::server::{Controller, RedirectController};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

/// Resolves every id to `https://github.com` after a fixed delay.
struct SlowLinkApi {
    delay: Duration,
}

#[async_trait]
impl LinkApi for SlowLinkApi {
    async fn add_link(&self, id: &str, _location: &str) -> Result<Link, AppError> {
        Err(AppError::already_exists(id))
    }

    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError> {
        tokio::time::sleep(self.delay).await;
        Ok(Link::new(id, "https://github.com", Utc::now()))
    }

    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError> {
        Err(AppError::not_found(id))
    }
}

async fn start(
    links: &[(&str, &str)],
    options: RedirectOptions,
) -> (Arc<RedirectController>, JoinHandle<Result<(), AppError>>, SocketAddr) {
    start_with(common::create_link_api(links).await, options).await
}

async fn start_with(
    link_api: Arc<dyn LinkApi>,
    options: RedirectOptions,
) -> (Arc<RedirectController>, JoinHandle<Result<(), AppError>>, SocketAddr) {
    let controller = Arc::new(RedirectController::new(link_api, options));

    let server = tokio::spawn({
        let controller = controller.clone();
        async move { controller.run().await }
    });

    let addr = controller.listening().await.expect("server failed to bind");
    (controller, server, addr)
}

fn local_options() -> RedirectOptions {
    RedirectOptions::builder()
        .host("127.0.0.1")
        .unwrap()
        .port(0)
        .unwrap()
        .build()
}

/// Sends one HTTP/1.1 request and returns the raw response.
async fn get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    send_request(&mut stream, "127.0.0.1", path).await;
    read_response(&mut stream).await
}

async fn send_request<S: AsyncWrite + Unpin>(stream: &mut S, host: &str, path: &str) {
    let request = format!("GET {path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
}

/// Reads until the server closes. A TLS peer closing without `close_notify`
/// still yields whatever arrived.
async fn read_response<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut raw = Vec::new();
    match stream.read_to_end(&mut raw).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {}
        Err(e) => panic!("read failed: {e}"),
    }
    String::from_utf8(raw).unwrap()
}

fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response
        .lines()
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

#[tokio::test]
async fn test_serves_redirects_over_tcp() {
    let (controller, server, addr) = start(&[("gh", "https://github.com")], local_options()).await;

    let response = get(addr, "/gh").await;
    assert!(status_line(&response).contains("308"), "{response}");
    assert_eq!(header(&response, "location"), Some("https://github.com"));
    assert!(header(&response, "x-request-id").is_some());

    let response = get(addr, "/missing").await;
    assert!(status_line(&response).contains("404"), "{response}");
    assert!(response.contains("/missing"));

    let response = get(addr, "/health").await;
    assert!(status_line(&response).contains("200"), "{response}");

    controller.shutdown(Duration::from_secs(1)).await;
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let (controller, server, addr) = start(&[("gh", "https://github.com")], local_options()).await;

    let response = get(addr, "/gh/").await;
    assert!(status_line(&response).contains("308"), "{response}");
    assert_eq!(header(&response, "location"), Some("https://github.com"));

    controller.shutdown(Duration::from_secs(1)).await;
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_accepting_connections() {
    let (controller, server, addr) = start(&[], local_options()).await;

    controller.shutdown(Duration::from_millis(200)).await;
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("run did not return after shutdown")
        .unwrap()
        .unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_bind_conflict_returns_io_error() {
    let (controller, server, addr) = start(&[], local_options()).await;

    let options = RedirectOptions::builder()
        .host("127.0.0.1")
        .unwrap()
        .port(i64::from(addr.port()))
        .unwrap()
        .build();
    let second = RedirectController::new(common::create_link_api(&[]).await, options);

    let result = tokio::time::timeout(Duration::from_secs(5), second.run())
        .await
        .expect("second run did not fail");
    assert!(matches!(result, Err(AppError::Io(_))));

    controller.shutdown(Duration::from_secs(1)).await;
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_tls_files_return_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let options = RedirectOptions::builder()
        .host("127.0.0.1")
        .unwrap()
        .port(0)
        .unwrap()
        .tls(dir.path().join("cert.pem"), dir.path().join("key.pem"))
        .unwrap()
        .build();
    let controller = RedirectController::new(common::create_link_api(&[]).await, options);

    let result = controller.run().await;

    assert!(matches!(result, Err(AppError::Io(_))));
}

#[tokio::test]
async fn test_shutdown_lets_in_flight_request_finish() {
    let link_api = Arc::new(SlowLinkApi {
        delay: Duration::from_millis(500),
    });
    let (controller, server, addr) = start_with(link_api, local_options()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    send_request(&mut stream, "127.0.0.1", "/gh").await;

    // the handler is now sleeping inside the lookup
    tokio::time::sleep(Duration::from_millis(100)).await;
    let started = Instant::now();
    controller.shutdown(Duration::from_secs(5)).await;

    let response = read_response(&mut stream).await;
    assert!(status_line(&response).contains("308"), "{response}");
    assert_eq!(header(&response, "location"), Some("https://github.com"));

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("run did not return after draining")
        .unwrap()
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_shutdown_accepts_unbounded_grace() {
    let (controller, server, _addr) = start(&[], local_options()).await;

    controller.shutdown(Duration::MAX).await;

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("run did not return after shutdown")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_serves_redirects_over_tls() {
    let dir = tempfile::tempdir().unwrap();
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_file = dir.path().join("cert.pem");
    let key_file = dir.path().join("key.pem");
    std::fs::write(&cert_file, cert.pem()).unwrap();
    std::fs::write(&key_file, key_pair.serialize_pem()).unwrap();

    let options = RedirectOptions::builder()
        .host("127.0.0.1")
        .unwrap()
        .port(0)
        .unwrap()
        .tls(&cert_file, &key_file)
        .unwrap()
        .build();
    let (controller, server, addr) = start(&[("gh", "https://github.com")], options).await;

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert.der().clone()).unwrap();
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let client_config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = tokio_rustls::TlsConnector::from(Arc::new(client_config));

    let tcp = TcpStream::connect(addr).await.unwrap();
    let server_name = rustls::pki_types::ServerName::try_from("localhost").unwrap();
    let mut stream = connector.connect(server_name, tcp).await.unwrap();

    send_request(&mut stream, "localhost", "/gh").await;
    let response = read_response(&mut stream).await;

    assert!(status_line(&response).contains("308"), "{response}");
    assert_eq!(header(&response, "location"), Some("https://github.com"));

    controller.shutdown(Duration::from_secs(1)).await;
    server.await.unwrap().unwrap();
}

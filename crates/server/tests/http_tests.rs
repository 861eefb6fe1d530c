use std::collections::BTreeMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use trellis_config::ServerConfig;
use trellis_server::{Dispatcher, HttpServer, RequestData, Responder, ResponseDescriptor};

struct TestServer {
    addr: SocketAddr,
    _shutdown: broadcast::Sender<()>,
    _public: tempfile::TempDir,
    _templates: tempfile::TempDir,
}

struct Reply {
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body should be json")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("body should be utf-8")
    }
}

fn site_config() -> (ServerConfig, tempfile::TempDir, tempfile::TempDir) {
    let public = tempfile::tempdir().expect("should create public dir");
    std::fs::create_dir_all(public.path().join("css")).unwrap();
    std::fs::write(public.path().join("css/site.css"), "body{margin:0}").unwrap();
    std::fs::create_dir_all(public.path().join("api")).unwrap();
    std::fs::write(public.path().join("api/file.json"), r#"{"items":[1,2]}"#).unwrap();
    std::fs::write(public.path().join("about.html"), "<p>static</p>").unwrap();

    let templates = tempfile::tempdir().expect("should create templates dir");
    std::fs::write(
        templates.path().join("index.html"),
        "<title>{{ site_name }}</title>",
    )
    .unwrap();

    let mut globals = BTreeMap::new();
    globals.insert(String::from("site_name"), String::from("Trellis"));

    let mut config = ServerConfig::default().with_port(0);
    config.public_directory = public.path().to_path_buf();
    config.templates_directory = templates.path().to_path_buf();
    config.template_globals = globals;

    (config, public, templates)
}

async fn start(dispatcher: impl FnOnce(&ServerConfig) -> Dispatcher) -> TestServer {
    let (config, public, templates) = site_config();
    let dispatcher = dispatcher(&config);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind listener");
    let addr = listener.local_addr().expect("should have address");

    let (shutdown, signal) = broadcast::channel::<()>(1);
    let server = HttpServer::shared(config, dispatcher);
    tokio::spawn(async move { server.serve_listener(listener, signal).await });

    TestServer {
        addr,
        _shutdown: shutdown,
        _public: public,
        _templates: templates,
    }
}

async fn send(server: &TestServer, method: Method, target: &str, body: &str) -> Reply {
    let stream = TcpStream::connect(server.addr)
        .await
        .expect("should connect");
    let (mut sender, connection) = http1::handshake(TokioIo::new(stream))
        .await
        .expect("should handshake");
    tokio::spawn(connection);

    let request = Request::builder()
        .method(method)
        .uri(target)
        .header(header::HOST, server.addr.to_string())
        .body(Full::new(Bytes::from(body.to_owned())))
        .expect("should build request");

    let response = sender
        .send_request(request)
        .await
        .expect("should get response");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("should read body")
        .to_bytes();

    Reply {
        status,
        content_type,
        body,
    }
}

fn echo(request: RequestData, responder: Responder) {
    let body = serde_json::to_value(&request).expect("request should serialize");
    responder.respond(ResponseDescriptor::new().with_payload(body));
}

#[tokio::test]
async fn serves_static_assets_with_mime_type() {
    let server = start(Dispatcher::from_config).await;

    let reply = send(&server, Method::GET, "/css/site.css", "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, "text/css");
    assert_eq!(reply.text(), "body{margin:0}");

    let reply = send(&server, Method::GET, "/css/missing.css", "").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.content_type, "text/plain");
}

#[tokio::test]
async fn serves_json_and_html_assets_byte_for_byte() {
    let server = start(Dispatcher::from_config).await;

    let reply = send(&server, Method::GET, "/api/file.json", "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, "application/json");
    assert_eq!(reply.text(), r#"{"items":[1,2]}"#);

    let reply = send(&server, Method::GET, "/about.html", "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, "text/html");
    assert_eq!(reply.text(), "<p>static</p>");
}

#[tokio::test]
async fn renders_site_root_template() {
    let server = start(Dispatcher::from_config).await;

    let reply = send(&server, Method::GET, "/", "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, "text/html");
    assert_eq!(reply.text(), "<title>Trellis</title>");
}

#[tokio::test]
async fn api_requests_are_not_implemented() {
    let server = start(Dispatcher::from_config).await;

    let reply = send(&server, Method::POST, "/api/users", r#"{"name":"ada"}"#).await;
    assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(reply.content_type, "application/json");
    assert_eq!(reply.json()["path"], "api/users");
}

#[tokio::test]
async fn handlers_receive_normalized_request() {
    let server = start(|_| Dispatcher::new().with_api(echo)).await;

    let reply = send(
        &server,
        Method::PUT,
        "/api/items?x=1&x=2&name=a%20b",
        r#"{"count": 3}"#,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let data = reply.json();
    assert_eq!(data["trimmed_path"], "api/items");
    assert_eq!(data["method"], "put");
    assert_eq!(data["query"]["x"], json!(["1", "2"]));
    assert_eq!(data["query"]["name"], "a b");
    assert_eq!(data["payload"], json!({"count": 3}));
    assert!(data["headers"]["host"].is_string());
}

#[tokio::test]
async fn invalid_json_body_becomes_empty_object() {
    let server = start(|_| Dispatcher::new().with_api(echo)).await;

    let reply = send(&server, Method::POST, "/api/items", "name=ada").await;
    assert_eq!(reply.json()["payload"], json!({}));
}

#[tokio::test]
async fn malformed_handler_reply_is_fixed() {
    let server = start(|_| {
        Dispatcher::new().with_template(|_request: RequestData, responder: Responder| {
            responder.respond(
                ResponseDescriptor::new()
                    .with_status("teapot")
                    .with_content_type(json!(["html"]))
                    .with_payload(json!({"ok": true})),
            );
        })
    })
    .await;

    let reply = send(&server, Method::GET, "/status", "").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type, "application/json");
    assert_eq!(reply.json(), json!({"ok": true}));
}

#[tokio::test]
async fn dropped_responder_is_internal_error() {
    let server = start(|_| {
        Dispatcher::new().with_template(|_request: RequestData, responder: Responder| {
            drop(responder);
        })
    })
    .await;

    let reply = send(&server, Method::GET, "/about", "").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.content_type, "application/json");
    assert!(reply.json()["error"].is_string());
}

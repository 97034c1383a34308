//! Integration tests for the client pipeline and the WordPress facade.
//!
//! Two kinds of server stand in for a real blog:
//! - `wiremock::MockServer`, for everything that depends on real HTTP;
//! - `Recorder`, an in-memory `Transport` that keeps each request
//!   document and answers with a canned reply.
//!
//! The whole file needs the `http` feature, which `pressrpc` turns on by
//! default even though the workspace imports the transport without it.

#![cfg(feature = "http")]

use std::sync::Mutex;

use pressrpc::prelude::*;
use pressrpc::protocol::{build_response, parse_call, MethodCall, ProtocolError};
use pressrpc::transport::TransportError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =========================================================================
// Helpers
// =========================================================================

/// Records request documents and replies with `reply`.
struct Recorder {
    reply: Vec<u8>,
    requests: Mutex<Vec<MethodCall>>,
}

impl Recorder {
    fn replying(response: MethodResponse) -> Self {
        Self {
            reply: build_response(&response).expect("fixture should encode"),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last_request(&self) -> MethodCall {
        self.requests.lock().unwrap().last().cloned().expect("a request")
    }
}

impl Transport for Recorder {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let text = String::from_utf8(body).expect("request should be UTF-8");
        let call = parse_call(&text).expect("request should parse");
        self.requests.lock().unwrap().push(call);
        Ok(self.reply.clone())
    }
}

fn fault_xml(code: i64, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse>\n  <fault>\n    <value>\n      <struct>\n\
         <member><name>faultCode</name><value><int>{code}</int></value></member>\n\
         <member><name>faultString</name><value><string>{message}</string></value></member>\n\
         </struct>\n    </value>\n  </fault>\n</methodResponse>\n"
    )
}

fn success_xml(value: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?><methodResponse><params><param><value>{value}</value></param></params></methodResponse>"
    )
}

fn credentials() -> Credentials {
    Credentials::new("admin", "secret")
}

async fn mount_reply(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/xmlrpc.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn http_client(server: &MockServer) -> XmlRpcClient<pressrpc::HttpTransport> {
    XmlRpcClient::builder()
        .base_url(&format!("{}/", server.uri()))
        .xmlrpc_path("/xmlrpc.php/")
        .user_agent("pressrpc-tests")
        .build()
        .expect("client should build")
}

// =========================================================================
// XmlRpcClient over HTTP
// =========================================================================

#[tokio::test]
async fn test_call_posts_document_and_decodes_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/xmlrpc.php"))
        .and(header("content-type", "text/xml"))
        .and(header("user-agent", "pressrpc-tests"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(success_xml("<boolean>0</boolean>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = http_client(&server);
    let response = client
        .call("demo.isEnabled", vec![Native::from(0)])
        .await
        .expect("call should succeed");

    assert_eq!(response, MethodResponse::Success(Value::Boolean(false)));

    let requests = server.received_requests().await.unwrap();
    let call = parse_call(std::str::from_utf8(&requests[0].body).unwrap()).unwrap();
    assert_eq!(call.method, "demo.isEnabled");
    assert_eq!(call.params, vec![Value::Integer(0)]);
    server.verify().await;
}

#[tokio::test]
async fn test_fault_is_a_response_not_an_error() {
    let server = MockServer::start().await;
    mount_reply(&server, fault_xml(403, "Incorrect username or password.")).await;

    let response = http_client(&server)
        .call("wp.getProfile", vec![Native::from(1)])
        .await
        .expect("a fault is not a call error");

    assert_eq!(
        response,
        MethodResponse::Fault(Fault {
            code: "403".into(),
            message: "Incorrect username or password.".into(),
        })
    );
}

#[tokio::test]
async fn test_call_value_lifts_fault_into_error() {
    let server = MockServer::start().await;
    mount_reply(&server, fault_xml(401, "Sorry, you are not allowed.")).await;

    let err = http_client(&server)
        .call_value("wp.getProfile", Vec::<Native>::new())
        .await
        .unwrap_err();

    let fault = err.as_fault().expect("should be a fault");
    assert_eq!(fault.code, "401");
}

#[tokio::test]
async fn test_http_error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = http_client(&server)
        .call("wp.getProfile", Vec::<Native>::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Transport(TransportError::Status(503))));
}

#[tokio::test]
async fn test_html_body_is_transport_error() {
    let server = MockServer::start().await;
    mount_reply(&server, "<html><body><h1>Maintenance".to_string()).await;

    let err = http_client(&server)
        .call("wp.getProfile", Vec::<Native>::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::Transport(TransportError::MalformedBody(_))
    ));
}

#[tokio::test]
async fn test_response_without_params_or_fault_is_protocol_error() {
    let server = MockServer::start().await;
    mount_reply(&server, "<methodResponse></methodResponse>".to_string()).await;

    let err = http_client(&server)
        .call("wp.getProfile", Vec::<Native>::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::Protocol(ProtocolError::MissingResult)
    ));
}

#[tokio::test]
async fn test_unknown_value_type_is_protocol_error() {
    let server = MockServer::start().await;
    mount_reply(&server, success_xml("<base64>aGk=</base64>")).await;

    let err = http_client(&server)
        .call("demo.blob", Vec::<Native>::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::Protocol(ProtocolError::UnrecognizedValue(_))
    ));
}

#[tokio::test]
async fn test_cloned_clients_call_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(success_xml("<i4>1</i4>")))
        .expect(4)
        .mount(&server)
        .await;

    let client = http_client(&server);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.call("demo.ping", vec![Native::from(i)]).await })
        })
        .collect();

    for handle in handles {
        let response = handle.await.expect("task should complete").unwrap();
        assert_eq!(response, MethodResponse::Success(Value::Integer(1)));
    }
    server.verify().await;
}

// =========================================================================
// Pipeline over an in-memory transport
// =========================================================================

#[tokio::test]
async fn test_nested_params_arrive_intact() {
    let recorder = Recorder::replying(MethodResponse::Success(Value::Integer(1)));
    let client = XmlRpcClient::with_transport(recorder);

    let mut post = IndexMap::new();
    post.insert("categories".to_string(), Native::from(vec![1, 2, 3]));
    post.insert("title".to_string(), Native::from("x"));
    post.insert("flag".to_string(), Native::from(true));
    client
        .call("demo.store", vec![Native::Map(post.clone())])
        .await
        .unwrap();

    let call = client.transport().last_request();
    assert_eq!(call.params, vec![pressrpc::protocol::encode(Native::Map(post))]);
}

#[tokio::test]
async fn test_fault_shaped_success_stays_success() {
    let mut members = IndexMap::new();
    members.insert("faultCode".to_string(), Value::Integer(7));
    members.insert("faultString".to_string(), Value::String("data".into()));
    let value = Value::Struct(members);
    let client = XmlRpcClient::with_transport(Recorder::replying(MethodResponse::Success(
        value.clone(),
    )));

    let response = client.call("demo.echo", Vec::<Native>::new()).await.unwrap();
    assert_eq!(response, MethodResponse::Success(value));
}

// =========================================================================
// WordPress facade
// =========================================================================

#[tokio::test]
async fn test_new_post_sends_metaweblog_params() {
    let recorder = Recorder::replying(MethodResponse::Success(Value::String("42".into())));
    let wp = WordPressClient::new(XmlRpcClient::with_transport(recorder));

    let params = PostParams {
        status: PostStatus::Publish,
        comment_status: CommentStatus::Closed,
        categories: vec![3],
    };
    let id = wp
        .new_post(&credentials(), "Title", "<p>Body</p>", &params)
        .await
        .unwrap();
    assert_eq!(id, Value::String("42".into()));

    let call = wp.client().transport().last_request();
    assert_eq!(call.method, "metaWeblog.newPost");
    assert_eq!(call.params.len(), 5);
    assert_eq!(call.params[0], Value::Integer(1));
    assert_eq!(call.params[1], Value::String("admin".into()));
    assert_eq!(call.params[2], Value::String("secret".into()));
    assert_eq!(call.params[4], Value::Boolean(true));

    let post = &call.params[3];
    assert_eq!(post.get("post_type"), Some(&Value::String("post".into())));
    assert_eq!(post.get("post_status"), Some(&Value::String("publish".into())));
    assert_eq!(post.get("mt_allow_comments"), Some(&Value::String("closed".into())));
    assert_eq!(post.get("title"), Some(&Value::String("Title".into())));
    assert_eq!(post.get("description"), Some(&Value::String("<p>Body</p>".into())));
    assert_eq!(post.get("categories"), Some(&Value::Array(vec![Value::Integer(3)])));
}

#[tokio::test]
async fn test_categories_decode_into_records() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        success_xml(
            "<array><data><value><struct>\
               <member><name>categoryId</name><value><string>3</string></value></member>\
               <member><name>parentId</name><value><string>0</string></value></member>\
               <member><name>categoryName</name><value><string>Rust</string></value></member>\
               <member><name>htmlUrl</name><value><string>https://blog.example.com/rust</string></value></member>\
             </struct></value></data></array>",
        ),
    )
    .await;

    let wp = WordPressClient::new(http_client(&server));
    let categories = wp.categories(&credentials()).await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, "3");
    assert_eq!(categories[0].name, "Rust");
    assert_eq!(categories[0].html_url, "https://blog.example.com/rust");
    assert_eq!(categories[0].rss_url, "");
}

#[tokio::test]
async fn test_validate_user_reports_bad_credentials_as_fault() {
    let server = MockServer::start().await;
    mount_reply(&server, fault_xml(403, "Incorrect username or password.")).await;

    let wp = WordPressClient::new(http_client(&server)).with_blog_id(2);
    let err = wp.validate_user(&credentials()).await.unwrap_err();

    assert!(matches!(err, Error::Fault(ref f) if f.message == "Incorrect username or password."));

    let requests = server.received_requests().await.unwrap();
    let call = parse_call(std::str::from_utf8(&requests[0].body).unwrap()).unwrap();
    assert_eq!(call.method, "wp.getProfile");
    assert_eq!(call.params[0], Value::Integer(2));
}

mod helpers;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use helpers::{SERVICE_KEY, UPSTREAM_KEY, test_app};

fn parse_request(key: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/parse")
        .header(CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_is_public() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri(), true);

    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_parse_requires_api_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let body = json!({"url": "https://v.douyin.com/abc/"});

    let (status, json) = send(test_app(&mock_server.uri(), true), parse_request(None, body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({"code": 401, "message": "unauthorized", "data": null}));

    let (status, _) = send(
        test_app(&mock_server.uri(), true),
        parse_request(Some("wrong"), body),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_parse_end_to_end() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xiaohongshu"))
        .and(query_param("key", UPSTREAM_KEY))
        .and(query_param("url", "http://xhslink.com/a/9sKpxg36vxk9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {
                "title": "周末探店",
                "desc": "好吃",
                "cover": "https://example.com/c.jpg",
                "author": {"name": "阿花", "avatar": "https://example.com/a.jpg"},
                "url": "https://example.com/v.mp4",
                "statistics": {"like_count": 99}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server.uri(), true);
    let (status, json) = send(
        app,
        parse_request(
            Some(SERVICE_KEY),
            json!({"url": "http://xhslink.com/a/9sKpxg36vxk9，复制本条信息，打开小红书App查看"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "success");

    let data = &json["data"];
    assert_eq!(data["platform"], "xiaohongshu");
    assert_eq!(data["platform_name"], "小红书");
    assert_eq!(data["title"], "周末探店");
    assert_eq!(data["description"], "好吃");
    assert_eq!(data["cover_url"], "https://example.com/c.jpg");
    assert_eq!(data["author"], json!({"name": "阿花", "avatar": "https://example.com/a.jpg"}));
    assert_eq!(data["video_url"], "https://example.com/v.mp4");
    assert_eq!(data["music_url"], "");
    assert_eq!(data["statistics"], json!({"likes": 99, "comments": 0, "shares": 0}));
    assert_eq!(data["original_url"], "http://xhslink.com/a/9sKpxg36vxk9");
    assert_eq!(data["raw_data"]["title"], "周末探店");
}

#[tokio::test]
async fn test_parse_unknown_platform_is_not_found() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri(), true);

    let (status, json) = send(
        app,
        parse_request(Some(SERVICE_KEY), json!({"url": "https://www.youtube.com/watch?v=x"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn test_upstream_rejection_passthrough() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 500, "msg": "解析失败"})),
        )
        .mount(&mock_server)
        .await;

    let body = json!({"url": "https://v.kuaishou.com/t4fab5", "platform": "kuaishou"});

    let (status, json) = send(
        test_app(&mock_server.uri(), true),
        parse_request(Some(SERVICE_KEY), body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["message"], "upstream error: 解析失败");
    assert_eq!(json["data"], json!({"code": 500, "msg": "解析失败"}));

    let (status, json) = send(
        test_app(&mock_server.uri(), false),
        parse_request(Some(SERVICE_KEY), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["data"], Value::Null);
}

#[tokio::test]
async fn test_upstream_outage_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&mock_server)
        .await;

    let app = test_app(&mock_server.uri(), true);
    let (status, json) = send(
        app,
        parse_request(Some(SERVICE_KEY), json!({"url": "https://b23.tv/BV1GJ411x7h7"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], 502);
}

#[tokio::test]
async fn test_transport_failure_does_not_leak_upstream_key() {
    // Grab a free port and release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = test_app(&format!("http://{addr}/api"), true);
    let request = parse_request(Some(SERVICE_KEY), json!({"url": "https://v.douyin.com/abc/"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("transport error"), "{text}");
    assert!(!text.contains(UPSTREAM_KEY), "{text}");
    assert!(!text.contains("key="), "{text}");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri(), true);

    let request = Request::builder()
        .uri("/api/v1/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"].get("/api/v1/parse").is_some());
    assert!(json["paths"].get("/api/v1/health").is_some());
    assert!(json["paths"].get("/api/v1/platforms").is_some());
}

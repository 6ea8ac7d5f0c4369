use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_path_and_query() {
    let resp = app()
        .oneshot(empty_request("GET", "/v1/users?page=2&limit=10"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/v1/users");
    assert_eq!(echo.query.as_deref(), Some("page=2&limit=10"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reflects_headers_and_body() {
    let req = Request::builder()
        .method("POST")
        .uri("/auth")
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-Trace", "abc")
        .body(r#"{"username":"u"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.header("content-type"), Some("application/json"));
    assert_eq!(echo.header("x-trace"), Some("abc"));
    assert_eq!(echo.body, r#"{"username":"u"}"#);
    assert_eq!(echo.query, None);
}

#[tokio::test]
async fn echo_accepts_every_method() {
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"] {
        let resp = app().oneshot(empty_request(method, "/any")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
    }
}

// --- captured ---

#[tokio::test]
async fn captured_starts_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/__captured"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let captured: Vec<Echo> = body_json(resp).await;
    assert!(captured.is_empty());
}

#[tokio::test]
async fn captured_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "GET",
            "/__captured/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn captured_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/__captured/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full capture lifecycle ---

#[tokio::test]
async fn capture_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // two echoes
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/items/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Echo = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("PATCH", "/items/2"))
        .await
        .unwrap();
    let second: Echo = body_json(resp).await;
    assert_ne!(first.id, second.id);

    // list keeps arrival order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/__captured"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let captured: Vec<Echo> = body_json(resp).await;
    assert_eq!(captured, vec![first.clone(), second.clone()]);

    // get one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/__captured/{}", second.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Echo = body_json(resp).await;
    assert_eq!(fetched, second);

    // clear
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/__captured"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after clear is a 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/__captured/{}", first.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

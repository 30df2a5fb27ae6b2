//! Route-level smoke tests that need no database: the public healthcheck,
//! the auth middleware's early token rejection, and 404 routing.

use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};

use sacristy_app::app::api::routes;

fn service() -> salvo::Service {
    salvo::Service::new(salvo::Router::new().push(routes()))
}

#[test_log::test(tokio::test)]
async fn test_healthcheck_is_public() {
    let mut response = TestClient::get("http://127.0.0.1:8642/api/healthcheck")
        .send(&service())
        .await;

    assert_eq!(response.status_code, Some(StatusCode::OK));
    assert_eq!(response.take_string().await.unwrap_or_default(), "OK");
}

#[test_log::test(tokio::test)]
async fn test_protected_route_without_token_is_401() {
    let response = TestClient::get("http://127.0.0.1:8642/api/rooms")
        .send(&service())
        .await;

    assert_eq!(response.status_code, Some(StatusCode::UNAUTHORIZED));
}

#[test_log::test(tokio::test)]
async fn test_protected_route_with_malformed_header_is_401() {
    let response = TestClient::get("http://127.0.0.1:8642/api/calendar/occurrences")
        .add_header("authorization", "Basic dXNlcjpwYXNz", true)
        .send(&service())
        .await;

    assert_eq!(response.status_code, Some(StatusCode::UNAUTHORIZED));
}

#[test_log::test(tokio::test)]
async fn test_unknown_route_is_404() {
    let response = TestClient::get("http://127.0.0.1:8642/api/does-not-exist")
        .send(&service())
        .await;

    assert_eq!(response.status_code, Some(StatusCode::NOT_FOUND));
}

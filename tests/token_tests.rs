use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wechat_work_sdk::client::WechatClient;
use wechat_work_sdk::types::{CorpId, CorpSecret};
use wechat_work_sdk::{TokenManager, TokenProvider, WechatError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> WechatClient {
    WechatClient::builder()
        .corpid(CorpId::new("ww1234567890abcdef").unwrap())
        .secret(CorpSecret::new("test_secret_12345").unwrap())
        .base_url(mock_server.uri())
        .build()
        .unwrap()
}

fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
    json!({
        "errcode": 0,
        "errmsg": "ok",
        "access_token": token,
        "expires_in": expires_in
    })
}

#[tokio::test]
async fn test_token_fetch_sends_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .and(query_param("corpid", "ww1234567890abcdef"))
        .and(query_param("corpsecret", "test_secret_12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("abc", 7200)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    assert_eq!(manager.get_token().await.unwrap(), "abc");
}

#[tokio::test]
async fn test_token_is_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("cached", 7200)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    for _ in 0..3 {
        assert_eq!(manager.get_token().await.unwrap(), "cached");
    }
}

#[tokio::test]
async fn test_token_inside_refresh_buffer_is_refetched() {
    let mock_server = MockServer::start().await;

    // 60s lifetime is below the default 5 minute buffer.
    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("short", 60)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    manager.get_token().await.unwrap();
    manager.get_token().await.unwrap();
}

#[tokio::test]
async fn test_custom_refresh_buffer_keeps_short_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("short", 60)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server))
        .with_refresh_buffer(Duration::from_secs(10));
    manager.get_token().await.unwrap();
    manager.get_token().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("shared", 7200))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = Arc::new(TokenManager::new(create_test_client(&mock_server)));
    let tasks = (0..5).map(|_| {
        let manager = manager.clone();
        async move { manager.get_token().await }
    });

    for result in futures::future::join_all(tasks).await {
        assert_eq!(result.unwrap(), "shared");
    }
}

#[tokio::test]
async fn test_token_errcode_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40001,
            "errmsg": "invalid credential"
        })))
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    let result = manager.get_token().await;

    match result {
        Err(WechatError::Api { code, message }) => {
            assert_eq!(code, 40001);
            assert_eq!(message, "invalid credential");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_token_is_token_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "access_token": "",
            "expires_in": 7200
        })))
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    assert!(matches!(manager.get_token().await, Err(WechatError::Token(_))));
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("recovered", 7200)))
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    assert!(matches!(manager.get_token().await, Err(WechatError::Http(_))));
    assert_eq!(manager.get_token().await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/gettoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("again", 7200)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let manager = TokenManager::new(create_test_client(&mock_server));
    manager.get_token().await.unwrap();
    manager.invalidate().await;
    manager.get_token().await.unwrap();
}

//! HTTP integration tests for the Peatio session
//!
//! Drives `PeatioSession` over the real `reqwest` transport against a local
//! mockito server.
//!
//! # Running the tests
//! ```bash
//! cargo test --test peatio_http
//! ```

use mockito::Matcher;
use rust_decimal_macros::dec;

use peatio_agent::adapters::{
    ExchangeAgent, ExchangeError, OrderRequest, OrderSpec, OrderStatus, PeatioConfig,
    PeatioSession,
};

// =============================================================================
// Helpers
// =============================================================================

fn public_config(url: String) -> PeatioConfig {
    PeatioConfig {
        endpoint: url,
        ..Default::default()
    }
}

fn private_config(url: String) -> PeatioConfig {
    PeatioConfig {
        access_key: "test-access".to_string(),
        secret_key: "test-secret".to_string(),
        endpoint: url,
        ..Default::default()
    }
}

fn signed() -> Vec<Matcher> {
    vec![
        Matcher::UrlEncoded("access_key".into(), "test-access".into()),
        Matcher::Regex(r"tonce=\d{13}".into()),
        Matcher::Regex(r"signature=[0-9a-f]{64}".into()),
    ]
}

fn with_signed(mut matchers: Vec<Matcher>) -> Matcher {
    matchers.extend(signed());
    Matcher::AllOf(matchers)
}

const ORDER_BODY: &str = r#"{
    "id": 7, "side": "buy", "ord_type": "limit", "price": "3000.0",
    "avg_price": "0.0", "state": "wait", "market": "btccny",
    "created_at": "2014-04-18T02:02:33Z", "volume": "0.5",
    "remaining_volume": "0.5", "executed_volume": "0.0", "trades_count": 0
}"#;

// =============================================================================
// Market data
// =============================================================================

#[tokio::test]
async fn test_public_ticker_is_unsigned() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/tickers/btccny")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"at":1398410899,"ticker":{"buy":"3000.0","sell":"3100.0","low":"2900.0","high":"3200.0","last":"3050.0","vol":"42.1"}}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(public_config(server.url())).unwrap();
    let ticker = session.ticker().await.unwrap();

    assert_eq!(ticker.bid, dec!(3000.0));
    assert_eq!(ticker.ask, dec!(3100.0));
    assert_eq!(ticker.volume, Some(dec!(42.1)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_depth_is_sorted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/depth")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("market".into(), "btccny".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"timestamp":1398410899,"asks":[["3300.0","1.0"],["3100.0","2.0"],["3200.0","0.5"]],"bids":[["2900.0","1.0"],["3000.0","3.0"]]}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(public_config(server.url())).unwrap();
    let offers = session.offers().await.unwrap();

    let asks: Vec<_> = offers.asks.iter().map(|o| o.price).collect();
    let bids: Vec<_> = offers.bids.iter().map(|o| o.price).collect();
    assert_eq!(asks, vec![dec!(3100), dec!(3200), dec!(3300)]);
    assert_eq!(bids, vec![dec!(3000), dec!(2900)]);
    mock.assert_async().await;
}

// =============================================================================
// Signed requests
// =============================================================================

#[tokio::test]
async fn test_account_request_is_signed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/members/me")
        .match_query(with_signed(Vec::new()))
        .with_status(200)
        .with_body(r#"{"sn":"PEA5TFFOGQHTIO","name":"foo","email":"foo@peatio.dev","activated":true,"accounts":[{"currency":"cny","balance":"100.0","locked":"0.0"},{"currency":"btc","balance":"1.0","locked":"0.5"}]}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let account = session.account().await.unwrap();

    let btc = account.balance("BTC").unwrap();
    assert_eq!(btc.amount, dec!(1.0));
    assert_eq!(btc.locked, dec!(0.5));
    assert_eq!(account.balance("cny").unwrap().amount, dec!(100.0));
    assert_eq!(account.original["sn"], "PEA5TFFOGQHTIO");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_buy_posts_signed_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/orders")
        .match_body(with_signed(vec![
            Matcher::UrlEncoded("market".into(), "btccny".into()),
            Matcher::UrlEncoded("side".into(), "buy".into()),
            Matcher::UrlEncoded("volume".into(), "0.5".into()),
            Matcher::UrlEncoded("price".into(), "3000.0".into()),
            Matcher::UrlEncoded("ord_type".into(), "limit".into()),
        ]))
        .with_status(201)
        .with_body(ORDER_BODY)
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let order = session
        .buy(OrderSpec::limit(dec!(0.5), dec!(3000.0)))
        .await
        .unwrap();

    assert_eq!(order.order_id, 7);
    assert_eq!(order.amount, dec!(0.5));
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.order_type, "exchange limit");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_batch_place_sends_repeated_keys() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/orders/multi")
        .match_body(with_signed(vec![Matcher::Regex(
            r"orders%5B%5D%5Bside%5D=buy.*orders%5B%5D%5Bside%5D=sell".into(),
        )]))
        .with_status(201)
        .with_body(format!("[{},{}]", ORDER_BODY, ORDER_BODY.replace("\"id\": 7", "\"id\": 8")))
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let orders = session
        .batch_place(vec![
            OrderRequest::buy(OrderSpec::limit(dec!(0.5), dec!(3000))),
            OrderRequest::sell(OrderSpec::limit(dec!(0.5), dec!(3100))),
        ])
        .await
        .unwrap();

    assert_eq!(orders.iter().map(|o| o.order_id).collect::<Vec<_>>(), vec![7, 8]);
    mock.assert_async().await;
}

// =============================================================================
// Error classification
// =============================================================================

#[tokio::test]
async fn test_unauthorized_body_on_401() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/members/me")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"code":2001,"message":"The access key does not exist."}}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let err = session.account().await.unwrap_err();

    match err {
        ExchangeError::Unauthorized(msg) => assert!(msg.contains("access key")),
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_already_canceled() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/order/delete")
        .match_body(with_signed(vec![Matcher::UrlEncoded("id".into(), "7".into())]))
        .with_status(400)
        .with_body(r#"{"error":{"code":2003,"message":"Failed to cancel order. Reason: order is canceled"}}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let err = session.cancel(7).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Canceled(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_other_error_code_is_generic() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v2/orders")
        .match_body(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"code":2002,"message":"Failed to create order. Reason: insufficient funds"}}"#)
        .create_async()
        .await;

    let session = PeatioSession::new(private_config(server.url())).unwrap();
    let err = session.sell(OrderSpec::market(dec!(10))).await.unwrap_err();

    match err {
        ExchangeError::Api { code, message } => {
            assert_eq!(code, Some(2002));
            assert!(message.contains("insufficient funds"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tickers/btccny")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let session = PeatioSession::new(public_config(server.url())).unwrap();
    let err = session.ticker().await.unwrap_err();

    match err {
        ExchangeError::Http { status, body } => {
            assert_eq!(status, 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let session = PeatioSession::new(public_config("http://127.0.0.1:1".to_string())).unwrap();
    let err = session.ticker().await.unwrap_err();
    assert!(matches!(err, ExchangeError::ConnectionFailed(_)));
}

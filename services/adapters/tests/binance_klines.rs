//! Binance kline collector against a mocked REST endpoint

use adapter_service::{AdapterError, BinanceKlineCollector, BinanceRestConfig, CandleFetcher};
use mockito::Matcher;
use std::time::Duration;
use types::{Timeframe, TradingPair, VenueId};

fn collector_for(url: String) -> BinanceKlineCollector {
    BinanceKlineCollector::new(BinanceRestConfig {
        venue: VenueId::Binance,
        base_url: url,
        request_timeout: Duration::from_secs(2),
        requests_per_minute: 1200,
    })
    .expect("collector")
}

fn btc_usdt() -> TradingPair {
    TradingPair::new("BTC", "USDT").unwrap()
}

const TWO_KLINES: &str = r#"[
  [1704067200000,"42000.0","42500.5","41800.0","42300.25","123.4",1704153599999,"0",10,"0","0","0"],
  [1704153600000,"42300.25","43000.0","42100.0","42900.0","98.7",1704239999999,"0",12,"0","0","0"]
]"#;

#[tokio::test]
async fn fetch_sends_symbol_interval_and_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()),
            Matcher::UrlEncoded("interval".into(), "1d".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_KLINES)
        .create_async()
        .await;

    let collector = collector_for(server.url());
    let series = collector
        .fetch(&btc_usdt(), Timeframe::OneDay, 2)
        .await
        .expect("fetch succeeds");

    mock.assert_async().await;
    assert_eq!(series.len(), 2);
    assert_eq!(series.timeframe(), Timeframe::OneDay);
    assert_eq!(series.pair().to_string(), "BTC/USDT");
    assert_eq!(series.closes(), vec![42300.25, 42900.0]);
}

#[tokio::test]
async fn rate_limited_response_maps_to_rate_limit_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"code":-1003,"msg":"Too many requests."}"#)
        .create_async()
        .await;

    let err = collector_for(server.url())
        .fetch(&btc_usdt(), Timeframe::OneMinute, 500)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::RateLimitExceeded { venue: VenueId::Binance }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn rejected_symbol_carries_exchange_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
        .create_async()
        .await;

    let pair = TradingPair::new("NOPE", "USDT").unwrap();
    let err = collector_for(server.url())
        .fetch(&pair, Timeframe::OneMinute, 10)
        .await
        .unwrap_err();

    match err {
        AdapterError::ExchangeRejected { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid symbol.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn out_of_order_klines_are_a_parse_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"[
              [2000,"1","1","1","1","1",2999,"0",1,"0","0","0"],
              [1000,"1","1","1","1","1",1999,"0",1,"0","0","0"]
            ]"#,
        )
        .create_async()
        .await;

    let err = collector_for(server.url())
        .fetch(&btc_usdt(), Timeframe::OneMinute, 2)
        .await;
    assert!(matches!(err, Err(AdapterError::ParseError { .. })));
}

#[tokio::test]
async fn garbage_body_is_a_json_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v3/klines")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = collector_for(server.url())
        .fetch(&btc_usdt(), Timeframe::OneHour, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::JsonParse(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn unreachable_host_is_a_connection_failure() {
    // Port 9 (discard) is closed on test hosts
    let err = collector_for("http://127.0.0.1:9".to_string())
        .fetch(&btc_usdt(), Timeframe::OneHour, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::ConnectionFailed { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn stalled_server_is_a_connection_timeout() {
    // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let collector = BinanceKlineCollector::new(BinanceRestConfig {
        venue: VenueId::Binance,
        base_url: format!("http://{}", addr),
        request_timeout: Duration::from_millis(200),
        requests_per_minute: 1200,
    })
    .unwrap();

    let err = collector
        .fetch(&btc_usdt(), Timeframe::OneHour, 5)
        .await
        .unwrap_err();
    server.abort();

    assert!(err.is_transient());
    match err {
        AdapterError::ConnectionTimeout { venue, timeout_ms } => {
            assert_eq!(venue, VenueId::Binance);
            assert_eq!(timeout_ms, 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

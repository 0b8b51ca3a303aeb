use super::*;
use alloy::{
    primitives::b256,
    providers::{ProviderBuilder, mock::Asserter},
};
use clickhouse::test::{Mock, handlers};
use runtime::shutdown_channel;
use serde_json::json;
use storage::ProgressRow;
use url::Url;

const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const CREATION_TX: &str = "0xb95343413e459a0f97461812111254163ae53467855c0d73e0f1e7c5b8442fa3";

fn driver(asserter: &Asserter, clickhouse: &Mock, explorer_url: String) -> Driver<impl Provider + Clone> {
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    let url = Url::parse(clickhouse.url()).unwrap();
    let writer = ClickhouseWriter::new(url.clone(), "db".to_owned(), "user".into(), "pass".into());
    let reader = ClickhouseReader::new(url, "db".to_owned(), "user".into(), "pass".into());
    let explorer = ExplorerClient::new(explorer_url, "test-key".to_owned());
    Driver::from_parts(provider, writer, reader, explorer)
}

fn receipt_json(block_number: u64) -> serde_json::Value {
    json!({
        "transactionHash": CREATION_TX,
        "transactionIndex": "0x0",
        "blockHash": "0x0101010101010101010101010101010101010101010101010101010101010101",
        "blockNumber": format!("0x{block_number:x}"),
        "from": "0x4f26ffbe5f04ed43630fdc30a87638d53d0b0876",
        "to": null,
        "contractAddress": WETH,
        "cumulativeGasUsed": "0x0",
        "gasUsed": "0x0",
        "effectiveGasPrice": "0x0",
        "status": "0x1",
        "type": "0x0",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
    })
}

fn log_json(block_number: u64, log_index: u64) -> serde_json::Value {
    json!({
        "address": WETH,
        "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
        "data": "0xdead",
        "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
        "blockNumber": format!("0x{block_number:x}"),
        "transactionHash": "0x0303030303030303030303030303030303030303030303030303030303030303",
        "transactionIndex": "0x1",
        "logIndex": format!("0x{log_index:x}"),
        "removed": false,
    })
}

#[tokio::test]
async fn resume_point_continues_after_persisted_progress() {
    let asserter = Asserter::new();
    let clickhouse = Mock::new();
    clickhouse
        .add(handlers::provide(vec![ProgressRow { block_number: 17_899_692, log_index: 42 }]));
    let server = mockito::Server::new_async().await;

    let (_handle, token) = shutdown_channel();
    let driver = driver(&asserter, &clickhouse, server.url());
    let from = driver.resume_point(parse_address(WETH).unwrap(), &token).await.unwrap();
    assert_eq!(from, 17_899_693);
}

#[tokio::test]
async fn resume_point_falls_back_to_contract_creation() {
    let asserter = Asserter::new();
    asserter.push_success(&receipt_json(4_719_568));

    let clickhouse = Mock::new();
    clickhouse.add(handlers::provide(Vec::<ProgressRow>::new()));

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(mockito::Matcher::UrlEncoded(
            "action".into(),
            "getcontractcreation".into(),
        ))
        .with_body(
            json!({
                "status": "1",
                "message": "OK",
                "result": [{
                    "contractAddress": WETH,
                    "contractCreator": "0x4f26ffbe5f04ed43630fdc30a87638d53d0b0876",
                    "txHash": CREATION_TX,
                }],
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (_handle, token) = shutdown_channel();
    let driver = driver(&asserter, &clickhouse, server.url());
    let from = driver.resume_point(parse_address(WETH).unwrap(), &token).await.unwrap();
    assert_eq!(from, 4_719_568);
}

#[tokio::test]
async fn resume_lookup_stops_on_shutdown() {
    // The cursor is empty, so resuming would need the explorer and the node.
    // With shutdown already requested, neither may be contacted: no provider
    // responses and no explorer routes are registered, so any request would
    // fail the test with a different error.
    let asserter = Asserter::new();
    let clickhouse = Mock::new();
    clickhouse.add(handlers::provide(Vec::<ProgressRow>::new()));
    let server = mockito::Server::new_async().await;

    let (handle, token) = shutdown_channel();
    handle.trigger();

    let driver = driver(&asserter, &clickhouse, server.url());
    let err = driver.resume_point(parse_address(WETH).unwrap(), &token).await.unwrap_err();
    assert!(err.to_string().contains("cancelled"));
}

#[tokio::test]
async fn backfill_persists_batches_until_caught_up() {
    let asserter = Asserter::new();
    // First pass: head, then one served window.
    asserter.push_success(&serde_json::Value::from(17_899_823u64));
    asserter.push_success(&json!([log_json(17_899_700, 7)]));
    // Second pass: cursor is past head, fetch short-circuits after the head
    // query and the backfill ends.
    asserter.push_success(&serde_json::Value::from(17_899_823u64));

    let clickhouse = Mock::new();
    clickhouse
        .add(handlers::provide(vec![ProgressRow { block_number: 17_899_692, log_index: 42 }]));
    let inserted = clickhouse.add(handlers::record::<storage::LogRow>());
    let server = mockito::Server::new_async().await;

    let (_handle, token) = shutdown_channel();
    let driver = driver(&asserter, &clickhouse, server.url());
    driver.backfill(WETH, &token).await.unwrap();

    let rows: Vec<storage::LogRow> = inserted.collect().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].block_number, 17_899_700);
    assert_eq!(rows[0].log_index, 7);
    assert_eq!(
        rows[0].topics,
        vec![b256!("0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef").0]
    );
}

#[tokio::test]
async fn backfill_rejects_bad_address_before_any_io() {
    // No provider responses, no database handlers, no explorer routes: any
    // request would fail the test.
    let asserter = Asserter::new();
    let clickhouse = Mock::new();
    let server = mockito::Server::new_async().await;

    let (_handle, token) = shutdown_channel();
    let driver = driver(&asserter, &clickhouse, server.url());
    let err = driver.backfill("0xnot-an-address", &token).await.unwrap_err();
    assert!(err.to_string().contains("invalid contract address"));
}

#[tokio::test]
async fn backfill_stops_on_shutdown() {
    let asserter = Asserter::new();
    asserter.push_success(&serde_json::Value::from(17_899_823u64)); // head

    let clickhouse = Mock::new();
    clickhouse
        .add(handlers::provide(vec![ProgressRow { block_number: 17_899_692, log_index: 42 }]));
    let server = mockito::Server::new_async().await;

    let (handle, token) = shutdown_channel();
    handle.trigger();

    let driver = driver(&asserter, &clickhouse, server.url());
    let err = driver.backfill(WETH, &token).await.unwrap_err();
    assert!(err.to_string().contains("cancelled"));
}

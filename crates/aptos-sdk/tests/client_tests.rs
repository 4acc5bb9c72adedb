//! Client integration tests for aptos-sdk
//!
//! Exercises every REST wrapper against MockTransport: paths, query strings,
//! error mapping and response decoding.

use std::sync::Arc;
use std::time::Duration;

use aptos_primitives::AccountAddress;
use aptos_sdk::transport::{Method, RequestBody};
use aptos_sdk::types::{RawTableItemRequest, TableItemRequest, ViewRequest};
use aptos_sdk::{AptosClient, MockTransport, RequestOptions, ResponseMetadata, SimulateOptions};
use serde_json::json;

fn mock_client() -> (Arc<MockTransport>, AptosClient) {
    let mock = Arc::new(MockTransport::new());
    let client = AptosClient::with_transport(Arc::clone(&mock));
    (mock, client)
}

fn addr(hex: &str) -> AccountAddress {
    AccountAddress::from_hex(hex).unwrap()
}

fn user_txn(hash: &str) -> serde_json::Value {
    json!({
        "type": "user_transaction",
        "version": "1000",
        "hash": hash,
        "gas_used": "12",
        "success": true,
        "vm_status": "Executed successfully",
        "sender": "0x1",
        "sequence_number": "0",
        "max_gas_amount": "200000",
        "gas_unit_price": "100",
        "expiration_timestamp_secs": "1700000600",
        "events": [],
        "timestamp": "1700000000000000"
    })
}

// ==================== Chain Info Tests ====================

#[tokio::test]
async fn test_ledger_info_caches_chain_id() {
    let (mock, client) = mock_client();
    let info = client.get_ledger_info().await.unwrap();
    assert_eq!(info.data.chain_id, MockTransport::DEFAULT_CHAIN_ID);
    assert_eq!(info.data.ledger_version_u64(), Some(100));

    assert_eq!(client.chain_id().await.unwrap(), MockTransport::DEFAULT_CHAIN_ID);
    assert_eq!(mock.request_count(Method::Get, "/"), 1);
}

#[tokio::test]
async fn test_chain_id_fetched_lazily() {
    let (mock, client) = mock_client();
    mock.on_get("/", json!({
        "chain_id": 2,
        "epoch": "1",
        "ledger_version": "5",
        "oldest_ledger_version": "0",
        "ledger_timestamp": "0",
        "node_role": "full_node",
        "oldest_block_height": "0",
        "block_height": "1"
    }));
    assert_eq!(client.chain_id().await.unwrap(), 2);
    assert_eq!(client.chain_id().await.unwrap(), 2);
    assert_eq!(mock.request_count(Method::Get, "/"), 1);
}

#[tokio::test]
async fn test_estimate_gas_price() {
    let client = AptosClient::new_mock();
    let estimate = client.estimate_gas_price().await.unwrap();
    assert_eq!(estimate.data.gas_estimate, 100);
    assert_eq!(estimate.data.prioritized_gas_estimate, Some(150));
}

#[tokio::test]
async fn test_health_check_reports_errors() {
    let (mock, client) = mock_client();
    client.health_check().await.unwrap();

    mock.set_response(Method::Get, "/-/healthy", 503, json!("node is syncing"));
    let err = client.health_check().await.unwrap_err();
    assert_eq!(err.to_string(), "api error [503]: node is syncing");
}

#[tokio::test]
async fn test_metadata_is_returned() {
    let (mock, client) = mock_client();
    mock.set_metadata(ResponseMetadata {
        chain_id: 4,
        ledger_version: 777,
        cursor: Some("next".into()),
        ..Default::default()
    });
    let response = client.estimate_gas_price().await.unwrap();
    assert_eq!(response.metadata.ledger_version, 777);
    assert_eq!(response.metadata.cursor.as_deref(), Some("next"));
}

// ==================== Account Query Tests ====================

#[tokio::test]
async fn test_get_account_path_and_query() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    let path = format!("/accounts/{}?ledger_version=10", owner.to_hex());
    mock.on_get(&path, json!({"sequence_number": "42", "authentication_key": "0x00"}));

    let account = client
        .get_account(&owner, &RequestOptions::new().ledger_version(10))
        .await
        .unwrap();
    assert_eq!(account.data.sequence_number_u64(), Some(42));
    assert_eq!(mock.requests()[0].path, path);
}

#[tokio::test]
async fn test_account_not_found() {
    let (mock, client) = mock_client();
    let missing = addr("0xdead");
    mock.set_response(
        Method::Get,
        &format!("/accounts/{}", missing.to_hex()),
        404,
        json!({
            "message": "Account not found",
            "error_code": "account_not_found",
            "vm_error_code": null
        }),
    );

    let err = client
        .get_account(&missing, &RequestOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_account_not_found());
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_account_resource_decodes() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    mock.on_get(
        &format!("/accounts/{}/resource/0x1::account::Account", owner.to_hex()),
        json!({
            "type": "0x1::account::Account",
            "data": {"sequence_number": "3", "authentication_key": "0x01"}
        }),
    );

    let resource = client
        .get_account_resource(&owner, "0x1::account::Account", &RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(resource.data.resource_type, "0x1::account::Account");
    assert_eq!(resource.data.data["sequence_number"], "3");
}

#[tokio::test]
async fn test_get_account_resources_paged() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    mock.on_get(
        &format!("/accounts/{}/resources?start=0&limit=2", owner.to_hex()),
        json!([
            {"type": "0x1::account::Account", "data": {}},
            {"type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>", "data": {}}
        ]),
    );

    let resources = client
        .get_account_resources(&owner, &RequestOptions::new().start(0).limit(2))
        .await
        .unwrap();
    assert_eq!(resources.data.len(), 2);
}

#[tokio::test]
async fn test_get_account_module_abi() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    mock.on_get(
        &format!("/accounts/{}/module/coin", owner.to_hex()),
        json!({
            "bytecode": "0xa11ceb0b",
            "abi": {
                "address": "0x1",
                "name": "coin",
                "friends": [],
                "exposed_functions": [{
                    "name": "balance",
                    "visibility": "public",
                    "is_entry": false,
                    "is_view": true,
                    "generic_type_params": [{"constraints": []}],
                    "params": ["address"],
                    "return": ["u64"]
                }],
                "structs": []
            }
        }),
    );

    let module = client
        .get_account_module(&owner, "coin", &RequestOptions::default())
        .await
        .unwrap();
    let abi = module.data.abi.unwrap();
    assert_eq!(abi.exposed_functions[0].returns, vec!["u64".to_string()]);
    assert!(abi.exposed_functions[0].is_view);
}

#[tokio::test]
async fn test_get_account_balance_accepts_number_and_string() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    let path = format!("/accounts/{}/balance/0x1::aptos_coin::AptosCoin", owner.to_hex());

    mock.on_get(&path, json!(123456));
    assert_eq!(client.get_apt_balance(&owner).await.unwrap(), 123456);

    mock.on_get(&path, json!("18446744073709551615"));
    assert_eq!(client.get_apt_balance(&owner).await.unwrap(), u64::MAX);

    mock.on_get(&path, json!({"balance": 1}));
    assert!(client.get_apt_balance(&owner).await.is_err());
}

// ==================== Transaction Query Tests ====================

#[tokio::test]
async fn test_get_transaction_by_hash_and_version() {
    let (mock, client) = mock_client();
    mock.on_get("/transactions/by_hash/0xabc", user_txn("0xabc"));
    mock.on_get("/transactions/by_version/1000", user_txn("0xabc"));

    let by_hash = client.get_transaction_by_hash("0xabc").await.unwrap();
    let by_version = client.get_transaction_by_version(1000).await.unwrap();
    assert_eq!(by_hash.data, by_version.data);
    assert_eq!(by_hash.data.version_u64(), Some(1000));
    assert_eq!(by_hash.data.gas_used_u64(), Some(12));
}

#[tokio::test]
async fn test_wait_for_transaction_by_hash() {
    let (mock, client) = mock_client();
    mock.on_get("/transactions/wait_by_hash/0xabc", user_txn("0xabc"));
    let txn = client.wait_for_transaction_by_hash("0xabc").await.unwrap();
    assert!(txn.data.is_user_transaction());
}

#[tokio::test]
async fn test_account_transactions_query() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    mock.on_get(
        &format!("/accounts/{}/transactions?limit=1", owner.to_hex()),
        json!([user_txn("0x1")]),
    );
    mock.on_get("/transactions?start=5", json!([user_txn("0x2")]));

    let mine = client
        .get_account_transactions(&owner, &RequestOptions::new().limit(1))
        .await
        .unwrap();
    assert_eq!(mine.data.len(), 1);
    let recent = client
        .get_transactions(&RequestOptions::new().start(5))
        .await
        .unwrap();
    assert_eq!(recent.data[0].hash, "0x2");
}

#[tokio::test(start_paused = true)]
async fn test_poll_for_transaction_retries_until_committed() {
    let (mock, client) = mock_client();
    let client = Arc::new(client);

    // Unknown at first, then pending, then committed
    let poller = {
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client
                .poll_for_transaction("0xfeed", Duration::from_millis(100))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(150)).await;
    mock.on_get(
        "/transactions/by_hash/0xfeed",
        json!({"type": "pending_transaction", "hash": "0xfeed"}),
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    mock.on_get("/transactions/by_hash/0xfeed", user_txn("0xfeed"));

    let txn = poller.await.unwrap().unwrap();
    assert!(txn.is_success());
    assert!(mock.request_count(Method::Get, "/transactions/by_hash/0xfeed") >= 3);
}

#[tokio::test(start_paused = true)]
async fn test_poll_for_transaction_can_time_out() {
    let (mock, client) = mock_client();
    mock.on_get(
        "/transactions/by_hash/0xslow",
        json!({"type": "pending_transaction", "hash": "0xslow"}),
    );
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        client.poll_for_transaction("0xslow", Duration::from_millis(500)),
    )
    .await;
    assert!(result.is_err());
}

// ==================== Block and Event Tests ====================

#[tokio::test]
async fn test_blocks_with_transactions_flag() {
    let (mock, client) = mock_client();
    let block = json!({
        "block_height": "7",
        "block_hash": "0xbb",
        "block_timestamp": "1",
        "first_version": "10",
        "last_version": "12",
        "transactions": null
    });
    mock.on_get("/blocks/by_height/7", block.clone());
    mock.on_get("/blocks/by_version/11?with_transactions=true", {
        let mut with_txns = block;
        with_txns["transactions"] = json!([user_txn("0x1")]);
        with_txns
    });

    let plain = client.get_block_by_height(7, false).await.unwrap();
    assert_eq!(plain.data.block_height_u64(), Some(7));
    assert!(plain.data.transactions.is_none());

    let full = client.get_block_by_version(11, true).await.unwrap();
    assert_eq!(full.data.transactions.map(|t| t.len()), Some(1));
}

#[tokio::test]
async fn test_events_paths() {
    let (mock, client) = mock_client();
    let owner = addr("0x1");
    let event = json!({
        "guid": {"creation_number": "2", "account_address": "0x1"},
        "sequence_number": "0",
        "type": "0x1::coin::DepositEvent",
        "data": {"amount": "1000"}
    });
    mock.on_get(
        &format!("/accounts/{}/events/2?limit=10", owner.to_hex()),
        json!([event.clone()]),
    );
    mock.on_get(
        &format!(
            "/accounts/{}/events/0x1%3A%3Aaccount%3A%3AAccount/coin_register_events",
            owner.to_hex()
        ),
        json!([event]),
    );

    let by_number = client
        .get_events_by_creation_number(&owner, 2, &RequestOptions::new().limit(10))
        .await
        .unwrap();
    let by_handle = client
        .get_events_by_event_handle(
            &owner,
            "0x1::account::Account",
            "coin_register_events",
            &RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_number.data, by_handle.data);

    #[derive(serde::Deserialize)]
    struct Deposit {
        amount: String,
    }
    let deposit: Deposit = by_number.data[0].decode_data().unwrap();
    assert_eq!(deposit.amount, "1000");
}

// ==================== Table and View Tests ====================

#[tokio::test]
async fn test_view_posts_request_body() {
    let (mock, client) = mock_client();
    mock.on_post("/view?ledger_version=3", json!(["1000"]));

    let request = ViewRequest {
        function: "0x1::coin::balance".into(),
        type_arguments: vec!["0x1::aptos_coin::AptosCoin".into()],
        arguments: vec![json!("0x1")],
    };
    let result = client
        .view(&request, &RequestOptions::new().ledger_version(3))
        .await
        .unwrap();
    assert_eq!(result.data, vec![json!("1000")]);

    let sent = &mock.requests()[0];
    assert_eq!(sent.method, Method::Post);
    assert_eq!(
        sent.body,
        RequestBody::Json(json!({
            "function": "0x1::coin::balance",
            "type_arguments": ["0x1::aptos_coin::AptosCoin"],
            "arguments": ["0x1"]
        }))
    );
}

#[tokio::test]
async fn test_table_items() {
    let (mock, client) = mock_client();
    mock.on_post("/tables/0x99/item", json!("42"));
    mock.on_post("/tables/0x99/raw_item", json!("0x2a00000000000000"));

    let item = client
        .get_table_item(
            "0x99",
            &TableItemRequest {
                key_type: "address".into(),
                value_type: "u64".into(),
                key: json!("0x1"),
            },
            &RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(item.data, json!("42"));

    let raw = client
        .get_raw_table_item(
            "0x99",
            &RawTableItemRequest { key: "0x01".into() },
            &RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(raw.data, json!("0x2a00000000000000"));
}

// ==================== Error Mapping Tests ====================

#[tokio::test]
async fn test_non_json_error_body_becomes_message() {
    let (mock, client) = mock_client();
    mock.set_response(Method::Get, "/transactions/by_version/1", 500, json!("upstream exploded"));
    let err = client.get_transaction_by_version(1).await.unwrap_err();
    match err {
        aptos_sdk::SdkError::Api(api) => {
            assert_eq!(api.status_code, 500);
            assert_eq!(api.message, "upstream exploded");
            assert_eq!(api.error_code, None);
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_version_pruned() {
    let (mock, client) = mock_client();
    mock.set_response(
        Method::Get,
        "/transactions/by_version/0",
        410,
        json!({"message": "pruned", "error_code": "version_pruned"}),
    );
    let err = client.get_transaction_by_version(0).await.unwrap_err();
    assert!(err.is_version_pruned());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_unexpected_shape_is_serialization_error() {
    let (mock, client) = mock_client();
    mock.on_get("/estimate_gas_price", json!({"gas": "lots"}));
    let err = client.estimate_gas_price().await.unwrap_err();
    assert!(matches!(err, aptos_sdk::SdkError::Serialization(_)));
}

#[tokio::test]
async fn test_simulate_query_flags() {
    let (mock, client) = mock_client();
    mock.on_post(
        "/transactions/simulate?estimate_gas_unit_price=true",
        json!([user_txn("0xsim")]),
    );

    let account = aptos_sdk::Account::from_ed25519_seed([3u8; 32]);
    let raw = aptos_types::RawTransaction::new(
        account.address(),
        0,
        aptos_types::TransactionPayload::Script(Default::default()),
        1000,
        100,
        u64::MAX,
        4,
    );
    let signed = account.sign_transaction(&raw).unwrap();
    let options = SimulateOptions {
        estimate_gas_unit_price: true,
        ..Default::default()
    };
    let results = client.simulate_transaction(&signed, &options).await.unwrap();
    assert_eq!(results.data[0].gas_used_u64(), Some(12));

    match &mock.requests()[0].body {
        RequestBody::Bcs(bytes) => assert_eq!(bytes, &signed.bytes().unwrap()),
        other => panic!("expected bcs body, got {other:?}"),
    }
}

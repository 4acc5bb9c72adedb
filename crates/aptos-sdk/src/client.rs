//! AptosClient - REST client for a fullnode

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use aptos_primitives::AccountAddress;
use aptos_types::{SignedTransaction, TransactionPayload};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::account::Account;
use crate::error::ApiError;
use crate::options::{BuildOptions, RequestOptions, SimulateOptions};
use crate::transport::{MockTransport, RawResponse, Transport};
use crate::types::{
    u64_from_value, AccountData, Block, Event, GasEstimation, LedgerInfo, MoveModuleBytecode,
    MoveResource, PendingTransaction, RawTableItemRequest, Response, TableItemRequest,
    Transaction, UserTransaction, ViewRequest,
};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::config::{ClientConfig, Network};
#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Default interval between polls in [`AptosClient::poll_for_transaction`]
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// REST client for a fullnode
///
/// Shareable across tasks; the chain id is cached after the first lookup.
pub struct AptosClient {
    transport: Box<dyn Transport>,
    // 0 means not fetched yet
    chain_id: AtomicU8,
}

impl AptosClient {
    /// Create a client with HTTP transport
    #[cfg(feature = "http")]
    pub fn new(config: &ClientConfig) -> Result<Self, SdkError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Create an HTTP client for a network with default settings
    #[cfg(feature = "http")]
    pub fn for_network(network: &Network) -> Result<Self, SdkError> {
        Self::new(&ClientConfig::for_network(network))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new()).with_chain_id(MockTransport::DEFAULT_CHAIN_ID)
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            chain_id: AtomicU8::new(0),
        }
    }

    /// Preset the chain id so it is never fetched
    pub fn with_chain_id(self, chain_id: u8) -> Self {
        self.chain_id.store(chain_id, Ordering::Release);
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Response<T>, SdkError> {
        let raw = self.transport.get(path).await?;
        tracing::debug!(method = "GET", path, status = raw.status, "node response");
        decode(raw)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<Response<T>, SdkError> {
        let raw = self.transport.post_json(path, body).await?;
        tracing::debug!(method = "POST", path, status = raw.status, "node response");
        decode(raw)
    }

    async fn post_bcs<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> Result<Response<T>, SdkError> {
        let raw = self.transport.post_bcs(path, Bytes::from(body)).await?;
        tracing::debug!(method = "POST", path, status = raw.status, "node response");
        decode(raw)
    }

    // ==================== Chain Info ====================

    /// Chain id, fetched once from the ledger info and cached
    pub async fn chain_id(&self) -> Result<u8, SdkError> {
        match self.chain_id.load(Ordering::Acquire) {
            0 => Ok(self.get_ledger_info().await?.data.chain_id),
            id => Ok(id),
        }
    }

    /// `GET /`
    pub async fn get_ledger_info(&self) -> Result<Response<LedgerInfo>, SdkError> {
        let info: Response<LedgerInfo> = self.get_json("/").await?;
        self.chain_id.store(info.data.chain_id, Ordering::Release);
        Ok(info)
    }

    /// `GET /-/healthy`
    pub async fn health_check(&self) -> Result<(), SdkError> {
        let raw = self.transport.get("/-/healthy").await?;
        check_status(raw).map(|_| ())
    }

    /// `GET /estimate_gas_price`
    pub async fn estimate_gas_price(&self) -> Result<Response<GasEstimation>, SdkError> {
        self.get_json("/estimate_gas_price").await
    }

    // ==================== Account Queries ====================

    /// Sequence number and authentication key
    pub async fn get_account(
        &self,
        address: &AccountAddress,
        options: &RequestOptions,
    ) -> Result<Response<AccountData>, SdkError> {
        self.get_json(&format!("/accounts/{}{}", address, options.query_string()))
            .await
    }

    /// Every resource under an account
    pub async fn get_account_resources(
        &self,
        address: &AccountAddress,
        options: &RequestOptions,
    ) -> Result<Response<Vec<MoveResource>>, SdkError> {
        self.get_json(&format!("/accounts/{}/resources{}", address, options.query_string()))
            .await
    }

    /// One resource by type, e.g. `0x1::account::Account`
    pub async fn get_account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
        options: &RequestOptions,
    ) -> Result<Response<MoveResource>, SdkError> {
        self.get_json(&format!(
            "/accounts/{}/resource/{}{}",
            address,
            resource_type,
            options.query_string()
        ))
        .await
    }

    /// Every module published under an account
    pub async fn get_account_modules(
        &self,
        address: &AccountAddress,
        options: &RequestOptions,
    ) -> Result<Response<Vec<MoveModuleBytecode>>, SdkError> {
        self.get_json(&format!("/accounts/{}/modules{}", address, options.query_string()))
            .await
    }

    /// One module by name
    pub async fn get_account_module(
        &self,
        address: &AccountAddress,
        module_name: &str,
        options: &RequestOptions,
    ) -> Result<Response<MoveModuleBytecode>, SdkError> {
        self.get_json(&format!(
            "/accounts/{}/module/{}{}",
            address,
            module_name,
            options.query_string()
        ))
        .await
    }

    /// Balance of a coin type or fungible asset
    pub async fn get_account_balance(
        &self,
        address: &AccountAddress,
        asset_type: &str,
        options: &RequestOptions,
    ) -> Result<Response<u64>, SdkError> {
        let raw: Response<Value> = self
            .get_json(&format!(
                "/accounts/{}/balance/{}{}",
                address,
                asset_type,
                options.query_string()
            ))
            .await?;
        let balance = u64_from_value(&raw.data)
            .ok_or_else(|| SdkError::InvalidResponse(format!("balance is not a u64: {}", raw.data)))?;
        Ok(raw.map(|_| balance))
    }

    /// Balance of `0x1::aptos_coin::AptosCoin`
    pub async fn get_apt_balance(&self, address: &AccountAddress) -> Result<u64, SdkError> {
        Ok(self
            .get_account_balance(address, "0x1::aptos_coin::AptosCoin", &RequestOptions::default())
            .await?
            .data)
    }

    // ==================== Transactions ====================

    /// Recent transactions
    pub async fn get_transactions(
        &self,
        options: &RequestOptions,
    ) -> Result<Response<Vec<Transaction>>, SdkError> {
        self.get_json(&format!("/transactions{}", options.query_string()))
            .await
    }

    /// Transaction by hash, pending or committed
    pub async fn get_transaction_by_hash(&self, hash: &str) -> Result<Response<Transaction>, SdkError> {
        self.get_json(&format!("/transactions/by_hash/{}", hash)).await
    }

    /// Long-poll until the node has committed the transaction or gives up
    pub async fn wait_for_transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Response<Transaction>, SdkError> {
        self.get_json(&format!("/transactions/wait_by_hash/{}", hash))
            .await
    }

    /// Transaction by ledger version
    pub async fn get_transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Response<Transaction>, SdkError> {
        self.get_json(&format!("/transactions/by_version/{}", version))
            .await
    }

    /// Transactions sent by an account
    pub async fn get_account_transactions(
        &self,
        address: &AccountAddress,
        options: &RequestOptions,
    ) -> Result<Response<Vec<Transaction>>, SdkError> {
        self.get_json(&format!("/accounts/{}/transactions{}", address, options.query_string()))
            .await
    }

    /// Poll by hash until the transaction is no longer pending
    ///
    /// Lookup errors (typically 404 right after submission) are retried. The
    /// loop has no deadline of its own; wrap it in `tokio::time::timeout` or
    /// drop the future to stop it.
    pub async fn poll_for_transaction(
        &self,
        hash: &str,
        interval: Duration,
    ) -> Result<Transaction, SdkError> {
        loop {
            match self.get_transaction_by_hash(hash).await {
                Ok(response) if !response.data.is_pending() => return Ok(response.data),
                Ok(_) => tracing::debug!(hash, "transaction still pending"),
                Err(e) => tracing::debug!(hash, error = %e, "transaction lookup failed"),
            }
            tokio::time::sleep(interval).await;
        }
    }

    // ==================== Blocks and Events ====================

    /// Block by height
    pub async fn get_block_by_height(
        &self,
        height: u64,
        with_transactions: bool,
    ) -> Result<Response<Block>, SdkError> {
        self.get_json(&format!(
            "/blocks/by_height/{}{}",
            height,
            with_transactions_query(with_transactions)
        ))
        .await
    }

    /// Block containing a ledger version
    pub async fn get_block_by_version(
        &self,
        version: u64,
        with_transactions: bool,
    ) -> Result<Response<Block>, SdkError> {
        self.get_json(&format!(
            "/blocks/by_version/{}{}",
            version,
            with_transactions_query(with_transactions)
        ))
        .await
    }

    /// Events of the stream with this creation number
    pub async fn get_events_by_creation_number(
        &self,
        address: &AccountAddress,
        creation_number: u64,
        options: &RequestOptions,
    ) -> Result<Response<Vec<Event>>, SdkError> {
        self.get_json(&format!(
            "/accounts/{}/events/{}{}",
            address,
            creation_number,
            options.query_string()
        ))
        .await
    }

    /// Events of the handle stored in `field_name` of the `event_handle` resource
    pub async fn get_events_by_event_handle(
        &self,
        address: &AccountAddress,
        event_handle: &str,
        field_name: &str,
        options: &RequestOptions,
    ) -> Result<Response<Vec<Event>>, SdkError> {
        self.get_json(&format!(
            "/accounts/{}/events/{}/{}{}",
            address,
            escape_path_segment(event_handle),
            escape_path_segment(field_name),
            options.query_string()
        ))
        .await
    }

    // ==================== Tables and Views ====================

    /// Table item by JSON key
    pub async fn get_table_item(
        &self,
        table_handle: &str,
        request: &TableItemRequest,
        options: &RequestOptions,
    ) -> Result<Response<Value>, SdkError> {
        self.post_json(
            &format!("/tables/{}/item{}", table_handle, options.query_string()),
            serde_json::to_value(request)?,
        )
        .await
    }

    /// Table item by BCS key; the value comes back as hex BCS
    pub async fn get_raw_table_item(
        &self,
        table_handle: &str,
        request: &RawTableItemRequest,
        options: &RequestOptions,
    ) -> Result<Response<Value>, SdkError> {
        self.post_json(
            &format!("/tables/{}/raw_item{}", table_handle, options.query_string()),
            serde_json::to_value(request)?,
        )
        .await
    }

    /// Call a view function
    pub async fn view(
        &self,
        request: &ViewRequest,
        options: &RequestOptions,
    ) -> Result<Response<Vec<Value>>, SdkError> {
        self.post_json(
            &format!("/view{}", options.query_string()),
            serde_json::to_value(request)?,
        )
        .await
    }

    // ==================== Submission ====================

    /// Dry-run a transaction; the authenticator's signature should be zeroed
    pub async fn simulate_transaction(
        &self,
        txn: &SignedTransaction,
        options: &SimulateOptions,
    ) -> Result<Response<Vec<UserTransaction>>, SdkError> {
        self.post_bcs(
            &format!("/transactions/simulate{}", options.query_string()),
            txn.bytes()?,
        )
        .await
    }

    /// Submit a signed transaction
    pub async fn submit_transaction(
        &self,
        txn: &SignedTransaction,
    ) -> Result<Response<PendingTransaction>, SdkError> {
        let response: Response<PendingTransaction> =
            self.post_bcs("/transactions", txn.bytes()?).await?;
        tracing::info!(hash = %response.data.hash, sender = %txn.raw_txn.sender, "transaction submitted");
        Ok(response)
    }

    /// Build, sign with `account` and submit
    pub async fn sign_and_submit(
        &self,
        account: &Account,
        payload: TransactionPayload,
        options: &BuildOptions,
    ) -> Result<Response<PendingTransaction>, SdkError> {
        let raw = self.build_transaction(account.address(), payload, options).await?;
        let signed = account.sign_transaction(&raw)?;
        self.submit_transaction(&signed).await
    }
}

fn with_transactions_query(with_transactions: bool) -> &'static str {
    if with_transactions {
        "?with_transactions=true"
    } else {
        ""
    }
}

/// Percent-encode everything outside the unreserved set
fn escape_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Turn a status of 400 or above into [`ApiError`]
fn check_status(raw: RawResponse) -> Result<RawResponse, SdkError> {
    if raw.status >= 400 {
        let err = ApiError::from_response(raw.status, &raw.body);
        tracing::debug!(status = raw.status, error = %err, "node returned an error");
        return Err(err.into());
    }
    Ok(raw)
}

fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<Response<T>, SdkError> {
    let raw = check_status(raw)?;
    Ok(Response {
        data: serde_json::from_value(raw.body)?,
        metadata: raw.metadata,
    })
}

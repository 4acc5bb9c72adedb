//! JSON models returned by the node's REST API
//!
//! The node encodes 64-bit integers as decimal strings. Models keep them as
//! strings and expose `*_u64` accessors that parse on demand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SdkError;

/// Ledger state reported alongside every response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// `X-Aptos-Chain-Id`
    pub chain_id: u8,
    /// `X-Aptos-Ledger-Version`
    pub ledger_version: u64,
    /// `X-Aptos-Ledger-Oldest-Version`
    pub ledger_oldest_version: u64,
    /// `X-Aptos-Ledger-TimestampUsec`
    pub ledger_timestamp_usec: u64,
    /// `X-Aptos-Epoch`
    pub epoch: u64,
    /// `X-Aptos-Block-Height`
    pub block_height: u64,
    /// `X-Aptos-Oldest-Block-Height`
    pub oldest_block_height: u64,
    /// `X-Aptos-Cursor`, present on paginated responses
    pub cursor: Option<String>,
}

impl ResponseMetadata {
    /// Header names read by [`ResponseMetadata::from_headers`]
    pub const CHAIN_ID: &'static str = "x-aptos-chain-id";
    /// See [`ResponseMetadata::ledger_version`]
    pub const LEDGER_VERSION: &'static str = "x-aptos-ledger-version";
    /// See [`ResponseMetadata::ledger_oldest_version`]
    pub const LEDGER_OLDEST_VERSION: &'static str = "x-aptos-ledger-oldest-version";
    /// See [`ResponseMetadata::ledger_timestamp_usec`]
    pub const LEDGER_TIMESTAMP: &'static str = "x-aptos-ledger-timestampusec";
    /// See [`ResponseMetadata::epoch`]
    pub const EPOCH: &'static str = "x-aptos-epoch";
    /// See [`ResponseMetadata::block_height`]
    pub const BLOCK_HEIGHT: &'static str = "x-aptos-block-height";
    /// See [`ResponseMetadata::oldest_block_height`]
    pub const OLDEST_BLOCK_HEIGHT: &'static str = "x-aptos-oldest-block-height";
    /// See [`ResponseMetadata::cursor`]
    pub const CURSOR: &'static str = "x-aptos-cursor";

    /// Read metadata through a case-insensitive header lookup
    ///
    /// Missing or malformed numeric headers read as zero.
    pub fn from_headers<'a>(header: impl Fn(&str) -> Option<&'a str>) -> Self {
        let num = |name: &str| header(name).and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(0);
        Self {
            chain_id: header(Self::CHAIN_ID)
                .and_then(|v| v.trim().parse::<u8>().ok())
                .unwrap_or(0),
            ledger_version: num(Self::LEDGER_VERSION),
            ledger_oldest_version: num(Self::LEDGER_OLDEST_VERSION),
            ledger_timestamp_usec: num(Self::LEDGER_TIMESTAMP),
            epoch: num(Self::EPOCH),
            block_height: num(Self::BLOCK_HEIGHT),
            oldest_block_height: num(Self::OLDEST_BLOCK_HEIGHT),
            cursor: header(Self::CURSOR).map(str::to_string),
        }
    }
}

/// Decoded body plus ledger metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// Decoded body
    pub data: T,
    /// Ledger state at the time of the request
    pub metadata: ResponseMetadata,
}

impl<T> Response<T> {
    /// Body only
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Transform the body, keeping metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: f(self.data),
            metadata: self.metadata,
        }
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    s.parse().ok()
}

/// Accept a JSON number or a decimal string
pub(crate) fn u64_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => parse_u64(s),
        _ => None,
    }
}

// ==================== Ledger ====================

/// `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInfo {
    /// Chain id
    pub chain_id: u8,
    /// Current epoch
    pub epoch: String,
    /// Latest committed version
    pub ledger_version: String,
    /// Oldest version still stored
    pub oldest_ledger_version: String,
    /// Ledger timestamp, microseconds
    pub ledger_timestamp: String,
    /// `full_node` or `validator`
    pub node_role: String,
    /// Oldest block still stored
    pub oldest_block_height: String,
    /// Latest block
    pub block_height: String,
    /// Node build
    #[serde(default)]
    pub git_hash: Option<String>,
}

impl LedgerInfo {
    /// Latest committed version
    pub fn ledger_version_u64(&self) -> Option<u64> {
        parse_u64(&self.ledger_version)
    }

    /// Latest block
    pub fn block_height_u64(&self) -> Option<u64> {
        parse_u64(&self.block_height)
    }

    /// Current epoch
    pub fn epoch_u64(&self) -> Option<u64> {
        parse_u64(&self.epoch)
    }
}

/// `GET /estimate_gas_price`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimation {
    /// Price for low-priority transactions
    #[serde(default)]
    pub deprioritized_gas_estimate: Option<u64>,
    /// Price expected to be included promptly
    pub gas_estimate: u64,
    /// Price for high-priority transactions
    #[serde(default)]
    pub prioritized_gas_estimate: Option<u64>,
}

// ==================== Accounts ====================

/// `GET /accounts/{address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    /// Next sequence number, decimal
    pub sequence_number: String,
    /// Authentication key, hex
    pub authentication_key: String,
}

impl AccountData {
    /// Next sequence number
    pub fn sequence_number_u64(&self) -> Option<u64> {
        parse_u64(&self.sequence_number)
    }
}

/// A Move resource stored under an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResource {
    /// Resource type, e.g. `0x1::account::Account`
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource fields
    pub data: Value,
}

impl MoveResource {
    /// Decode the fields into a typed struct
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, SdkError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Compiled module plus its ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleBytecode {
    /// Module bytecode, hex
    pub bytecode: String,
    /// Public interface
    #[serde(default)]
    pub abi: Option<MoveModule>,
}

/// Module ABI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModule {
    /// Publishing account
    pub address: String,
    /// Module name
    pub name: String,
    /// Friend modules
    #[serde(default)]
    pub friends: Vec<String>,
    /// Exposed functions
    #[serde(default)]
    pub exposed_functions: Vec<MoveFunction>,
    /// Structs
    #[serde(default)]
    pub structs: Vec<MoveStruct>,
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFunction {
    /// Name
    pub name: String,
    /// `public`, `friend` or `private`
    pub visibility: String,
    /// Callable as an entry function
    pub is_entry: bool,
    /// Callable through `/view`
    #[serde(default)]
    pub is_view: bool,
    /// Generic parameters
    #[serde(default)]
    pub generic_type_params: Vec<MoveGenericTypeParam>,
    /// Parameter types
    #[serde(default)]
    pub params: Vec<String>,
    /// Return types
    #[serde(rename = "return", default)]
    pub returns: Vec<String>,
}

/// Generic parameter constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveGenericTypeParam {
    /// Required abilities
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// Struct definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStruct {
    /// Name
    pub name: String,
    /// Native struct
    #[serde(default)]
    pub is_native: bool,
    /// Abilities
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Generic parameters
    #[serde(default)]
    pub generic_type_params: Vec<MoveGenericTypeParam>,
    /// Fields
    #[serde(default)]
    pub fields: Vec<MoveStructField>,
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStructField {
    /// Name
    pub name: String,
    /// Type
    #[serde(rename = "type")]
    pub field_type: String,
}

// ==================== Transactions ====================

/// Transaction type tags used in the `type` field
pub mod transaction_types {
    /// In mempool, not yet committed
    pub const PENDING: &str = "pending_transaction";
    /// Committed user transaction
    pub const USER: &str = "user_transaction";
    /// Block prologue
    pub const BLOCK_METADATA: &str = "block_metadata_transaction";
    /// Chain state update
    pub const STATE_CHECKPOINT: &str = "state_checkpoint_transaction";
    /// Genesis
    pub const GENESIS: &str = "genesis_transaction";
}

/// Any transaction returned by the node
///
/// Fields that only some transaction types carry are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction type, see [`transaction_types`]
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Transaction hash
    #[serde(default)]
    pub hash: String,
    /// Ledger version, absent while pending
    #[serde(default)]
    pub version: Option<String>,
    /// Gas consumed
    #[serde(default)]
    pub gas_used: Option<String>,
    /// Execution result
    #[serde(default)]
    pub success: Option<bool>,
    /// VM status message
    #[serde(default)]
    pub vm_status: Option<String>,
    /// Sender
    #[serde(default)]
    pub sender: Option<String>,
    /// Sender's sequence number
    #[serde(default)]
    pub sequence_number: Option<String>,
    /// Gas limit
    #[serde(default)]
    pub max_gas_amount: Option<String>,
    /// Gas unit price
    #[serde(default)]
    pub gas_unit_price: Option<String>,
    /// Expiration, unix seconds
    #[serde(default)]
    pub expiration_timestamp_secs: Option<String>,
    /// Payload in JSON form
    #[serde(default)]
    pub payload: Option<Value>,
    /// Authenticator in JSON form
    #[serde(default)]
    pub signature: Option<Value>,
    /// Emitted events
    #[serde(default)]
    pub events: Vec<Event>,
    /// Commit time, microseconds
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Transaction {
    /// Still in mempool
    pub fn is_pending(&self) -> bool {
        self.transaction_type == transaction_types::PENDING
    }

    /// Committed user transaction
    pub fn is_user_transaction(&self) -> bool {
        self.transaction_type == transaction_types::USER
    }

    /// Committed and executed successfully
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Ledger version
    pub fn version_u64(&self) -> Option<u64> {
        self.version.as_deref().and_then(parse_u64)
    }

    /// Gas consumed
    pub fn gas_used_u64(&self) -> Option<u64> {
        self.gas_used.as_deref().and_then(parse_u64)
    }
}

/// Response to a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Transaction hash
    pub hash: String,
    /// Sender
    pub sender: String,
    /// Sender's sequence number
    pub sequence_number: String,
    /// Gas limit
    pub max_gas_amount: String,
    /// Gas unit price
    pub gas_unit_price: String,
    /// Expiration, unix seconds
    pub expiration_timestamp_secs: String,
    /// Payload in JSON form
    #[serde(default)]
    pub payload: Option<Value>,
    /// Authenticator in JSON form
    #[serde(default)]
    pub signature: Option<Value>,
}

/// Committed user transaction, also returned by simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTransaction {
    /// Ledger version
    pub version: String,
    /// Transaction hash
    pub hash: String,
    /// Gas consumed
    pub gas_used: String,
    /// Execution result
    pub success: bool,
    /// VM status message
    pub vm_status: String,
    /// Sender
    pub sender: String,
    /// Sender's sequence number
    pub sequence_number: String,
    /// Gas limit
    pub max_gas_amount: String,
    /// Gas unit price
    pub gas_unit_price: String,
    /// Expiration, unix seconds
    pub expiration_timestamp_secs: String,
    /// Payload in JSON form
    #[serde(default)]
    pub payload: Option<Value>,
    /// Emitted events
    #[serde(default)]
    pub events: Vec<Event>,
    /// Commit time, microseconds
    #[serde(default)]
    pub timestamp: String,
}

impl UserTransaction {
    /// Gas consumed
    pub fn gas_used_u64(&self) -> Option<u64> {
        parse_u64(&self.gas_used)
    }

    /// Ledger version
    pub fn version_u64(&self) -> Option<u64> {
        parse_u64(&self.version)
    }
}

// ==================== Events and blocks ====================

/// Event stream identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGuid {
    /// Creation number of the stream
    pub creation_number: String,
    /// Owning account
    pub account_address: String,
}

/// Emitted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stream, zeroed for module events
    pub guid: EventGuid,
    /// Position in the stream
    pub sequence_number: String,
    /// Event type
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event fields
    pub data: Value,
}

impl Event {
    /// Decode the fields into a typed struct
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, SdkError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Position in the stream
    pub fn sequence_number_u64(&self) -> Option<u64> {
        parse_u64(&self.sequence_number)
    }
}

/// `GET /blocks/...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Height
    pub block_height: String,
    /// Hash
    pub block_hash: String,
    /// Timestamp, microseconds
    pub block_timestamp: String,
    /// First version in the block
    pub first_version: String,
    /// Last version in the block
    pub last_version: String,
    /// Present when requested with `with_transactions=true`
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

impl Block {
    /// Height
    pub fn block_height_u64(&self) -> Option<u64> {
        parse_u64(&self.block_height)
    }
}

// ==================== Requests ====================

/// `POST /view`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    /// `address::module::function`
    pub function: String,
    /// Generic arguments as type strings
    pub type_arguments: Vec<String>,
    /// Arguments in JSON form
    pub arguments: Vec<Value>,
}

/// `POST /tables/{handle}/item`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItemRequest {
    /// Key type string
    pub key_type: String,
    /// Value type string
    pub value_type: String,
    /// Key in JSON form
    pub key: Value,
}

/// `POST /tables/{handle}/raw_item`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTableItemRequest {
    /// BCS-encoded key, hex
    pub key: String,
}

//! Request and build options

/// Default gas limit for built transactions
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;

/// Gas unit price used when the node's estimate is unavailable
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;

/// Default lifetime of a built transaction
pub const DEFAULT_EXPIRATION_SECS: u64 = 600;

fn query_string(pairs: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

/// Pagination and version pinning for read endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Read state at this ledger version
    pub ledger_version: Option<u64>,
    /// First item to return
    pub start: Option<u64>,
    /// Maximum number of items
    pub limit: Option<u16>,
}

impl RequestOptions {
    /// No options
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin to a ledger version
    pub fn ledger_version(mut self, version: u64) -> Self {
        self.ledger_version = Some(version);
        self
    }

    /// Start position
    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Page size
    pub fn limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }

    /// `?ledger_version=..&start=..&limit=..`, or empty when nothing is set
    pub fn query_string(&self) -> String {
        query_string(&[
            ("ledger_version", self.ledger_version.map(|v| v.to_string())),
            ("start", self.start.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
        ])
    }
}

/// Flags for `POST /transactions/simulate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulateOptions {
    /// Let the node pick the gas limit
    pub estimate_max_gas_amount: bool,
    /// Let the node pick the gas unit price
    pub estimate_gas_unit_price: bool,
    /// Use the prioritized price estimate
    pub estimate_prioritized_gas_unit_price: bool,
}

impl SimulateOptions {
    /// Query string with the enabled flags
    pub fn query_string(&self) -> String {
        let flag = |on: bool| on.then(|| "true".to_string());
        query_string(&[
            ("estimate_max_gas_amount", flag(self.estimate_max_gas_amount)),
            ("estimate_gas_unit_price", flag(self.estimate_gas_unit_price)),
            (
                "estimate_prioritized_gas_unit_price",
                flag(self.estimate_prioritized_gas_unit_price),
            ),
        ])
    }
}

/// Overrides for [`AptosClient::build_transaction`](crate::AptosClient::build_transaction)
///
/// Anything left unset is filled from the node or from the defaults in this
/// module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Gas limit, default [`DEFAULT_MAX_GAS_AMOUNT`]
    pub max_gas_amount: Option<u64>,
    /// Gas unit price, default is the node's estimate
    pub gas_unit_price: Option<u64>,
    /// Absolute expiration, default now plus [`DEFAULT_EXPIRATION_SECS`]
    pub expiration_timestamp_secs: Option<u64>,
    /// Sequence number, default is the account's current one
    pub sequence_number: Option<u64>,
    /// Build an orderless transaction with this nonce
    pub replay_protection_nonce: Option<u64>,
}

impl BuildOptions {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gas limit
    pub fn max_gas_amount(mut self, amount: u64) -> Self {
        self.max_gas_amount = Some(amount);
        self
    }

    /// Set gas unit price
    pub fn gas_unit_price(mut self, price: u64) -> Self {
        self.gas_unit_price = Some(price);
        self
    }

    /// Set absolute expiration
    pub fn expiration_timestamp_secs(mut self, secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(secs);
        self
    }

    /// Set sequence number
    pub fn sequence_number(mut self, seq: u64) -> Self {
        self.sequence_number = Some(seq);
        self
    }

    /// Make the transaction orderless
    pub fn replay_protection_nonce(mut self, nonce: u64) -> Self {
        self.replay_protection_nonce = Some(nonce);
        self
    }
}

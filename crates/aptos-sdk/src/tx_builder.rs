//! Transaction building against live chain state

use std::time::{SystemTime, UNIX_EPOCH};

use aptos_primitives::AccountAddress;
use aptos_types::{RawTransaction, TransactionPayload, ORDERLESS_SEQUENCE_NUMBER};

use crate::options::{
    BuildOptions, RequestOptions, DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_UNIT_PRICE,
    DEFAULT_MAX_GAS_AMOUNT,
};
use crate::{AptosClient, SdkError};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl AptosClient {
    /// Fill in everything `options` leaves unset and return the raw transaction
    ///
    /// Sequence number, gas price and chain id are fetched concurrently and
    /// only when needed. A failed sequence-number lookup fails the build; a
    /// failed gas estimate falls back to [`DEFAULT_GAS_UNIT_PRICE`].
    ///
    /// With `replay_protection_nonce` set the payload is wrapped as orderless
    /// and the sequence number becomes [`ORDERLESS_SEQUENCE_NUMBER`].
    pub async fn build_transaction(
        &self,
        sender: AccountAddress,
        payload: TransactionPayload,
        options: &BuildOptions,
    ) -> Result<RawTransaction, SdkError> {
        if options.sequence_number.is_some() && options.replay_protection_nonce.is_some() {
            return Err(SdkError::InvalidOptions(
                "sequence_number and replay_protection_nonce are mutually exclusive".to_string(),
            ));
        }

        let payload = match options.replay_protection_nonce {
            Some(nonce) => payload.into_orderless(nonce)?,
            None => payload,
        };
        let orderless = options.replay_protection_nonce.is_some();

        let sequence_number = async {
            if orderless {
                return Ok::<_, SdkError>(ORDERLESS_SEQUENCE_NUMBER);
            }
            if let Some(seq) = options.sequence_number {
                return Ok(seq);
            }
            let account = self.get_account(&sender, &RequestOptions::default()).await?;
            account.data.sequence_number_u64().ok_or_else(|| {
                SdkError::InvalidResponse(format!(
                    "sequence number is not a u64: {}",
                    account.data.sequence_number
                ))
            })
        };

        let gas_unit_price = async {
            if let Some(price) = options.gas_unit_price {
                return Ok::<_, SdkError>(price);
            }
            match self.estimate_gas_price().await {
                Ok(estimate) => Ok(estimate.data.gas_estimate),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        fallback = DEFAULT_GAS_UNIT_PRICE,
                        "gas estimation failed, using default gas unit price"
                    );
                    Ok(DEFAULT_GAS_UNIT_PRICE)
                }
            }
        };

        let (sequence_number, gas_unit_price, chain_id) =
            tokio::try_join!(sequence_number, gas_unit_price, self.chain_id())?;

        let expiration_timestamp_secs = options
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs() + DEFAULT_EXPIRATION_SECS);

        tracing::debug!(
            sender = %sender,
            sequence_number,
            gas_unit_price,
            chain_id,
            "built transaction"
        );

        Ok(RawTransaction::new(
            sender,
            sequence_number,
            payload,
            options.max_gas_amount.unwrap_or(DEFAULT_MAX_GAS_AMOUNT),
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        ))
    }
}

//! Raw and signed transactions
//!
//! Signing never mutates the raw transaction: [`RawTransaction::sign`] borrows
//! it and returns a new [`SignedTransaction`] holding a copy.

use aptos_bcs::{Deserialize, Deserializer, Error as BcsError, Serialize, Serializer};
use aptos_crypto::{
    signing_message, transaction_hash, SignatureScheme, Signer, RAW_TRANSACTION_SALT,
    RAW_TRANSACTION_WITH_DATA_SALT,
};
use aptos_primitives::{AccountAddress, ChainId, HashValue};

use crate::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::error::TypesError;
use crate::payload::TransactionPayload;

/// Sequence number used by orderless (nonce-protected) transactions
pub const ORDERLESS_SEQUENCE_NUMBER: u64 = u64::MAX;

/// Unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    /// Sending account
    pub sender: AccountAddress,
    /// Sender's sequence number
    pub sequence_number: u64,
    /// What to execute
    pub payload: TransactionPayload,
    /// Gas limit
    pub max_gas_amount: u64,
    /// Price per gas unit, in octas
    pub gas_unit_price: u64,
    /// Unix seconds after which the transaction is discarded
    pub expiration_timestamp_secs: u64,
    /// Target chain
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Create a raw transaction
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// BCS encoding
    pub fn to_bcs(&self) -> Result<Vec<u8>, TypesError> {
        Ok(aptos_bcs::serialize(self)?)
    }

    /// `sha3(sha3("APTOS::RawTransaction") || bcs(self))`
    pub fn signing_message(&self) -> Result<[u8; 32], TypesError> {
        Ok(signing_message(RAW_TRANSACTION_SALT, &self.to_bcs()?))
    }

    /// Whether the payload carries a replay nonce instead of relying on the
    /// sequence number
    pub fn is_orderless(&self) -> bool {
        self.payload.replay_protection_nonce().is_some()
    }

    /// Sign with a single-key authenticator
    pub fn sign(&self, signer: &dyn Signer) -> Result<SignedTransaction, TypesError> {
        let message = self.signing_message()?;
        let signature = signer.sign(&message)?;
        let sender =
            AccountAuthenticator::single_key(signer.scheme(), &signer.public_key(), &signature)?;
        Ok(SignedTransaction::new(
            self.clone(),
            TransactionAuthenticator::single_sender(sender),
        ))
    }

    /// Sign with the legacy Ed25519 authenticator (discriminant 0)
    pub fn sign_ed25519_legacy(&self, signer: &dyn Signer) -> Result<SignedTransaction, TypesError> {
        if signer.scheme() != SignatureScheme::Ed25519 {
            return Err(TypesError::UnsupportedScheme(format!(
                "legacy authenticator needs ed25519, got {}",
                signer.scheme()
            )));
        }
        let message = self.signing_message()?;
        let signature = signer.sign(&message)?;
        let authenticator = TransactionAuthenticator::ed25519(&signer.public_key(), &signature)?;
        Ok(SignedTransaction::new(self.clone(), authenticator))
    }
}

impl Serialize for RawTransaction {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.sender);
        ser.u64(self.sequence_number);
        ser.value(&self.payload);
        ser.u64(self.max_gas_amount);
        ser.u64(self.gas_unit_price);
        ser.u64(self.expiration_timestamp_secs);
        ser.u8(self.chain_id);
    }
}

impl Deserialize for RawTransaction {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            sender: de.value(),
            sequence_number: de.u64(),
            payload: de.value(),
            max_gas_amount: de.u64(),
            gas_unit_price: de.u64(),
            expiration_timestamp_secs: de.u64(),
            chain_id: de.u8(),
        }
    }
}

// ==================== RawTransactionWithData ====================

/// Raw transaction plus the extra signers every party signs over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTransactionWithData {
    /// Sender and secondary signers (0)
    MultiAgent {
        /// Transaction
        raw_txn: RawTransaction,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    /// Multi-agent with a gas payer (1)
    FeePayer {
        /// Transaction
        raw_txn: RawTransaction,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Gas payer, zero while the payer is still unknown
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    /// Multi-agent signing data
    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        RawTransactionWithData::MultiAgent {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    /// Fee-payer signing data
    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    ) -> Self {
        RawTransactionWithData::FeePayer {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        }
    }

    /// Wrapped transaction
    pub fn raw_txn(&self) -> &RawTransaction {
        match self {
            RawTransactionWithData::MultiAgent { raw_txn, .. }
            | RawTransactionWithData::FeePayer { raw_txn, .. } => raw_txn,
        }
    }

    /// Secondary signer addresses
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            RawTransactionWithData::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | RawTransactionWithData::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
        }
    }

    /// `sha3(sha3("APTOS::RawTransactionWithData") || bcs(self))`
    pub fn signing_message(&self) -> Result<[u8; 32], TypesError> {
        let bytes = aptos_bcs::serialize(self)?;
        Ok(signing_message(RAW_TRANSACTION_WITH_DATA_SALT, &bytes))
    }

    /// One party's single-key approval
    pub fn sign(&self, signer: &dyn Signer) -> Result<AccountAuthenticator, TypesError> {
        let message = self.signing_message()?;
        let signature = signer.sign(&message)?;
        AccountAuthenticator::single_key(signer.scheme(), &signer.public_key(), &signature)
    }

    /// Assemble the signed transaction from every party's approval
    ///
    /// `fee_payer_signer` is required for fee-payer data and ignored otherwise.
    pub fn into_signed_transaction(
        self,
        sender: AccountAuthenticator,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_signer: Option<AccountAuthenticator>,
    ) -> Result<SignedTransaction, TypesError> {
        match self {
            RawTransactionWithData::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                let authenticator = TransactionAuthenticator::multi_agent(
                    sender,
                    secondary_signer_addresses,
                    secondary_signers,
                )?;
                Ok(SignedTransaction::new(raw_txn, authenticator))
            }
            RawTransactionWithData::FeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                let fee_payer_signer =
                    fee_payer_signer.ok_or(TypesError::MissingSignature("fee payer"))?;
                let authenticator = TransactionAuthenticator::fee_payer(
                    sender,
                    secondary_signer_addresses,
                    secondary_signers,
                    fee_payer_address,
                    fee_payer_signer,
                )?;
                Ok(SignedTransaction::new(raw_txn, authenticator))
            }
        }
    }
}

impl Serialize for RawTransactionWithData {
    fn serialize(&self, ser: &mut Serializer) {
        match self {
            RawTransactionWithData::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                ser.uleb128(0);
                raw_txn.serialize(ser);
                ser.sequence(secondary_signer_addresses);
            }
            RawTransactionWithData::FeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                ser.uleb128(1);
                raw_txn.serialize(ser);
                ser.sequence(secondary_signer_addresses);
                fee_payer_address.serialize(ser);
            }
        }
    }
}

impl Deserialize for RawTransactionWithData {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => RawTransactionWithData::MultiAgent {
                raw_txn: de.value(),
                secondary_signer_addresses: de.sequence(),
            },
            1 => RawTransactionWithData::FeePayer {
                raw_txn: de.value(),
                secondary_signer_addresses: de.sequence(),
                fee_payer_address: de.value(),
            },
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "RawTransactionWithData",
                    index,
                });
                RawTransactionWithData::MultiAgent {
                    raw_txn: RawTransaction::new(
                        AccountAddress::ZERO,
                        0,
                        TransactionPayload::Script(Default::default()),
                        0,
                        0,
                        0,
                        0,
                    ),
                    secondary_signer_addresses: Vec::new(),
                }
            }
        }
    }
}

// ==================== SignedTransaction ====================

/// Raw transaction with its authenticator, ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Transaction
    pub raw_txn: RawTransaction,
    /// Proof of approval
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Pair a raw transaction with its authenticator
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Decode from submission bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(aptos_bcs::deserialize(bytes)?)
    }

    /// BCS bytes, as posted to `/transactions`
    pub fn bytes(&self) -> Result<Vec<u8>, TypesError> {
        Ok(aptos_bcs::serialize(self)?)
    }

    /// Hash the chain will report for this transaction once committed
    pub fn hash(&self) -> Result<HashValue, TypesError> {
        Ok(transaction_hash(&self.bytes()?))
    }

    /// Check every signature against the message its signer should have
    /// signed
    ///
    /// Multi-Ed25519 authenticators are not checked and yield `false`.
    pub fn verify(&self) -> Result<bool, TypesError> {
        let ok = match &self.authenticator {
            TransactionAuthenticator::Ed25519 { .. }
            | TransactionAuthenticator::SingleSender { .. } => {
                let message = self.raw_txn.signing_message()?;
                self.authenticator.sender().verify(&message)
            }
            TransactionAuthenticator::MultiEd25519 { .. } => false,
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                let message = RawTransactionWithData::new_multi_agent(
                    self.raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                )
                .signing_message()?;
                sender.verify(&message) && secondary_signers.iter().all(|s| s.verify(&message))
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                let message = RawTransactionWithData::new_fee_payer(
                    self.raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                    *fee_payer_address,
                )
                .signing_message()?;
                sender.verify(&message)
                    && secondary_signers.iter().all(|s| s.verify(&message))
                    && fee_payer_signer.verify(&message)
            }
        };
        Ok(ok)
    }
}

impl Serialize for SignedTransaction {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.raw_txn);
        ser.value(&self.authenticator);
    }
}

impl Deserialize for SignedTransaction {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            raw_txn: de.value(),
            authenticator: de.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authenticator::{AnyPublicKey, AnySignature};
    use crate::payload::EntryFunction;
    use aptos_crypto::{Ed25519PrivateKey, Secp256k1PrivateKey};

    fn raw(sender: AccountAddress) -> RawTransaction {
        let entry = EntryFunction::from_function_id(
            "0x1::aptos_account::transfer",
            vec![],
            vec![AccountAddress::THREE.as_bytes().to_vec(), 1000u64.to_le_bytes().to_vec()],
        )
        .unwrap();
        RawTransaction::new(sender, 3, entry.into(), 200_000, 100, 1_700_000_000, 4)
    }

    // ==================== RawTransaction ====================

    #[test]
    fn test_field_order() {
        let txn = raw(AccountAddress::ONE);
        let bytes = txn.to_bcs().unwrap();
        assert_eq!(&bytes[..32], AccountAddress::ONE.as_bytes());
        assert_eq!(&bytes[32..40], &3u64.to_le_bytes());
        assert_eq!(bytes[40], 2);
        let tail = bytes.len() - 25;
        assert_eq!(&bytes[tail..tail + 8], &200_000u64.to_le_bytes());
        assert_eq!(&bytes[tail + 8..tail + 16], &100u64.to_le_bytes());
        assert_eq!(&bytes[tail + 16..tail + 24], &1_700_000_000u64.to_le_bytes());
        assert_eq!(bytes[tail + 24], 4);
        assert_eq!(aptos_bcs::deserialize::<RawTransaction>(&bytes).unwrap(), txn);
    }

    #[test]
    fn test_signing_message_deterministic() {
        let txn = raw(AccountAddress::ONE);
        let a = txn.signing_message().unwrap();
        let b = txn.clone().signing_message().unwrap();
        assert_eq!(a, b);
        let mut other = txn;
        other.sequence_number += 1;
        assert_ne!(a, other.signing_message().unwrap());
    }

    // ==================== Signing ====================

    #[test]
    fn test_sign_ed25519_single_key() {
        let key = Ed25519PrivateKey::from_seed([1; 32]);
        let txn = raw(key.address());
        let signed = txn.sign(&key).unwrap();
        assert_eq!(signed.raw_txn, txn);
        let TransactionAuthenticator::SingleSender {
            sender:
                AccountAuthenticator::SingleKey {
                    public_key: AnyPublicKey::Ed25519(pk),
                    signature: AnySignature::Ed25519(_),
                },
        } = &signed.authenticator
        else {
            panic!("unexpected authenticator {:?}", signed.authenticator);
        };
        assert_eq!(pk, &key.public_key_bytes());
        assert!(signed.verify().unwrap());
    }

    #[test]
    fn test_sign_secp256k1_single_key() {
        let key = Secp256k1PrivateKey::generate();
        let signed = raw(key.address()).sign(&key).unwrap();
        assert!(matches!(
            signed.authenticator.sender(),
            AccountAuthenticator::SingleKey {
                public_key: AnyPublicKey::Secp256k1(_),
                signature: AnySignature::Secp256k1(_),
            }
        ));
        assert!(signed.verify().unwrap());
    }

    #[test]
    fn test_sign_legacy() {
        let key = Ed25519PrivateKey::from_seed([2; 32]);
        let signed = raw(key.address()).sign_ed25519_legacy(&key).unwrap();
        assert_eq!(signed.authenticator.variant_index(), 0);
        assert!(signed.verify().unwrap());

        let k1 = Secp256k1PrivateKey::generate();
        assert!(matches!(
            raw(k1.address()).sign_ed25519_legacy(&k1),
            Err(TypesError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_tampered_transaction_fails_verify() {
        let key = Ed25519PrivateKey::from_seed([3; 32]);
        let mut signed = raw(key.address()).sign(&key).unwrap();
        signed.raw_txn.max_gas_amount += 1;
        assert!(!signed.verify().unwrap());
    }

    // ==================== SignedTransaction ====================

    #[test]
    fn test_bytes_and_hash() {
        let key = Ed25519PrivateKey::from_seed([4; 32]);
        let signed = raw(key.address()).sign(&key).unwrap();
        let bytes = signed.bytes().unwrap();
        assert_eq!(SignedTransaction::from_bytes(&bytes).unwrap(), signed);
        assert_eq!(signed.hash().unwrap(), transaction_hash(&bytes));
        assert_eq!(signed.hash().unwrap().to_hex().len(), 66);
    }

    // ==================== Multi-agent / fee payer ====================

    #[test]
    fn test_with_data_layout() {
        let txn = raw(AccountAddress::ONE);
        let data = RawTransactionWithData::new_fee_payer(
            txn.clone(),
            vec![AccountAddress::THREE],
            AccountAddress::FOUR,
        );
        let bytes = aptos_bcs::serialize(&data).unwrap();
        let raw_bytes = txn.to_bcs().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..1 + raw_bytes.len()], &raw_bytes[..]);
        assert_eq!(bytes.len(), 1 + raw_bytes.len() + 1 + 32 + 32);
        assert_eq!(aptos_bcs::deserialize::<RawTransactionWithData>(&bytes).unwrap(), data);
        assert_ne!(data.signing_message().unwrap(), txn.signing_message().unwrap());
    }

    #[test]
    fn test_fee_payer_flow() {
        let sender = Ed25519PrivateKey::from_seed([5; 32]);
        let second = Secp256k1PrivateKey::generate();
        let payer = Ed25519PrivateKey::from_seed([6; 32]);

        let data = RawTransactionWithData::new_fee_payer(
            raw(sender.address()),
            vec![second.address()],
            payer.address(),
        );
        let signed = data
            .clone()
            .into_signed_transaction(
                data.sign(&sender).unwrap(),
                vec![data.sign(&second).unwrap()],
                Some(data.sign(&payer).unwrap()),
            )
            .unwrap();
        assert_eq!(signed.authenticator.variant_index(), 3);
        assert!(signed.verify().unwrap());

        assert!(matches!(
            data.clone()
                .into_signed_transaction(data.sign(&sender).unwrap(), vec![data.sign(&second).unwrap()], None),
            Err(TypesError::MissingSignature(_))
        ));
    }

    #[test]
    fn test_multi_agent_flow() {
        let sender = Ed25519PrivateKey::from_seed([7; 32]);
        let second = Ed25519PrivateKey::from_seed([8; 32]);
        let data = RawTransactionWithData::new_multi_agent(raw(sender.address()), vec![second.address()]);
        let signed = data
            .clone()
            .into_signed_transaction(data.sign(&sender).unwrap(), vec![data.sign(&second).unwrap()], None)
            .unwrap();
        assert_eq!(signed.authenticator.variant_index(), 2);
        assert!(signed.verify().unwrap());
        let bytes = signed.bytes().unwrap();
        assert_eq!(SignedTransaction::from_bytes(&bytes).unwrap(), signed);
    }
}

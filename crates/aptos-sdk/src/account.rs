//! Accounts: an address plus the key that signs for it

use aptos_crypto::{
    private_key_from_hex, Ed25519PrivateKey, Secp256k1PrivateKey, SignatureScheme, Signer,
    ED25519_PRIVATE_KEY_LENGTH,
};
use aptos_primitives::AccountAddress;
use aptos_types::{AccountAuthenticator, RawTransaction, RawTransactionWithData, SignedTransaction};

use crate::SdkError;

/// Signing account
///
/// Clone is not implemented so keys are not duplicated by accident.
pub struct Account {
    address: AccountAddress,
    signer: Box<dyn Signer>,
}

impl Account {
    /// Random Ed25519 account
    pub fn generate_ed25519() -> Self {
        Self::from_signer(Box::new(Ed25519PrivateKey::generate()))
    }

    /// Random secp256k1 account
    pub fn generate_secp256k1() -> Self {
        Self::from_signer(Box::new(Secp256k1PrivateKey::generate()))
    }

    /// Ed25519 account from a 32-byte seed
    pub fn from_ed25519_seed(seed: [u8; ED25519_PRIVATE_KEY_LENGTH]) -> Self {
        Self::from_signer(Box::new(Ed25519PrivateKey::from_seed(seed)))
    }

    /// secp256k1 account from a 32-byte scalar
    pub fn from_secp256k1_bytes(bytes: &[u8]) -> Result<Self, SdkError> {
        Ok(Self::from_signer(Box::new(Secp256k1PrivateKey::from_bytes(bytes)?)))
    }

    /// Account from a hex private key, `0x` prefix optional
    pub fn from_private_key_hex(scheme: SignatureScheme, hex_key: &str) -> Result<Self, SdkError> {
        Ok(Self::from_signer(private_key_from_hex(scheme, hex_key)?))
    }

    /// Account whose address is derived from `signer`'s authentication key
    pub fn from_signer(signer: Box<dyn Signer>) -> Self {
        Self {
            address: signer.address(),
            signer,
        }
    }

    /// Account at an explicit address, e.g. after key rotation
    pub fn with_address(address: AccountAddress, signer: Box<dyn Signer>) -> Self {
        Self { address, signer }
    }

    /// On-chain address
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Public key in the scheme's wire form
    pub fn public_key(&self) -> Vec<u8> {
        self.signer.public_key()
    }

    /// Signature scheme
    pub fn scheme(&self) -> SignatureScheme {
        self.signer.scheme()
    }

    /// Authentication key of the current key
    pub fn auth_key(&self) -> [u8; 32] {
        self.signer.auth_key()
    }

    /// Underlying signer
    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    /// Sign an arbitrary message
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SdkError> {
        Ok(self.signer.sign(message)?)
    }

    /// Sign a transaction this account sends
    pub fn sign_transaction(&self, raw: &RawTransaction) -> Result<SignedTransaction, SdkError> {
        Ok(raw.sign(self.signer.as_ref())?)
    }

    /// Approve a multi-agent or fee-payer transaction
    pub fn sign_with_data(&self, raw: &RawTransactionWithData) -> Result<AccountAuthenticator, SdkError> {
        Ok(raw.sign(self.signer.as_ref())?)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("scheme", &self.signer.scheme())
            .finish_non_exhaustive()
    }
}

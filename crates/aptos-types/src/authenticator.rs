//! Account and transaction authenticators
//!
//! A [`TransactionAuthenticator`] proves the sender (and any secondary
//! signers or fee payer) approved a transaction. Each individual proof is an
//! [`AccountAuthenticator`].

use aptos_bcs::{Deserialize, Deserializer, Error as BcsError, Serialize, Serializer};
use aptos_crypto::{
    verify, SignatureScheme, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
    SECP256K1_PUBLIC_KEY_LENGTH, SECP256K1_SIGNATURE_LENGTH,
};
use aptos_primitives::AccountAddress;

use crate::error::TypesError;

fn fixed<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N], TypesError> {
    bytes.try_into().map_err(|_| TypesError::InvalidLength {
        what,
        expected: N,
        got: bytes.len(),
    })
}

// ==================== Keys and signatures ====================

/// Public key tagged with its scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyPublicKey {
    /// Ed25519 key
    Ed25519([u8; ED25519_PUBLIC_KEY_LENGTH]),
    /// Compressed secp256k1 key
    Secp256k1([u8; SECP256K1_PUBLIC_KEY_LENGTH]),
}

impl AnyPublicKey {
    /// Wrap raw key bytes, checking the length for `scheme`
    pub fn from_scheme(scheme: SignatureScheme, bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(match scheme {
            SignatureScheme::Ed25519 => AnyPublicKey::Ed25519(fixed("ed25519 public key", bytes)?),
            SignatureScheme::Secp256k1 => {
                AnyPublicKey::Secp256k1(fixed("secp256k1 public key", bytes)?)
            }
        })
    }

    /// Scheme of this key
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            AnyPublicKey::Ed25519(_) => SignatureScheme::Ed25519,
            AnyPublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AnyPublicKey::Ed25519(key) => key,
            AnyPublicKey::Secp256k1(key) => key,
        }
    }
}

impl Serialize for AnyPublicKey {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(u32::from(self.scheme().as_byte()));
        ser.fixed_bytes(self.as_bytes());
    }
}

impl Deserialize for AnyPublicKey {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => AnyPublicKey::Ed25519(de.fixed_array()),
            2 => AnyPublicKey::Secp256k1(de.fixed_array()),
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "AnyPublicKey",
                    index,
                });
                AnyPublicKey::Ed25519([0; ED25519_PUBLIC_KEY_LENGTH])
            }
        }
    }
}

/// Signature tagged with its scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnySignature {
    /// Ed25519 signature
    Ed25519([u8; ED25519_SIGNATURE_LENGTH]),
    /// secp256k1 `r || s`
    Secp256k1([u8; SECP256K1_SIGNATURE_LENGTH]),
}

impl AnySignature {
    /// Wrap raw signature bytes, checking the length for `scheme`
    pub fn from_scheme(scheme: SignatureScheme, bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(match scheme {
            SignatureScheme::Ed25519 => AnySignature::Ed25519(fixed("ed25519 signature", bytes)?),
            SignatureScheme::Secp256k1 => {
                AnySignature::Secp256k1(fixed("secp256k1 signature", bytes)?)
            }
        })
    }

    /// Scheme of this signature
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            AnySignature::Ed25519(_) => SignatureScheme::Ed25519,
            AnySignature::Secp256k1(_) => SignatureScheme::Secp256k1,
        }
    }

    /// Raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AnySignature::Ed25519(sig) => sig,
            AnySignature::Secp256k1(sig) => sig,
        }
    }
}

impl Serialize for AnySignature {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(u32::from(self.scheme().as_byte()));
        ser.fixed_bytes(self.as_bytes());
    }
}

impl Deserialize for AnySignature {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => AnySignature::Ed25519(de.fixed_array()),
            2 => AnySignature::Secp256k1(de.fixed_array()),
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "AnySignature",
                    index,
                });
                AnySignature::Ed25519([0; ED25519_SIGNATURE_LENGTH])
            }
        }
    }
}

// ==================== AccountAuthenticator ====================

/// Proof that one account approved a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Legacy Ed25519 (discriminant 0)
    Ed25519 {
        /// Public key
        public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        /// Signature
        signature: [u8; ED25519_SIGNATURE_LENGTH],
    },
    /// Legacy k-of-n Ed25519 (discriminant 1), carried as opaque bytes
    MultiEd25519 {
        /// Concatenated keys and threshold
        public_key: Vec<u8>,
        /// Concatenated signatures and bitmap
        signature: Vec<u8>,
    },
    /// Scheme-tagged single key (discriminant 2)
    SingleKey {
        /// Public key
        public_key: AnyPublicKey,
        /// Signature
        signature: AnySignature,
    },
}

impl AccountAuthenticator {
    /// Single-key authenticator from raw signer output
    pub fn single_key(
        scheme: SignatureScheme,
        public_key: &[u8],
        signature: &[u8],
    ) -> Result<Self, TypesError> {
        Ok(AccountAuthenticator::SingleKey {
            public_key: AnyPublicKey::from_scheme(scheme, public_key)?,
            signature: AnySignature::from_scheme(scheme, signature)?,
        })
    }

    /// Legacy Ed25519 authenticator from raw signer output
    pub fn ed25519(public_key: &[u8], signature: &[u8]) -> Result<Self, TypesError> {
        Ok(AccountAuthenticator::Ed25519 {
            public_key: fixed("ed25519 public key", public_key)?,
            signature: fixed("ed25519 signature", signature)?,
        })
    }

    /// Check the signature over `message`
    ///
    /// Multi-Ed25519 proofs are not checked locally and always return false.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => verify(SignatureScheme::Ed25519, public_key, message, signature),
            AccountAuthenticator::SingleKey {
                public_key,
                signature,
            } => {
                public_key.scheme() == signature.scheme()
                    && verify(
                        public_key.scheme(),
                        public_key.as_bytes(),
                        message,
                        signature.as_bytes(),
                    )
            }
            AccountAuthenticator::MultiEd25519 { .. } => false,
        }
    }

    /// BCS discriminant
    pub fn variant_index(&self) -> u32 {
        match self {
            AccountAuthenticator::Ed25519 { .. } => 0,
            AccountAuthenticator::MultiEd25519 { .. } => 1,
            AccountAuthenticator::SingleKey { .. } => 2,
        }
    }

    fn write_body(&self, ser: &mut Serializer) {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                ser.fixed_bytes(public_key);
                ser.fixed_bytes(signature);
            }
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => {
                ser.bytes(public_key);
                ser.bytes(signature);
            }
            AccountAuthenticator::SingleKey {
                public_key,
                signature,
            } => {
                public_key.serialize(ser);
                signature.serialize(ser);
            }
        }
    }
}

impl Serialize for AccountAuthenticator {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(self.variant_index());
        self.write_body(ser);
    }
}

impl Deserialize for AccountAuthenticator {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => AccountAuthenticator::Ed25519 {
                public_key: de.fixed_array(),
                signature: de.fixed_array(),
            },
            1 => AccountAuthenticator::MultiEd25519 {
                public_key: de.bytes(),
                signature: de.bytes(),
            },
            2 => AccountAuthenticator::SingleKey {
                public_key: de.value(),
                signature: de.value(),
            },
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "AccountAuthenticator",
                    index,
                });
                AccountAuthenticator::MultiEd25519 {
                    public_key: Vec::new(),
                    signature: Vec::new(),
                }
            }
        }
    }
}

// ==================== TransactionAuthenticator ====================

/// Authenticator attached to a signed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Legacy Ed25519 sender (0)
    Ed25519 {
        /// Public key
        public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        /// Signature
        signature: [u8; ED25519_SIGNATURE_LENGTH],
    },
    /// Legacy multi-Ed25519 sender (1)
    MultiEd25519 {
        /// Concatenated keys and threshold
        public_key: Vec<u8>,
        /// Concatenated signatures and bitmap
        signature: Vec<u8>,
    },
    /// Sender plus secondary signers (2)
    MultiAgent {
        /// Sender proof
        sender: AccountAuthenticator,
        /// Secondary signer addresses, in signing order
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signer proofs, parallel to the addresses
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Multi-agent with a separate gas payer (3)
    FeePayer {
        /// Sender proof
        sender: AccountAuthenticator,
        /// Secondary signer addresses
        secondary_signer_addresses: Vec<AccountAddress>,
        /// Secondary signer proofs
        secondary_signers: Vec<AccountAuthenticator>,
        /// Gas payer
        fee_payer_address: AccountAddress,
        /// Gas payer proof
        fee_payer_signer: AccountAuthenticator,
    },
    /// Any single account authenticator (4)
    SingleSender {
        /// Sender proof
        sender: AccountAuthenticator,
    },
}

impl TransactionAuthenticator {
    /// Single-sender authenticator
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        TransactionAuthenticator::SingleSender { sender }
    }

    /// Legacy Ed25519 authenticator from raw signer output
    pub fn ed25519(public_key: &[u8], signature: &[u8]) -> Result<Self, TypesError> {
        Ok(TransactionAuthenticator::Ed25519 {
            public_key: fixed("ed25519 public key", public_key)?,
            signature: fixed("ed25519 signature", signature)?,
        })
    }

    /// Multi-agent authenticator
    ///
    /// Addresses and proofs must be parallel.
    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Result<Self, TypesError> {
        check_parallel(&secondary_signer_addresses, &secondary_signers)?;
        Ok(TransactionAuthenticator::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        })
    }

    /// Fee-payer authenticator
    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Result<Self, TypesError> {
        check_parallel(&secondary_signer_addresses, &secondary_signers)?;
        Ok(TransactionAuthenticator::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        })
    }

    /// BCS discriminant
    pub fn variant_index(&self) -> u32 {
        match self {
            TransactionAuthenticator::Ed25519 { .. } => 0,
            TransactionAuthenticator::MultiEd25519 { .. } => 1,
            TransactionAuthenticator::MultiAgent { .. } => 2,
            TransactionAuthenticator::FeePayer { .. } => 3,
            TransactionAuthenticator::SingleSender { .. } => 4,
        }
    }

    /// Sender's proof as an account authenticator
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::Ed25519 {
                public_key: *public_key,
                signature: *signature,
            },
            TransactionAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::MultiEd25519 {
                public_key: public_key.clone(),
                signature: signature.clone(),
            },
            TransactionAuthenticator::MultiAgent { sender, .. }
            | TransactionAuthenticator::FeePayer { sender, .. }
            | TransactionAuthenticator::SingleSender { sender } => sender.clone(),
        }
    }
}

fn check_parallel(
    addresses: &[AccountAddress],
    signers: &[AccountAuthenticator],
) -> Result<(), TypesError> {
    if addresses.len() != signers.len() {
        return Err(TypesError::InvalidLength {
            what: "secondary signer list",
            expected: addresses.len(),
            got: signers.len(),
        });
    }
    Ok(())
}

impl Serialize for TransactionAuthenticator {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(self.variant_index());
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                ser.fixed_bytes(public_key);
                ser.fixed_bytes(signature);
            }
            TransactionAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => {
                ser.bytes(public_key);
                ser.bytes(signature);
            }
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                sender.serialize(ser);
                ser.sequence(secondary_signer_addresses);
                ser.sequence(secondary_signers);
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                sender.serialize(ser);
                ser.sequence(secondary_signer_addresses);
                ser.sequence(secondary_signers);
                fee_payer_address.serialize(ser);
                fee_payer_signer.serialize(ser);
            }
            TransactionAuthenticator::SingleSender { sender } => sender.serialize(ser),
        }
    }
}

impl Deserialize for TransactionAuthenticator {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => TransactionAuthenticator::Ed25519 {
                public_key: de.fixed_array(),
                signature: de.fixed_array(),
            },
            1 => TransactionAuthenticator::MultiEd25519 {
                public_key: de.bytes(),
                signature: de.bytes(),
            },
            2 => TransactionAuthenticator::MultiAgent {
                sender: de.value(),
                secondary_signer_addresses: de.sequence(),
                secondary_signers: de.sequence(),
            },
            3 => TransactionAuthenticator::FeePayer {
                sender: de.value(),
                secondary_signer_addresses: de.sequence(),
                secondary_signers: de.sequence(),
                fee_payer_address: de.value(),
                fee_payer_signer: de.value(),
            },
            4 => TransactionAuthenticator::SingleSender { sender: de.value() },
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "TransactionAuthenticator",
                    index,
                });
                TransactionAuthenticator::MultiEd25519 {
                    public_key: Vec::new(),
                    signature: Vec::new(),
                }
            }
        }
    }
}

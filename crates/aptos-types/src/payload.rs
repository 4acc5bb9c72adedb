//! Transaction payloads
//!
//! | Variant | Discriminant |
//! |---------|--------------|
//! | Script | 0 |
//! | ModuleBundle | 1 (retired, rejected on decode) |
//! | EntryFunction | 2 |
//! | Multisig | 3 |
//! | Payload (versioned) | 4 |

use aptos_bcs::{Deserialize, Deserializer, Error as BcsError, Serialize, Serializer};
use aptos_primitives::{AccountAddress, U128, U256};

use crate::error::TypesError;
use crate::type_tag::{ModuleId, TypeTag};

/// Call to a published `entry fun`
///
/// Arguments are carried pre-encoded; see [`crate::args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunction {
    /// Declaring module
    pub module: ModuleId,
    /// Function name
    pub function: String,
    /// Generic arguments
    pub ty_args: Vec<TypeTag>,
    /// BCS-encoded arguments
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Create an entry function call
    pub fn new(
        module: ModuleId,
        function: impl Into<String>,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function: function.into(),
            ty_args,
            args,
        }
    }

    /// Build from a function id such as `0x1::aptos_account::transfer`
    pub fn from_function_id(
        function_id: &str,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Result<Self, TypesError> {
        let (module, function) = Self::parse_function_id(function_id)?;
        Ok(Self::new(module, function, ty_args, args))
    }

    /// Split `address::module::function`
    pub fn parse_function_id(function_id: &str) -> Result<(ModuleId, String), TypesError> {
        let invalid = || TypesError::InvalidFunctionId(function_id.to_string());
        let (module, function) = function_id.trim().rsplit_once("::").ok_or_else(invalid)?;
        if function.is_empty() || !module.contains("::") {
            return Err(invalid());
        }
        let module = module.parse::<ModuleId>().map_err(|_| invalid())?;
        Ok((module, function.to_string()))
    }

    /// `0x1::module::function`
    pub fn function_id(&self) -> String {
        format!("{}::{}", self.module, self.function)
    }
}

impl Serialize for EntryFunction {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.module);
        ser.str(&self.function);
        ser.sequence(&self.ty_args);
        ser.sequence_with(&self.args, |ser, arg| ser.bytes(arg));
    }
}

impl Deserialize for EntryFunction {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            module: de.value(),
            function: de.string(),
            ty_args: de.sequence(),
            args: de.sequence_with(|de| de.bytes()),
        }
    }
}

/// Script argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptArgument {
    /// `u8`
    U8(u8),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u64`
    U64(u64),
    /// `u128`
    U128(U128),
    /// `u256`
    U256(U256),
    /// `address`
    Address(AccountAddress),
    /// `vector<u8>`
    U8Vector(Vec<u8>),
    /// `bool`
    Bool(bool),
}

impl ScriptArgument {
    /// BCS discriminant
    pub fn variant_index(&self) -> u32 {
        match self {
            ScriptArgument::U8(_) => 0,
            ScriptArgument::U64(_) => 1,
            ScriptArgument::U128(_) => 2,
            ScriptArgument::Address(_) => 3,
            ScriptArgument::U8Vector(_) => 4,
            ScriptArgument::Bool(_) => 5,
            ScriptArgument::U16(_) => 6,
            ScriptArgument::U32(_) => 7,
            ScriptArgument::U256(_) => 8,
        }
    }
}

impl Serialize for ScriptArgument {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(self.variant_index());
        match self {
            ScriptArgument::U8(v) => ser.u8(*v),
            ScriptArgument::U16(v) => ser.u16(*v),
            ScriptArgument::U32(v) => ser.u32(*v),
            ScriptArgument::U64(v) => ser.u64(*v),
            ScriptArgument::U128(v) => v.serialize(ser),
            ScriptArgument::U256(v) => v.serialize(ser),
            ScriptArgument::Address(v) => v.serialize(ser),
            ScriptArgument::U8Vector(v) => ser.bytes(v),
            ScriptArgument::Bool(v) => ser.bool(*v),
        }
    }
}

impl Deserialize for ScriptArgument {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => ScriptArgument::U8(de.u8()),
            1 => ScriptArgument::U64(de.u64()),
            2 => ScriptArgument::U128(de.value()),
            3 => ScriptArgument::Address(de.value()),
            4 => ScriptArgument::U8Vector(de.bytes()),
            5 => ScriptArgument::Bool(de.bool()),
            6 => ScriptArgument::U16(de.u16()),
            7 => ScriptArgument::U32(de.u32()),
            8 => ScriptArgument::U256(de.value()),
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "ScriptArgument",
                    index,
                });
                ScriptArgument::U8(0)
            }
        }
    }
}

/// Compiled script with its arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Bytecode
    pub code: Vec<u8>,
    /// Generic arguments
    pub ty_args: Vec<TypeTag>,
    /// Arguments
    pub args: Vec<ScriptArgument>,
}

impl Serialize for Script {
    fn serialize(&self, ser: &mut Serializer) {
        ser.bytes(&self.code);
        ser.sequence(&self.ty_args);
        ser.sequence(&self.args);
    }
}

impl Deserialize for Script {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            code: de.bytes(),
            ty_args: de.sequence(),
            args: de.sequence(),
        }
    }
}

/// Action executed on behalf of a multisig account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisig {
    /// Multisig account
    pub multisig_address: AccountAddress,
    /// Call to execute, `None` when the payload was stored on chain
    pub transaction_payload: Option<EntryFunction>,
}

impl Serialize for Multisig {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.multisig_address);
        ser.option(self.transaction_payload.as_ref());
    }
}

impl Deserialize for Multisig {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            multisig_address: de.value(),
            transaction_payload: de.option(),
        }
    }
}

/// Executable part of a versioned payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionExecutable {
    /// Script
    Script(Script),
    /// Entry function
    EntryFunction(EntryFunction),
}

impl Serialize for TransactionExecutable {
    fn serialize(&self, ser: &mut Serializer) {
        match self {
            TransactionExecutable::Script(script) => {
                ser.uleb128(0);
                script.serialize(ser);
            }
            TransactionExecutable::EntryFunction(entry) => {
                ser.uleb128(1);
                entry.serialize(ser);
            }
        }
    }
}

impl Deserialize for TransactionExecutable {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => TransactionExecutable::Script(de.value()),
            1 => TransactionExecutable::EntryFunction(de.value()),
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "TransactionExecutable",
                    index,
                });
                TransactionExecutable::Script(Script::default())
            }
        }
    }
}

/// Options attached to a versioned payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionExtraConfig {
    /// Multisig account the executable runs as
    pub multisig_address: Option<AccountAddress>,
    /// Replay nonce for orderless transactions
    pub replay_protection_nonce: Option<u64>,
}

impl Serialize for TransactionExtraConfig {
    fn serialize(&self, ser: &mut Serializer) {
        // V1
        ser.uleb128(0);
        ser.option(self.multisig_address.as_ref());
        ser.option(self.replay_protection_nonce.as_ref());
    }
}

impl Deserialize for TransactionExtraConfig {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        let index = de.uleb128();
        if index != 0 && de.is_ok() {
            de.set_error(BcsError::UnknownVariant {
                type_name: "TransactionExtraConfig",
                index,
            });
        }
        Self {
            multisig_address: de.option(),
            replay_protection_nonce: de.option(),
        }
    }
}

/// Versioned payload (V1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInnerPayload {
    /// What to run
    pub executable: TransactionExecutable,
    /// How to run it
    pub extra_config: TransactionExtraConfig,
}

impl Serialize for TransactionInnerPayload {
    fn serialize(&self, ser: &mut Serializer) {
        // V1
        ser.uleb128(0);
        self.executable.serialize(ser);
        self.extra_config.serialize(ser);
    }
}

impl Deserialize for TransactionInnerPayload {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        let index = de.uleb128();
        if index != 0 && de.is_ok() {
            de.set_error(BcsError::UnknownVariant {
                type_name: "TransactionInnerPayload",
                index,
            });
        }
        Self {
            executable: de.value(),
            extra_config: de.value(),
        }
    }
}

/// Transaction payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Script
    Script(Script),
    /// Entry function
    EntryFunction(EntryFunction),
    /// Multisig action
    Multisig(Multisig),
    /// Versioned payload
    Payload(TransactionInnerPayload),
}

impl TransactionPayload {
    /// BCS discriminant
    pub fn variant_index(&self) -> u32 {
        match self {
            TransactionPayload::Script(_) => 0,
            TransactionPayload::EntryFunction(_) => 2,
            TransactionPayload::Multisig(_) => 3,
            TransactionPayload::Payload(_) => 4,
        }
    }

    /// Replay nonce, if this is an orderless payload
    pub fn replay_protection_nonce(&self) -> Option<u64> {
        match self {
            TransactionPayload::Payload(inner) => inner.extra_config.replay_protection_nonce,
            _ => None,
        }
    }

    /// Rewrap into a versioned payload carrying `nonce`
    ///
    /// A multisig payload must carry its entry function.
    pub fn into_orderless(self, nonce: u64) -> Result<TransactionPayload, TypesError> {
        let (executable, multisig_address) = match self {
            TransactionPayload::Script(script) => (TransactionExecutable::Script(script), None),
            TransactionPayload::EntryFunction(entry) => {
                (TransactionExecutable::EntryFunction(entry), None)
            }
            TransactionPayload::Multisig(multisig) => {
                let entry = multisig.transaction_payload.ok_or_else(|| {
                    TypesError::InvalidPayload(
                        "multisig payload without an entry function cannot be orderless".into(),
                    )
                })?;
                (
                    TransactionExecutable::EntryFunction(entry),
                    Some(multisig.multisig_address),
                )
            }
            TransactionPayload::Payload(mut inner) => {
                inner.extra_config.replay_protection_nonce = Some(nonce);
                return Ok(TransactionPayload::Payload(inner));
            }
        };
        Ok(TransactionPayload::Payload(TransactionInnerPayload {
            executable,
            extra_config: TransactionExtraConfig {
                multisig_address,
                replay_protection_nonce: Some(nonce),
            },
        }))
    }
}

impl Serialize for TransactionPayload {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(self.variant_index());
        match self {
            TransactionPayload::Script(v) => v.serialize(ser),
            TransactionPayload::EntryFunction(v) => v.serialize(ser),
            TransactionPayload::Multisig(v) => v.serialize(ser),
            TransactionPayload::Payload(v) => v.serialize(ser),
        }
    }
}

impl Deserialize for TransactionPayload {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        match de.uleb128() {
            0 => TransactionPayload::Script(de.value()),
            2 => TransactionPayload::EntryFunction(de.value()),
            3 => TransactionPayload::Multisig(de.value()),
            4 => TransactionPayload::Payload(de.value()),
            index => {
                if de.is_ok() {
                    de.set_error(if index == 1 {
                        BcsError::Custom("ModuleBundle payloads are no longer supported".into())
                    } else {
                        BcsError::UnknownVariant {
                            type_name: "TransactionPayload",
                            index,
                        }
                    });
                }
                TransactionPayload::Script(Script::default())
            }
        }
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry)
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> EntryFunction {
        EntryFunction::from_function_id(
            "0x1::aptos_account::transfer",
            vec![],
            vec![vec![0xaa; 32], 1000u64.to_le_bytes().to_vec()],
        )
        .unwrap()
    }

    // ==================== EntryFunction ====================

    #[test]
    fn test_parse_function_id() {
        let (module, function) = EntryFunction::parse_function_id("0x1::coin::transfer").unwrap();
        assert_eq!(module.to_string(), "0x1::coin");
        assert_eq!(function, "transfer");
        for bad in ["transfer", "0x1::transfer", "0x1::coin::", "zz::coin::transfer"] {
            assert!(EntryFunction::parse_function_id(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_entry_function_layout() {
        let entry = transfer();
        let bytes = aptos_bcs::serialize(&entry).unwrap();
        let mut expected = AccountAddress::ONE.as_bytes().to_vec();
        expected.push(13);
        expected.extend_from_slice(b"aptos_account");
        expected.push(8);
        expected.extend_from_slice(b"transfer");
        expected.push(0);
        expected.push(2);
        expected.push(32);
        expected.extend_from_slice(&[0xaa; 32]);
        expected.push(8);
        expected.extend_from_slice(&1000u64.to_le_bytes());
        assert_eq!(bytes, expected);
        assert_eq!(aptos_bcs::deserialize::<EntryFunction>(&bytes).unwrap(), entry);
    }

    // ==================== ScriptArgument ====================

    #[test]
    fn test_script_argument_discriminants() {
        let cases = [
            (ScriptArgument::U8(1), vec![0, 1]),
            (ScriptArgument::U16(1), vec![6, 1, 0]),
            (ScriptArgument::Bool(true), vec![5, 1]),
            (ScriptArgument::U8Vector(vec![9]), vec![4, 1, 9]),
        ];
        for (arg, expected) in cases {
            assert_eq!(aptos_bcs::serialize(&arg).unwrap(), expected);
            assert_eq!(aptos_bcs::deserialize::<ScriptArgument>(&expected).unwrap(), arg);
        }
    }

    #[test]
    fn test_script_argument_wide_ints() {
        let arg = ScriptArgument::U256(U256::from(u128::MAX));
        let bytes = aptos_bcs::serialize(&arg).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 8);
        assert_eq!(aptos_bcs::deserialize::<ScriptArgument>(&bytes).unwrap(), arg);
    }

    // ==================== TransactionPayload ====================

    #[test]
    fn test_payload_discriminants() {
        let script = TransactionPayload::Script(Script {
            code: vec![0xa1],
            ty_args: vec![TypeTag::U8],
            args: vec![ScriptArgument::Bool(false)],
        });
        assert_eq!(aptos_bcs::serialize(&script).unwrap()[0], 0);
        assert_eq!(aptos_bcs::serialize(&TransactionPayload::from(transfer())).unwrap()[0], 2);
    }

    #[test]
    fn test_payload_roundtrips() {
        let payloads = [
            TransactionPayload::from(transfer()),
            TransactionPayload::Multisig(Multisig {
                multisig_address: AccountAddress::THREE,
                transaction_payload: Some(transfer()),
            }),
            TransactionPayload::Multisig(Multisig {
                multisig_address: AccountAddress::THREE,
                transaction_payload: None,
            }),
            TransactionPayload::from(transfer()).into_orderless(7).unwrap(),
        ];
        for payload in payloads {
            let bytes = aptos_bcs::serialize(&payload).unwrap();
            assert_eq!(aptos_bcs::deserialize::<TransactionPayload>(&bytes).unwrap(), payload);
        }
    }

    #[test]
    fn test_module_bundle_rejected() {
        assert!(matches!(
            aptos_bcs::deserialize::<TransactionPayload>(&[1, 0]),
            Err(BcsError::Custom(_))
        ));
        assert_eq!(
            aptos_bcs::deserialize::<TransactionPayload>(&[5]),
            Err(BcsError::UnknownVariant {
                type_name: "TransactionPayload",
                index: 5
            })
        );
    }

    #[test]
    fn test_orderless_layout() {
        let payload = TransactionPayload::from(transfer()).into_orderless(42).unwrap();
        assert_eq!(payload.replay_protection_nonce(), Some(42));
        let bytes = aptos_bcs::serialize(&payload).unwrap();
        let entry = aptos_bcs::serialize(&transfer()).unwrap();
        assert_eq!(&bytes[..3], &[4, 0, 1]);
        assert_eq!(&bytes[3..3 + entry.len()], &entry[..]);
        let mut tail = vec![0, 0, 1];
        tail.extend_from_slice(&42u64.to_le_bytes());
        assert_eq!(&bytes[3 + entry.len()..], &tail[..]);
    }

    #[test]
    fn test_orderless_multisig() {
        let payload = TransactionPayload::Multisig(Multisig {
            multisig_address: AccountAddress::FOUR,
            transaction_payload: Some(transfer()),
        })
        .into_orderless(1)
        .unwrap();
        let TransactionPayload::Payload(inner) = payload else {
            panic!("expected versioned payload");
        };
        assert_eq!(inner.extra_config.multisig_address, Some(AccountAddress::FOUR));

        let empty = TransactionPayload::Multisig(Multisig {
            multisig_address: AccountAddress::FOUR,
            transaction_payload: None,
        });
        assert!(matches!(empty.into_orderless(1), Err(TypesError::InvalidPayload(_))));
    }
}

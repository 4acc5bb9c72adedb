//! Move type tags
//!
//! Text form follows Move source syntax: `u64`, `vector<u8>`,
//! `0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>`. Struct addresses print
//! in short form.

use std::fmt;
use std::str::FromStr;

use aptos_bcs::{Deserialize, Deserializer, Error as BcsError, Serialize, Serializer};
use aptos_primitives::AccountAddress;

use crate::error::TypeTagError;

/// Deepest `vector<...>` / type-parameter nesting accepted by the parser
/// and the decoder
pub const MAX_TYPE_TAG_DEPTH: usize = 64;

/// Move type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `bool`
    Bool,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `u256`
    U256,
    /// `address`
    Address,
    /// `signer`
    Signer,
    /// `vector<T>`
    Vector(Box<TypeTag>),
    /// Struct instance
    Struct(Box<StructTag>),
}

impl TypeTag {
    /// Wrap in `vector<...>`
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    /// Struct type tag
    pub fn new_struct(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        TypeTag::new_struct(StructTag::new(AccountAddress::ONE, "aptos_coin", "AptosCoin", vec![]))
    }

    /// BCS discriminant
    pub fn variant_index(&self) -> u32 {
        match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
        }
    }

    fn decode(de: &mut Deserializer<'_>, depth: usize) -> Self {
        if depth > MAX_TYPE_TAG_DEPTH {
            de.set_error(BcsError::Custom(format!(
                "type tag nested deeper than {MAX_TYPE_TAG_DEPTH} levels"
            )));
            return TypeTag::Bool;
        }
        match de.uleb128() {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::Vector(Box::new(TypeTag::decode(de, depth + 1))),
            7 => TypeTag::Struct(Box::new(StructTag::decode(de, depth + 1))),
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            10 => TypeTag::U256,
            index => {
                de.set_error(BcsError::UnknownVariant {
                    type_name: "TypeTag",
                    index,
                });
                TypeTag::Bool
            }
        }
    }
}

impl Serialize for TypeTag {
    fn serialize(&self, ser: &mut Serializer) {
        ser.uleb128(self.variant_index());
        match self {
            TypeTag::Vector(inner) => inner.serialize(ser),
            TypeTag::Struct(tag) => tag.serialize(ser),
            _ => {}
        }
    }
}

impl Deserialize for TypeTag {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        TypeTag::decode(de, 0)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(tag) => fmt::Display::fmt(tag, f),
        }
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_nested(s, 0)
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::new_struct(tag)
    }
}

/// Fully qualified struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    /// Publishing account
    pub address: AccountAddress,
    /// Module name
    pub module: String,
    /// Struct name
    pub name: String,
    /// Generic arguments
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    /// Create a struct tag
    pub fn new(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
            type_args,
        }
    }

    /// Module that declares the struct
    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }

    fn decode(de: &mut Deserializer<'_>, depth: usize) -> Self {
        let address = de.value();
        let module = de.string();
        let name = de.string();
        let type_args = de.sequence_with(|de| TypeTag::decode(de, depth + 1));
        Self {
            address,
            module,
            name,
            type_args,
        }
    }
}

impl Serialize for StructTag {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.address);
        ser.str(&self.module);
        ser.str(&self.name);
        ser.sequence(&self.type_args);
    }
}

impl Deserialize for StructTag {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        StructTag::decode(de, 0)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address.short_string(), self.module, self.name)?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_nested(s, 0)? {
            TypeTag::Struct(tag) => Ok(*tag),
            _ => Err(TypeTagError::InvalidStructTag(s.trim().to_string())),
        }
    }
}

/// `address::module`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    /// Publishing account
    pub address: AccountAddress,
    /// Module name
    pub name: String,
}

impl ModuleId {
    /// Create a module id
    pub fn new(address: AccountAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

impl Serialize for ModuleId {
    fn serialize(&self, ser: &mut Serializer) {
        ser.value(&self.address);
        ser.str(&self.name);
    }
}

impl Deserialize for ModuleId {
    fn deserialize(de: &mut Deserializer<'_>) -> Self {
        Self {
            address: de.value(),
            name: de.string(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.short_string(), self.name)
    }
}

impl FromStr for ModuleId {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (address, name) = s
            .split_once("::")
            .ok_or_else(|| TypeTagError::InvalidStructTag(s.to_string()))?;
        check_identifier(name)?;
        Ok(ModuleId::new(parse_address(address)?, name))
    }
}

// ==================== Parser ====================

/// Parse a type tag from its Move source form
pub fn parse_type_tag(s: &str) -> Result<TypeTag, TypeTagError> {
    parse_nested(s, 0)
}

fn parse_nested(s: &str, depth: usize) -> Result<TypeTag, TypeTagError> {
    if depth > MAX_TYPE_TAG_DEPTH {
        return Err(TypeTagError::TooDeep(MAX_TYPE_TAG_DEPTH));
    }
    let s = s.trim();
    match s {
        "" => return Err(TypeTagError::Empty),
        "bool" => return Ok(TypeTag::Bool),
        "u8" => return Ok(TypeTag::U8),
        "u16" => return Ok(TypeTag::U16),
        "u32" => return Ok(TypeTag::U32),
        "u64" => return Ok(TypeTag::U64),
        "u128" => return Ok(TypeTag::U128),
        "u256" => return Ok(TypeTag::U256),
        "address" => return Ok(TypeTag::Address),
        "signer" => return Ok(TypeTag::Signer),
        _ => {}
    }

    if let Some(inner) = s.strip_prefix("vector<").and_then(|r| r.strip_suffix('>')) {
        return Ok(TypeTag::vector(parse_nested(inner, depth + 1)?));
    }

    parse_struct_tag(s, depth).map(TypeTag::new_struct)
}

fn parse_struct_tag(s: &str, depth: usize) -> Result<StructTag, TypeTagError> {
    let (head, type_args) = match s.find('<') {
        Some(open) => {
            let params = s[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| TypeTagError::UnbalancedBrackets(s.to_string()))?;
            (&s[..open], parse_type_params(params, depth)?)
        }
        None => {
            if s.contains('>') {
                return Err(TypeTagError::UnbalancedBrackets(s.to_string()));
            }
            (s, Vec::new())
        }
    };

    let parts: Vec<&str> = head.splitn(3, "::").collect();
    let [address, module, name] = parts[..] else {
        return Err(TypeTagError::InvalidStructTag(s.to_string()));
    };
    let module = module.trim();
    let name = name.trim();
    check_identifier(module)?;
    check_identifier(name)?;

    Ok(StructTag::new(parse_address(address)?, module, name, type_args))
}

/// Split on commas at bracket depth zero and parse each piece
fn parse_type_params(params: &str, depth: usize) -> Result<Vec<TypeTag>, TypeTagError> {
    let mut out = Vec::new();
    let mut level = 0usize;
    let mut start = 0;
    for (i, c) in params.char_indices() {
        match c {
            '<' => level += 1,
            '>' => {
                level = level
                    .checked_sub(1)
                    .ok_or_else(|| TypeTagError::UnbalancedBrackets(params.to_string()))?;
            }
            ',' if level == 0 => {
                out.push(parse_type_param(&params[start..i], params, depth)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if level != 0 {
        return Err(TypeTagError::UnbalancedBrackets(params.to_string()));
    }
    out.push(parse_type_param(&params[start..], params, depth)?);
    Ok(out)
}

fn parse_type_param(piece: &str, params: &str, depth: usize) -> Result<TypeTag, TypeTagError> {
    if piece.trim().is_empty() {
        return Err(TypeTagError::EmptyTypeParam(params.to_string()));
    }
    parse_nested(piece, depth + 1)
}

fn parse_address(s: &str) -> Result<AccountAddress, TypeTagError> {
    let s = s.trim();
    AccountAddress::from_hex(s).map_err(|source| TypeTagError::InvalidAddress {
        fragment: s.to_string(),
        source,
    })
}

/// Move identifier: `[A-Za-z_][A-Za-z0-9_]*`, not a lone underscore
fn check_identifier(s: &str) -> Result<(), TypeTagError> {
    let mut chars = s.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('_') => s.len() > 1,
        _ => false,
    } && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(TypeTagError::InvalidIdentifier(s.to_string()))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de;

    macro_rules! string_serde {
        ($($ty:ty),*) => {
            $(
                impl serde::Serialize for $ty {
                    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                        serializer.collect_str(self)
                    }
                }

                impl<'de> serde::Deserialize<'de> for $ty {
                    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                        s.parse().map_err(de::Error::custom)
                    }
                }
            )*
        };
    }

    string_serde!(TypeTag, StructTag, ModuleId);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_store() -> TypeTag {
        TypeTag::new_struct(StructTag::new(
            AccountAddress::ONE,
            "coin",
            "CoinStore",
            vec![TypeTag::aptos_coin()],
        ))
    }

    // ==================== Parsing ====================

    #[test]
    fn test_parse_primitives() {
        let cases = [
            ("bool", TypeTag::Bool),
            ("u8", TypeTag::U8),
            ("u16", TypeTag::U16),
            ("u32", TypeTag::U32),
            ("u64", TypeTag::U64),
            ("u128", TypeTag::U128),
            ("u256", TypeTag::U256),
            ("address", TypeTag::Address),
            ("signer", TypeTag::Signer),
        ];
        for (text, tag) in cases {
            assert_eq!(text.parse::<TypeTag>().unwrap(), tag);
            assert_eq!(tag.to_string(), text);
        }
    }

    #[test]
    fn test_parse_nested_vector() {
        let tag: TypeTag = " vector< vector<u8> > ".parse().unwrap();
        assert_eq!(tag, TypeTag::vector(TypeTag::vector(TypeTag::U8)));
        assert_eq!(tag.to_string(), "vector<vector<u8>>");
    }

    #[test]
    fn test_parse_struct_with_params() {
        let tag: TypeTag = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>".parse().unwrap();
        assert_eq!(tag, coin_store());
        assert_eq!(tag.to_string(), "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>");
    }

    #[test]
    fn test_parse_multiple_params_splits_at_top_level() {
        let tag: TypeTag = "0x1::pool::Pair<vector<u8>, 0x2::m::S<u64, bool>>".parse().unwrap();
        let TypeTag::Struct(tag) = tag else {
            panic!("expected struct");
        };
        assert_eq!(tag.address, AccountAddress::ONE);
        assert_eq!(tag.type_args.len(), 2);
        assert_eq!(tag.type_args[0], TypeTag::vector(TypeTag::U8));
        assert_eq!(tag.type_args[1].to_string(), "0x2::m::S<u64, bool>");
    }

    #[test]
    fn test_parse_pads_short_address() {
        let tag: StructTag = "0xa::m::S".parse().unwrap();
        assert_eq!(tag.address.as_bytes()[31], 0x0a);
        assert_eq!(tag.to_string(), "0xa::m::S");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<TypeTag>(), Err(TypeTagError::Empty));
        assert!(matches!(
            "invalid::type".parse::<TypeTag>(),
            Err(TypeTagError::InvalidStructTag(_))
        ));
        assert!(matches!(
            "0x1::coin::CoinStore<u8".parse::<TypeTag>(),
            Err(TypeTagError::UnbalancedBrackets(_))
        ));
        assert!(matches!(
            "0x1::m::S<u8>>".parse::<TypeTag>(),
            Err(TypeTagError::UnbalancedBrackets(_))
        ));
        assert!(matches!(
            "0x1::m::S<>".parse::<TypeTag>(),
            Err(TypeTagError::EmptyTypeParam(_))
        ));
        assert!(matches!(
            "0x1::m::S<u8,>".parse::<TypeTag>(),
            Err(TypeTagError::EmptyTypeParam(_))
        ));
        assert!(matches!(
            "0xzz::m::S".parse::<TypeTag>(),
            Err(TypeTagError::InvalidAddress { .. })
        ));
        assert!(matches!(
            "0x1::m::9S".parse::<TypeTag>(),
            Err(TypeTagError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            "0x1::a::b::c".parse::<TypeTag>(),
            Err(TypeTagError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_depth_limit() {
        let deep = format!("{}u8{}", "vector<".repeat(MAX_TYPE_TAG_DEPTH + 2), ">".repeat(MAX_TYPE_TAG_DEPTH + 2));
        assert_eq!(deep.parse::<TypeTag>(), Err(TypeTagError::TooDeep(MAX_TYPE_TAG_DEPTH)));
    }

    #[test]
    fn test_module_id() {
        let id: ModuleId = "0x1::aptos_account".parse().unwrap();
        assert_eq!(id, ModuleId::new(AccountAddress::ONE, "aptos_account"));
        assert_eq!(id.to_string(), "0x1::aptos_account");
        assert!("0x1".parse::<ModuleId>().is_err());
    }

    // ==================== BCS ====================

    #[test]
    fn test_bcs_vector_u8() {
        let bytes = aptos_bcs::serialize(&TypeTag::vector(TypeTag::U8)).unwrap();
        assert_eq!(bytes, vec![6, 1]);
    }

    #[test]
    fn test_bcs_discriminants() {
        for (tag, index) in [
            (TypeTag::U16, 8u8),
            (TypeTag::U32, 9),
            (TypeTag::U256, 10),
            (TypeTag::Signer, 5),
        ] {
            assert_eq!(aptos_bcs::serialize(&tag).unwrap(), vec![index]);
        }
    }

    #[test]
    fn test_bcs_struct_roundtrip() {
        let tag = coin_store();
        let bytes = aptos_bcs::serialize(&tag).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(&bytes[1..33], AccountAddress::ONE.as_bytes());
        assert_eq!(aptos_bcs::deserialize::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn test_bcs_unknown_variant() {
        assert_eq!(
            aptos_bcs::deserialize::<TypeTag>(&[11]),
            Err(BcsError::UnknownVariant {
                type_name: "TypeTag",
                index: 11
            })
        );
    }

    #[test]
    fn test_bcs_depth_limit() {
        let mut bytes = vec![6u8; MAX_TYPE_TAG_DEPTH + 2];
        bytes.push(1);
        assert!(matches!(
            aptos_bcs::deserialize::<TypeTag>(&bytes),
            Err(BcsError::Custom(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_string_form() {
        let json = serde_json::to_string(&coin_store()).unwrap();
        assert_eq!(json, "\"0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>\"");
        let back: TypeTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coin_store());
    }
}

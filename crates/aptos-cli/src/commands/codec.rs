//! Offline encoding helpers: `parse-type`, `address`, `encode-arg`

use std::str::FromStr;

use aptos_primitives::{AccountAddress, U256};
use aptos_types::args;
use aptos_types::parse_type_tag;

use crate::{output::Output, CliError};

/// Canonical form and BCS hex of a type tag
pub fn parse_type(input: &str) -> Result<(String, String), CliError> {
    let tag = parse_type_tag(input)?;
    let bcs = aptos_bcs::serialize(&tag).map_err(aptos_types::TypesError::from)?;
    Ok((tag.to_string(), hex::encode(bcs)))
}

/// `parse-type <tag>`
pub fn run_parse_type(input: &str, json: bool) -> Result<(), CliError> {
    let (canonical, bcs) = parse_type(input)?;
    Output::new(json)
        .field("type", &canonical)
        .field("bcs", &bcs)
        .message(&format!("{}\nbcs: 0x{}", canonical, bcs))
        .print();
    Ok(())
}

/// `address <hex>`
pub fn run_address(input: &str, json: bool) -> Result<(), CliError> {
    let address = AccountAddress::from_hex(input)?;
    Output::new(json)
        .field("long", &address.to_hex())
        .field("short", &address.short_string())
        .message(&format!("long:  {}\nshort: {}", address.to_hex(), address.short_string()))
        .print();
    Ok(())
}

fn parse<T: FromStr>(ty: &str, value: &str) -> Result<T, CliError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CliError::InvalidInput(format!("invalid {ty} '{value}': {e}")))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// BCS bytes of an entry-function argument
///
/// Supported types: `bool`, `u8` .. `u256`, `address`, `string`,
/// `vector<u8>` (hex), `vector<u64>`, `vector<address>` and `vector<string>`
/// (comma separated).
pub fn encode_arg(ty: &str, value: &str) -> Result<Vec<u8>, CliError> {
    let bytes = match ty.trim() {
        "bool" => args::bool_arg(parse(ty, value)?),
        "u8" => args::u8_arg(parse(ty, value)?),
        "u16" => args::u16_arg(parse(ty, value)?),
        "u32" => args::u32_arg(parse(ty, value)?),
        "u64" => args::u64_arg(parse(ty, value)?),
        "u128" => args::u128_arg(parse(ty, value)?),
        "u256" => {
            let v: U256 = parse(ty, value)?;
            args::try_u256_arg(&v).map_err(|e| CliError::InvalidInput(e.to_string()))?
        }
        "address" => args::address_arg(&AccountAddress::from_hex(value)?),
        "string" | "0x1::string::String" => args::string_arg(value),
        "vector<u8>" => {
            let digits = value.trim().strip_prefix("0x").unwrap_or(value.trim());
            let raw = hex::decode(digits)
                .map_err(|e| CliError::InvalidInput(format!("invalid hex '{value}': {e}")))?;
            args::bytes_arg(&raw)
        }
        "vector<u64>" => {
            let values = split_list(value)
                .map(|v| parse::<u64>("u64", v))
                .collect::<Result<Vec<_>, _>>()?;
            args::vector_u64_arg(&values)
        }
        "vector<address>" => {
            let addrs = split_list(value)
                .map(AccountAddress::from_hex)
                .collect::<Result<Vec<_>, _>>()?;
            args::vector_address_arg(&addrs)
        }
        "vector<string>" | "vector<0x1::string::String>" => {
            let values: Vec<&str> = split_list(value).collect();
            args::vector_string_arg(&values)
        }
        other => {
            return Err(CliError::InvalidInput(format!(
                "unsupported argument type: {other}"
            )))
        }
    };
    Ok(bytes)
}

/// `encode-arg <type> <value>`
pub fn run_encode_arg(ty: &str, value: &str, json: bool) -> Result<(), CliError> {
    let encoded = hex::encode(encode_arg(ty, value)?);
    Output::new(json)
        .field("type", ty)
        .field("bcs", &encoded)
        .message(&format!("0x{}", encoded))
        .print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse-type ====================

    #[test]
    fn test_parse_type_canonicalizes() {
        let (canonical, bcs) = parse_type(" vector< u8 > ").unwrap();
        assert_eq!(canonical, "vector<u8>");
        assert_eq!(bcs, "0601");

        let (canonical, _) =
            parse_type("0x0001::coin::CoinStore<0x1::aptos_coin::AptosCoin>").unwrap();
        assert_eq!(canonical, "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>");
    }

    #[test]
    fn test_parse_type_rejects_garbage() {
        assert!(parse_type("invalid::type").is_err());
        assert!(parse_type("vector<u8").is_err());
    }

    // ==================== encode-arg ====================

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode_arg("bool", "true").unwrap(), vec![1]);
        assert_eq!(encode_arg("u16", "258").unwrap(), vec![2, 1]);
        assert_eq!(encode_arg("u64", "1000").unwrap(), 1000u64.to_le_bytes().to_vec());
        assert_eq!(encode_arg("u128", "1").unwrap().len(), 16);
        assert_eq!(encode_arg("u256", "1").unwrap()[0], 1);
        assert_eq!(encode_arg("address", "0x1").unwrap().len(), 32);
    }

    #[test]
    fn test_encode_composites() {
        assert_eq!(encode_arg("string", "hi").unwrap(), vec![2, b'h', b'i']);
        assert_eq!(encode_arg("vector<u8>", "0xcafe").unwrap(), vec![2, 0xca, 0xfe]);
        assert_eq!(encode_arg("vector<u64>", "1, 2").unwrap().len(), 17);
        assert_eq!(encode_arg("vector<u64>", "").unwrap(), vec![0]);
        assert_eq!(encode_arg("vector<address>", "0x1,0x2").unwrap().len(), 65);
        assert_eq!(
            encode_arg("vector<string>", "a,bc").unwrap(),
            vec![2, 1, b'a', 2, b'b', b'c']
        );
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert!(encode_arg("u8", "256").is_err());
        assert!(encode_arg("bool", "yes").is_err());
        assert!(encode_arg("u256", "-1").is_err());
        assert!(encode_arg("address", "0xzz").is_err());
        assert!(encode_arg("signer", "0x1").is_err());
    }
}

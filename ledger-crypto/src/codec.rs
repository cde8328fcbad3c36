//! Decimal-string encoding for arbitrary-precision integers.
//!
//! Moduli, ciphertexts and recovered totals routinely exceed 64 bits, so every big integer
//! that leaves the crate is written as a base-10 string.

use crate::errors::LedgerCryptoError;

use num_bigint::BigUint;

/// Parses a non-empty string of ASCII digits.
///
/// # Example
///
/// ```
/// # use ledger_crypto::codec::parse_decimal;
/// # use num_bigint::BigUint;
/// assert_eq!(parse_decimal("1022117").unwrap(), BigUint::from(1_022_117u32));
/// assert!(parse_decimal("").is_err());
/// assert!(parse_decimal("-5").is_err());
/// assert!(parse_decimal("0x1f").is_err());
/// ```
pub fn parse_decimal(input: &str) -> Result<BigUint, LedgerCryptoError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerCryptoError::InvalidParameters(format!(
            "`{}` is not a decimal integer",
            input
        )));
    }

    BigUint::parse_bytes(input.as_bytes(), 10).ok_or_else(|| {
        LedgerCryptoError::InvalidParameters(format!("`{}` is not a decimal integer", input))
    })
}

/// `#[serde(with = "codec::decimal")]` for `BigUint` fields.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_decimal(&raw).map_err(D::Error::custom)
    }
}

/// `#[serde(with = "codec::decimal_opt")]` for `Option<BigUint>` fields.
pub mod decimal_opt {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&v.to_str_radix(10)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_decimal(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "decimal")]
        value: BigUint,
        #[serde(with = "decimal_opt")]
        maybe: Option<BigUint>,
    }

    #[test]
    fn test_values_beyond_u64_are_strings() -> Result<(), LedgerCryptoError> {
        let big = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
        let wrapped = Wrapped {
            value: big.clone(),
            maybe: None,
        };

        let json = serde_json::to_string(&wrapped)?;
        assert_eq!(
            json,
            format!(r#"{{"value":"{}","maybe":null}}"#, big.to_str_radix(10))
        );
        assert_eq!(serde_json::from_str::<Wrapped>(&json)?, wrapped);
        Ok(())
    }

    #[test]
    fn test_rejects_numbers_and_garbage() {
        assert!(serde_json::from_str::<Wrapped>(r#"{"value":12,"maybe":null}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"value":"12a","maybe":null}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"value":"12","maybe":"x"}"#).is_err());
    }
}

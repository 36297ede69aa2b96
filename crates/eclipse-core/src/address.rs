//! Aleo address to field conversion.
//!
//! Mapping keys that combine an account with a feed are built as
//! `(address_field + feed_id)field`, where `address_field` is the address
//! payload read as a little-endian integer.

use crate::error::{CoreError, Result};
use alloy::primitives::U256;
use bech32::primitives::decode::CheckedHrpstring;
use bech32::Bech32m;

/// Human-readable part of every Aleo account address.
pub const ADDRESS_HRP: &str = "aleo";

/// Literal prefix (`hrp` + separator) every address must start with.
pub const ADDRESS_PREFIX: &str = "aleo1";

/// Decode a bech32m Aleo address into its field representation.
///
/// The decoded payload bytes are little-endian, so they are reversed before
/// being read as a big-endian integer.
///
/// # Errors
/// - [`CoreError::InvalidAddressPrefix`] if `address` does not start with `aleo1`
/// - [`CoreError::AddressDecode`] on a bad charset or checksum
/// - [`CoreError::AddressHrpMismatch`] if the decoded human-readable part is not `aleo`
pub fn convert_address_to_field(address: &str) -> Result<U256> {
    if !address.starts_with(ADDRESS_PREFIX) {
        return Err(CoreError::InvalidAddressPrefix {
            expected: ADDRESS_PREFIX,
        });
    }

    let checked = CheckedHrpstring::new::<Bech32m>(address)
        .map_err(|e| CoreError::AddressDecode(e.to_string()))?;

    let hrp = checked.hrp().to_string();
    if hrp != ADDRESS_HRP {
        return Err(CoreError::AddressHrpMismatch {
            expected: ADDRESS_HRP,
            actual: hrp,
        });
    }

    let mut bytes: Vec<u8> = checked.byte_iter().collect();
    if bytes.len() > 32 {
        return Err(CoreError::AddressPayloadTooLarge(bytes.len()));
    }
    bytes.reverse();

    Ok(U256::from_be_slice(&bytes))
}

//! Local input checks, run before any ledger call

use crate::core::{RedemptionError, RedemptionResult};

const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const MIN_ADDRESS_DATA_LEN: usize = 6;

/// Check that `address` looks like a Bech32m ledger address (`component_rdx1...`)
pub fn validate_component_address(address: &str) -> RedemptionResult<()> {
    if address.trim().is_empty() {
        return Err(RedemptionError::validation(
            "Component address must be a non-empty string",
        ));
    }

    let invalid = || {
        RedemptionError::validation(format!(
            "Component address {:?} is not a valid address",
            address
        ))
    };

    let (hrp, data) = address.rsplit_once('1').ok_or_else(invalid)?;
    let hrp_ok = hrp.contains('_')
        && hrp.starts_with(|c: char| c.is_ascii_lowercase())
        && hrp
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    let data_ok =
        data.len() >= MIN_ADDRESS_DATA_LEN && data.chars().all(|c| BECH32_CHARSET.contains(c));

    if hrp_ok && data_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

pub fn validate_receipt_id(id: &str) -> RedemptionResult<()> {
    if id.trim().is_empty() {
        return Err(RedemptionError::validation("NFT ID must be a non-empty string"));
    }
    Ok(())
}

/// A non-empty list of non-empty receipt ids
pub fn validate_receipt_ids(ids: &[String]) -> RedemptionResult<()> {
    if ids.is_empty() {
        return Err(RedemptionError::validation("NFT ID list must not be empty"));
    }
    ids.iter().try_for_each(|id| validate_receipt_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        for address in [
            "component_rdx1cpxz8j4q5ulccekt9ng9u2aaxszw0am9dhs8aqdmdv92jme0pc5kdy",
            "component_tdx_2_1crmw9yqwfaz9634qf3tw9s89zxnk8fxva958vg8mxxeuv9j6eqer2s",
        ] {
            assert!(validate_component_address(address).is_ok(), "{}", address);
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for address in [
            "",
            "   ",
            "hello world",
            "component_rdx",
            "Component_RDX1cpxz8j4q5ulccekt9ng9u2",
            "component_rdx1bio",
            "nounderscore1cpxz8j4q5ulccekt9ng9u2",
        ] {
            let err = validate_component_address(address).unwrap_err();
            assert!(matches!(err, RedemptionError::Validation(_)), "{}", address);
        }
    }

    #[test]
    fn test_receipt_id_must_be_non_empty() {
        assert!(validate_receipt_id("#12#").is_ok());
        assert!(validate_receipt_id(" ").is_err());
    }

    #[test]
    fn test_receipt_id_list() {
        assert!(validate_receipt_ids(&["#1#".to_string(), "#2#".to_string()]).is_ok());
        assert!(matches!(
            validate_receipt_ids(&[]),
            Err(RedemptionError::Validation(_))
        ));
        assert!(validate_receipt_ids(&["#1#".to_string(), "".to_string()]).is_err());
    }
}

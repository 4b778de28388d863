//! Fee Manager Module
//!
//! Basis-point fee charged on the debit side of an outbound transfer. The fee
//! is taken in the bridged token and moved to the configured fee deposit
//! address; inbound credits are never charged.
//!
//! ## Fee Formula
//!
//! ```text
//! fee       = floor(amount * fee_bps / 10000)
//! after_fee = amount - fee
//! ```
//!
//! `Uint128::multiply_ratio` widens to 256 bits internally so the product
//! cannot overflow.
//!
//! ## Debit View
//!
//! | Quantity   | Value                                                   |
//! |------------|---------------------------------------------------------|
//! | `received` | `remove_dust(apply_fee(amount))`                        |
//! | `sent`     | `amount` when a fee is charged, `received` otherwise    |
//! | `fee`      | `sent - received` (dust joins the fee when one is taken)|

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, Storage, Uint128};
use cw_storage_plus::Item;

use crate::address_codec::decode_bech32_address;
use crate::decimals::remove_dust;
use crate::error::ContractError;
use crate::state::OftReceipt;

// ============================================================================
// Constants
// ============================================================================

/// Maximum fee in basis points (100%)
pub const MAX_FEE_BPS: u16 = 10_000;

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

// ============================================================================
// Data Structures
// ============================================================================

/// Fee configuration parameters
#[cw_serde]
#[derive(Default)]
pub struct FeeConfig {
    /// Fee in basis points (0..=10000)
    pub fee_bps: u16,
    /// Address receiving collected fees (None = not configured)
    pub fee_deposit_address: Option<Addr>,
}

/// One line of a fee breakdown reported by quotes
#[cw_serde]
pub struct FeeDetail {
    /// Fee amount in local decimals
    pub fee_amount_ld: Uint128,
    pub description: String,
}

// ============================================================================
// Storage
// ============================================================================

/// Fee configuration storage
pub const FEE_CONFIG: Item<FeeConfig> = Item::new("fee_config");

// ============================================================================
// Fee Calculation Functions
// ============================================================================

/// Calculate fee amount from amount and bps
pub fn calculate_fee_from_bps(amount: Uint128, fee_bps: u16) -> Uint128 {
    amount.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR)
}

/// Amount left after the configured fee is deducted.
///
/// A fee deposit address must be configured even when `fee_bps` is zero.
pub fn apply_fee(config: &FeeConfig, amount: Uint128) -> Result<Uint128, ContractError> {
    if config.fee_deposit_address.is_none() {
        return Err(ContractError::InvalidFeeDepositAddress);
    }
    let fee = calculate_fee_from_bps(amount, config.fee_bps);
    Ok(amount.checked_sub(fee)?)
}

/// Compute the sent/received split for a debit of `amount_ld`.
pub fn debit_view(
    config: &FeeConfig,
    amount_ld: Uint128,
    min_amount_ld: Uint128,
    conversion_rate: Uint128,
) -> Result<OftReceipt, ContractError> {
    let after_fee = apply_fee(config, amount_ld)?;
    let amount_received_ld = remove_dust(after_fee, conversion_rate);

    let amount_sent_ld = if after_fee == amount_ld {
        amount_received_ld
    } else {
        amount_ld
    };

    if amount_received_ld < min_amount_ld {
        return Err(ContractError::SlippageExceeded {
            amount_received: amount_received_ld,
            min_amount: min_amount_ld,
        });
    }

    Ok(OftReceipt {
        amount_sent_ld,
        amount_received_ld,
    })
}

/// Fee breakdown for a receipt
pub fn fee_details(receipt: &OftReceipt) -> Vec<FeeDetail> {
    let fee_amount_ld = receipt.amount_sent_ld - receipt.amount_received_ld;
    if fee_amount_ld.is_zero() {
        return vec![];
    }
    vec![FeeDetail {
        fee_amount_ld,
        description: "OFT fee".to_string(),
    }]
}

// ============================================================================
// Address Helpers
// ============================================================================

/// True for the empty string and for bech32 addresses whose payload is all zero.
pub fn is_zero_address(addr: &str) -> bool {
    if addr.trim().is_empty() {
        return true;
    }
    match decode_bech32_address(addr) {
        Ok((_, raw)) => raw.iter().all(|b| *b == 0),
        Err(_) => false,
    }
}

// ============================================================================
// Admin Functions (to be called from execute handlers)
// ============================================================================

/// Set the fee rate
pub fn set_fee_bps(storage: &mut dyn Storage, fee_bps: u16) -> Result<FeeConfig, ContractError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(ContractError::InvalidFeeBps { fee_bps });
    }
    let mut config = FEE_CONFIG.load(storage)?;
    if config.fee_bps == fee_bps {
        return Err(ContractError::RedundantConfigValue {
            field: "fee_bps".to_string(),
        });
    }
    config.fee_bps = fee_bps;
    FEE_CONFIG.save(storage, &config)?;
    Ok(config)
}

/// Set the fee deposit address
pub fn set_fee_deposit_address(
    storage: &mut dyn Storage,
    api: &dyn Api,
    address: &str,
) -> Result<FeeConfig, ContractError> {
    if is_zero_address(address) {
        return Err(ContractError::InvalidFeeDepositAddress);
    }
    let address = api.addr_validate(address)?;
    let mut config = FEE_CONFIG.load(storage)?;
    if config.fee_deposit_address.as_ref() == Some(&address) {
        return Err(ContractError::RedundantConfigValue {
            field: "fee_deposit_address".to_string(),
        });
    }
    config.fee_deposit_address = Some(address);
    FEE_CONFIG.save(storage, &config)?;
    Ok(config)
}

//! Decimal normalization between local and shared precision.
//!
//! Amounts travel between chains in `shared_decimals`, the smallest precision
//! every chain of the mesh can represent. Converting down always truncates so a
//! sender is never debited for value that cannot be delivered.

use cosmwasm_std::Uint128;

use crate::error::ContractError;

/// Compute `10^(local_decimals - shared_decimals)`.
pub fn conversion_rate(local_decimals: u8, shared_decimals: u8) -> Result<Uint128, ContractError> {
    if shared_decimals > local_decimals {
        return Err(ContractError::InvalidLocalDecimals {
            local: local_decimals,
            shared: shared_decimals,
        });
    }
    10u128
        .checked_pow((local_decimals - shared_decimals) as u32)
        .map(Uint128::new)
        .ok_or(ContractError::InvalidLocalDecimals {
            local: local_decimals,
            shared: shared_decimals,
        })
}

/// Local amount to shared amount (floor).
pub fn to_shared(amount_ld: Uint128, rate: Uint128) -> Result<u64, ContractError> {
    let amount_sd = amount_ld.u128() / rate.u128();
    u64::try_from(amount_sd).map_err(|_| ContractError::AmountSdOverflow { amount_ld })
}

/// Shared amount to local amount (exact).
pub fn to_local(amount_sd: u64, rate: Uint128) -> Result<Uint128, ContractError> {
    Ok(Uint128::from(amount_sd).checked_mul(rate)?)
}

/// Floor a local amount to the nearest multiple representable in shared decimals.
pub fn remove_dust(amount_ld: Uint128, rate: Uint128) -> Uint128 {
    Uint128::new((amount_ld.u128() / rate.u128()) * rate.u128())
}

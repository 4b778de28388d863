//! Treasury strategies for the bridged cw20 token.
//!
//! The strategy is chosen at instantiation and never changes:
//!
//! - `MintBurn`: outbound transfers burn from the sender, inbound transfers
//!   mint to the recipient. The engine must be the token's minter.
//! - `EscrowRelease`: outbound transfers lock tokens in the engine, inbound
//!   transfers release them. `balance` tracks what is locked.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;
use cw_storage_plus::Item;

use crate::error::ContractError;

#[cw_serde]
pub enum Treasury {
    MintBurn {},
    EscrowRelease { balance: Uint128 },
}

/// Treasury storage
pub const TREASURY: Item<Treasury> = Item::new("treasury");

impl Treasury {
    pub fn kind(&self) -> &'static str {
        match self {
            Treasury::MintBurn {} => "mint_burn",
            Treasury::EscrowRelease { .. } => "escrow_release",
        }
    }

    /// Tokens currently locked by the engine (always zero for MintBurn)
    pub fn escrow_balance(&self) -> Uint128 {
        match self {
            Treasury::MintBurn {} => Uint128::zero(),
            Treasury::EscrowRelease { balance } => *balance,
        }
    }

    /// Take `amount` from `owner` out of circulation.
    ///
    /// Both strategies pull through the owner's cw20 allowance to the engine.
    pub fn debit(
        &mut self,
        token: &Addr,
        owner: &Addr,
        engine: &Addr,
        amount: Uint128,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        if amount.is_zero() {
            return Ok(vec![]);
        }
        let msg = match self {
            Treasury::MintBurn {} => Cw20ExecuteMsg::BurnFrom {
                owner: owner.to_string(),
                amount,
            },
            Treasury::EscrowRelease { balance } => {
                *balance = balance.checked_add(amount)?;
                Cw20ExecuteMsg::TransferFrom {
                    owner: owner.to_string(),
                    recipient: engine.to_string(),
                    amount,
                }
            }
        };
        Ok(vec![cw20_msg(token, &msg)?])
    }

    /// Put `amount` back into circulation for `recipient`.
    pub fn credit(
        &mut self,
        token: &Addr,
        recipient: &Addr,
        amount: Uint128,
    ) -> Result<Vec<CosmosMsg>, ContractError> {
        let msg = match self {
            Treasury::MintBurn {} => Cw20ExecuteMsg::Mint {
                recipient: recipient.to_string(),
                amount,
            },
            Treasury::EscrowRelease { balance } => {
                if *balance < amount {
                    return Err(ContractError::InsufficientEscrowBalance {
                        available: *balance,
                        requested: amount,
                    });
                }
                *balance -= amount;
                Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                }
            }
        };
        if amount.is_zero() {
            return Ok(vec![]);
        }
        Ok(vec![cw20_msg(token, &msg)?])
    }
}

/// Move the fee share of a debit from `owner` to the fee deposit address
pub fn collect_fee(
    token: &Addr,
    owner: &Addr,
    fee_deposit: &Addr,
    fee: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    if fee.is_zero() {
        return Ok(vec![]);
    }
    let msg = Cw20ExecuteMsg::TransferFrom {
        owner: owner.to_string(),
        recipient: fee_deposit.to_string(),
        amount: fee,
    };
    Ok(vec![cw20_msg(token, &msg)?])
}

fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}

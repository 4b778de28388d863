//! Execute handlers for the OFT engine contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `outgoing` - Send and the endpoint's ConfirmSend call-back
//! - `incoming` - LzReceive and LzReceiveWithCompose deliveries
//! - `config` - Peers, enforced options, rate limits and fees
//! - `admin` - Pause and endpoint registration

mod admin;
mod config;
mod incoming;
pub(crate) mod outgoing;

pub use admin::*;
pub use config::*;
pub use incoming::*;
pub use outgoing::*;

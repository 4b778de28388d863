//! Common - Shared Interfaces for the OFT Engine Contracts
//!
//! This package describes the external collaborators the transfer engine talks
//! to: the messaging channel (endpoint) and the composer registry, plus the
//! receive-execution metadata format registered with the channel.

pub mod composer;
pub mod endpoint;
pub mod receive_info;

pub use endpoint::{
    compute_guid, EndpointExecuteMsg, EndpointQueryMsg, MessagingFee, MessagingParams,
    MessagingReceipt, OAppExecuteMsg, Origin, SendRequest,
};

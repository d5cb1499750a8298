//! Wire protocol for Mintline nodes.
//!
//! Defines the HTTP endpoint paths and JSON message types exchanged between
//! a ledger node and its clients, and `HttpConnection`, the client-side
//! [`LedgerConnection`](mintline_ledger::LedgerConnection) that speaks them.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod message;

pub use client::HttpConnection;
pub use endpoint::{endpoints, HealthResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    AccountResponse, AirdropRequest, AirdropResponse, BlockhashResponse, BundleStatusResponse,
    ErrorResponse, RentResponse, SubmitBundleRequest, SubmitBundleResponse, PROTOCOL_VERSION,
};

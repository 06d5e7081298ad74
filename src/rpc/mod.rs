//! JSON-lines RPC bridge between a host process and the keyring.

pub mod bridge;
pub mod dispatch;
pub mod protocol;

pub use bridge::RpcBridge;

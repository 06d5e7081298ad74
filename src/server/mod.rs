//! Server module for keybroker
//!
//! Contains start-up and the bridge run loop.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Configuration checks and permission table build
//! - `cli`: Keyring builder for operator commands
//! - `init`: Bridge initialization and run loop

mod cli;
pub mod config;
mod init;
mod loader;
mod validation;

// Re-export public API
pub use cli::build_keyring_for_cli;
pub use init::run;

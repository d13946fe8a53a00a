//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule and exposes an `execute_*`
//! function taking an options struct.

pub mod check;
pub mod derive;
pub mod resolve;

pub use check::{execute_check, CheckOptions, ManifestReport};
pub use derive::{execute_derive, DeriveOptions};
pub use resolve::{execute_resolve, parse_key_value, ResolveOptions};

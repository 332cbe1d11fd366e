//! Checks that run before any installer process is started.
//!
//! - `blacklist` - installer arguments the build refuses to forward
//! - `gatekeeper` - argument list and output path validation
//! - `interpreter` - host discovery and shebang resolution

pub mod blacklist;
pub mod gatekeeper;
pub mod interpreter;

pub use blacklist::{ArgumentRule, Blacklist};
pub use gatekeeper::{gatekeep, VettedArgs};
pub use interpreter::{resolve_shebang, HostInterpreter, Shebang};

//! Top-level facade crate for notekeeper.
//!
//! Re-exports the core model and the server library so users can depend on a single crate.

pub mod core {
    pub use notekeeper_core::*;
}

pub mod server {
    pub use notekeeper_server::*;
}

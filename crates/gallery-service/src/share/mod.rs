//! Share links: expiry policy, code generation, lifecycle management, and
//! the public access gate.

pub mod access;
pub mod code;
pub mod expiry;
pub mod service;

pub use access::{AccessedShare, ShareAccessService};
pub use code::CodeGenerator;
pub use expiry::resolve_expiry;
pub use service::{CreateShareLinkRequest, ShareService};

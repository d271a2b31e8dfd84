//! Service layer for device administration on top of `models`.
//! - Handlers stay thin: permission checks, validation and projections live here.
//! - Every operation takes a `DatabaseConnection` and, where access matters, the `Requester`.

pub mod errors;
pub mod auth;
pub mod access;
pub mod device;
pub mod provision;
pub mod freespace;
pub mod instance;
pub mod device_info;
pub mod permissions;
pub mod sync_status;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

/// Version reported by the device and recorded in its instance identity.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod errors;
pub mod db;
pub mod collection;
pub mod facility_user;
pub mod user_credentials;
pub mod membership;
pub mod role;
pub mod device_settings;
pub mod device_permissions;
pub mod sync_session;
pub mod transfer_session;
pub mod user_sync_status;
pub mod network_location;
pub mod instance_id;

#[cfg(test)]
mod tests;

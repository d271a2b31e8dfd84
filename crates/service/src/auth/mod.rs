//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Facility users sign in with a username and password scoped to their facility;
//! a successful login yields an HS256 token carrying the user and facility ids.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;

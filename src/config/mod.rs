//! Configuration modules for the Meritboard API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables.
//!
//! # Modules
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL database connection pool initialization
//! - [`rate_limit`]: API rate limiting configuration

pub mod cors;
pub mod database;
pub mod rate_limit;

pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod seed;
pub mod srs;
pub mod state;
pub mod store;

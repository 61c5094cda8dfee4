// Library root for the mock KYC server

pub mod api;
pub mod auth;
pub mod callback;
pub mod config;
pub mod core;
pub mod engine;
pub mod infra;
pub mod metrics;
pub mod state;
pub mod utils;

pub mod config;
pub mod freshness;
pub mod reversal;

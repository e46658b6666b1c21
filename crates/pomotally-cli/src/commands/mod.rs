pub mod auth;
pub mod config;
pub mod export;
pub mod run;
pub mod stats;

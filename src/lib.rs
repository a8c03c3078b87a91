pub mod config;
pub mod draft_curve;
pub mod draft_dataset;
pub mod draft_value;
pub mod error;
pub mod logging;
pub mod lottery;
pub mod persist;
pub mod player;
pub mod portfolio;
pub mod trade;
pub mod valuation;

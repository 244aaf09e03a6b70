pub mod config;
pub mod error;
pub mod fpl_api;
pub mod history;
pub mod http_client;
pub mod metrics;
pub mod normalize;
pub mod player;
pub mod render;
pub mod report;
pub mod season;

pub use error::{FplError, Result, SchemaError};

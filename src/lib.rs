//! DEaaS dashboard: terminal views over the hotel energy REST API.
//! - `api`: HTTP helper and typed client for hotels, panels, inverters and tanks.
//! - `commands`: one handler per list/detail page action.
//! - `watch`: 5 s poll loop driving the client-side SOC estimate.
//! - `render`: text tables for both pages.
//! - `config`: defaults, optional YAML file, env vars, flags.

pub mod api;
pub mod commands;
pub mod config;
pub mod render;
pub mod watch;

pub use api::{ApiClient, ApiError};
pub use config::DashboardConfig;

//! Shared hotel installation types and client-side battery logic.
//! Keep this crate free of HTTP deps so the dashboard binary and its tests can reuse it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod detail;
pub mod format;
mod lenient;
pub mod soc;
pub mod summary;

pub use detail::HotelDetail;
pub use format::{Eta, fmt_kw, fmt_kwh, format_hours, num};
pub use soc::SocIntegrator;
pub use summary::HotelSummary;

/// Hotel ids and child ids are plain integers on the remote API.
pub type Id = i64;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Hotel {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Id,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: String,
    /// Usable battery capacity in Wh.
    #[serde(default, deserialize_with = "lenient::number")]
    pub battery_capacity: Option<f64>,
    /// Site demand in W.
    #[serde(default, deserialize_with = "lenient::number")]
    pub demand: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub panels: Vec<Panel>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub inverters: Vec<Inverter>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub tanks: Vec<Tank>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Panel {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Id,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub voltage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub power: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub thermal_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Inverter {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Id,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ac_output: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub fault: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Tank {
    #[serde(deserialize_with = "lenient::id")]
    pub id: Id,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub thermal_input: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub location: String,
}

impl NewHotel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::Missing("location"));
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NewPanel {
    pub hotel_id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermal_power: Option<f64>,
}

impl NewPanel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NewInverter {
    pub hotel_id: Id,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac_output: Option<f64>,
    pub fault: bool,
}

impl NewInverter {
    /// Form defaults: enabled, no fault, no readings.
    pub fn for_hotel(hotel_id: Id) -> Self {
        Self {
            hotel_id,
            enabled: true,
            total_power: None,
            ac_output: None,
            fault: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NewTank {
    pub hotel_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermal_input: Option<f64>,
}

/// Body of `PUT /panels/{id}/power`. The API expects 0/1, not a JSON bool.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PanelPower {
    pub enabled: u8,
}

impl PanelPower {
    /// Payload that flips the panel's current state.
    pub fn toggle(panel: &Panel) -> Self {
        Self {
            enabled: if panel.enabled { 0 } else { 1 },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
}

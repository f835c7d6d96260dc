//! Display helpers for power/energy readings and time-to-full/empty estimates.

use std::fmt;

/// Placeholder for readings that are missing or not a number.
pub const MISSING: &str = "—";

/// Two-decimal reading, or the missing placeholder.
pub fn num(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", round_half_up(v, 100.0)),
        _ => MISSING.to_string(),
    }
}

pub fn fmt_kw(watts: f64) -> String {
    format!("{:.2} kW", round_half_up(finite_or_zero(watts) / 1000.0, 100.0))
}

pub fn fmt_kwh(wh: f64) -> String {
    format!("{:.2} kWh", round_half_up(finite_or_zero(wh) / 1000.0, 100.0))
}

pub fn direction(net_w: f64) -> &'static str {
    if net_w >= 0.0 { "charging" } else { "discharging" }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Round to `1 / scale` with ties away from zero; `{:.N}` alone rounds ties to even.
fn round_half_up(v: f64, scale: f64) -> f64 {
    (v * scale).round() / scale
}

/// Human duration: minutes under an hour, tenths of hours under a day, else days + hours.
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours < 0.0 {
        return MISSING.to_string();
    }
    if hours < 1.0 {
        return format!("{} min", (hours * 60.0).round());
    }
    if hours < 24.0 {
        return format!("{:.1} h", round_half_up(hours, 10.0));
    }
    let days = (hours / 24.0).floor();
    let rem = hours - days * 24.0;
    format!("{days} d {} h", rem.round())
}

/// Time until the battery fills or drains at the current net flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eta {
    Stable,
    ToFull { hours: f64 },
    ToEmpty { hours: f64 },
}

impl Eta {
    pub fn estimate(soc_wh: f64, capacity_wh: f64, net_w: f64) -> Self {
        if capacity_wh == 0.0 || capacity_wh.is_nan() || !net_w.is_finite() || net_w == 0.0 {
            return Eta::Stable;
        }
        if net_w > 0.0 {
            let remaining = (capacity_wh - soc_wh).max(0.0);
            Eta::ToFull {
                hours: remaining / net_w,
            }
        } else {
            Eta::ToEmpty {
                hours: soc_wh / net_w.abs(),
            }
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Stable => f.write_str("Stable (no net flow)."),
            Eta::ToFull { hours } => {
                write!(f, "~{} to full at current rate.", format_hours(*hours))
            }
            Eta::ToEmpty { hours } => {
                write!(f, "~{} to empty at current rate.", format_hours(*hours))
            }
        }
    }
}

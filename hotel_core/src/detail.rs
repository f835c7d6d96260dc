//! State behind the hotel detail view: the cached hotel, the last error, the
//! SOC estimate and any in-flight panel toggle.

use chrono::{DateTime, Utc};

use crate::soc::{SocIntegrator, fill_pct, soc_pct};
use crate::{Eta, Hotel, HotelSummary, Id};

#[derive(Clone, Debug)]
pub struct HotelDetail {
    hotel_id: Id,
    hotel: Option<Hotel>,
    error: Option<String>,
    soc: SocIntegrator,
    toggling: Option<Id>,
}

impl HotelDetail {
    pub fn new(hotel_id: Id) -> Self {
        Self {
            hotel_id,
            hotel: None,
            error: None,
            soc: SocIntegrator::new(),
            toggling: None,
        }
    }

    pub fn hotel_id(&self) -> Id {
        self.hotel_id
    }

    pub fn hotel(&self) -> Option<&Hotel> {
        self.hotel.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn soc(&self) -> &SocIntegrator {
        &self.soc
    }

    /// Point the view at another hotel. The SOC estimate never carries over.
    pub fn switch_to(&mut self, hotel_id: Id) {
        if hotel_id == self.hotel_id {
            return;
        }
        tracing::debug!(from = self.hotel_id, to = hotel_id, "switching hotel view");
        *self = Self::new(hotel_id);
    }

    pub fn begin_load(&mut self) {
        self.error = None;
    }

    /// Apply the outcome of one fetch. Failures keep the last good hotel and SOC.
    pub fn finish_load(&mut self, result: Result<Hotel, String>, now: DateTime<Utc>) {
        match result {
            Ok(hotel) => {
                let summary = HotelSummary::of(&hotel);
                self.soc.observe(summary.capacity_wh, summary.net_w, now);
                self.hotel = Some(hotel);
            }
            Err(message) => {
                tracing::warn!(hotel_id = self.hotel_id, %message, "hotel load failed");
                self.error = Some(message);
            }
        }
    }

    /// Record a failure that did not come from a load (create/toggle).
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn begin_toggle(&mut self, panel_id: Id) {
        self.toggling = Some(panel_id);
    }

    pub fn end_toggle(&mut self) {
        self.toggling = None;
    }

    pub fn is_toggling(&self, panel_id: Id) -> bool {
        self.toggling == Some(panel_id)
    }

    /// Label for a panel's ON/OFF action button.
    pub fn toggle_label(&self, panel_id: Id, enabled: bool) -> &'static str {
        if self.is_toggling(panel_id) {
            "Working…"
        } else if enabled {
            "Turn OFF"
        } else {
            "Turn ON"
        }
    }

    /// Snapshot of everything the stats block needs, or `None` before the first successful load.
    pub fn stats(&self) -> Option<DetailStats> {
        let hotel = self.hotel.as_ref()?;
        let summary = HotelSummary::of(hotel);
        let soc_wh = self.soc.soc_wh();
        Some(DetailStats {
            soc_wh,
            soc_pct: soc_pct(soc_wh, summary.capacity_wh),
            fill_pct: fill_pct(soc_wh, summary.capacity_wh),
            eta: Eta::estimate(soc_wh, summary.capacity_wh, summary.net_w),
            summary,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetailStats {
    pub summary: HotelSummary,
    pub soc_wh: f64,
    pub soc_pct: f64,
    pub fill_pct: f64,
    pub eta: Eta,
}

//! Client-side battery state-of-charge estimate.
//!
//! The API reports capacity, demand and inverter output but not the charge
//! level itself, so the dashboard integrates net power over wall-clock time
//! between polls. The estimate lives only for the current view.

use chrono::{DateTime, Utc};

/// Leaky integrator over net power (W) producing an SOC estimate in Wh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SocIntegrator {
    soc_wh: f64,
    seeded: bool,
    last_tick: Option<DateTime<Utc>>,
}

impl SocIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soc_wh(&self) -> f64 {
        self.soc_wh
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        self.last_tick
    }

    /// Forget everything; used when the viewed hotel changes.
    pub fn reset(&mut self) {
        self.soc_wh = 0.0;
        self.seeded = false;
        self.last_tick = None;
    }

    /// Fold one successful fetch into the estimate and return the new SOC (Wh).
    ///
    /// `net_w` is inverter AC output minus demand; positive charges the battery.
    pub fn observe(&mut self, capacity_wh: f64, net_w: f64, now: DateTime<Utc>) -> f64 {
        if !(capacity_wh > 0.0 && capacity_wh.is_finite()) {
            self.seeded = false;
            self.last_tick = Some(now);
            self.soc_wh = 0.0;
            return self.soc_wh;
        }

        if !self.seeded {
            if self.soc_wh <= 0.0 {
                self.soc_wh = (capacity_wh * 0.5).max(1.0);
            }
            self.seeded = true;
            tracing::debug!(capacity_wh, soc_wh = self.soc_wh, "seeded soc estimate");
        } else if let Some(last) = self.last_tick {
            let dt_hours = (now - last).num_milliseconds() as f64 / 3_600_000.0;
            if dt_hours > 0.0 && net_w.is_finite() {
                self.soc_wh += net_w * dt_hours;
            }
        }
        self.last_tick = Some(now);
        self.soc_wh = self.soc_wh.clamp(0.0, capacity_wh);
        self.soc_wh
    }

    /// Whole-number percentage of capacity; 0 when capacity is unknown or not positive.
    pub fn soc_pct(&self, capacity_wh: f64) -> f64 {
        soc_pct(self.soc_wh, capacity_wh)
    }
}

pub fn soc_pct(soc_wh: f64, capacity_wh: f64) -> f64 {
    if !(capacity_wh > 0.0 && capacity_wh.is_finite()) {
        return 0.0;
    }
    (soc_wh / capacity_wh * 100.0).round()
}

/// Battery bar fill in percent, always within [0, 100].
pub fn fill_pct(soc_wh: f64, capacity_wh: f64) -> f64 {
    if !(capacity_wh > 0.0 && capacity_wh.is_finite()) {
        return 0.0;
    }
    (soc_wh / capacity_wh * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_fetch_seeds_half_capacity() {
        let mut soc = SocIntegrator::new();
        assert_eq!(soc.observe(10_000.0, 2_000.0, t0()), 5_000.0);
        assert!(soc.is_seeded());
        assert_eq!(soc.last_tick(), Some(t0()));
    }

    #[test]
    fn seeds_once_then_integrates() {
        let mut soc = SocIntegrator::new();
        soc.observe(10_000.0, 1_000.0, t0());
        // One hour at +1 kW adds 1 kWh rather than re-seeding.
        let after = soc.observe(10_000.0, 1_000.0, t0() + Duration::hours(1));
        assert!((after - 6_000.0).abs() < 1e-9);
        // Half an hour at -2 kW removes 1 kWh.
        let after = soc.observe(10_000.0, -2_000.0, t0() + Duration::minutes(90));
        assert!((after - 5_000.0).abs() < 1e-9);
    }

    #[test]
    fn never_leaves_capacity_bounds() {
        let mut soc = SocIntegrator::new();
        soc.observe(4_000.0, 0.0, t0());
        let full = soc.observe(4_000.0, 50_000.0, t0() + Duration::hours(2));
        assert_eq!(full, 4_000.0);
        let empty = soc.observe(4_000.0, -50_000.0, t0() + Duration::hours(4));
        assert_eq!(empty, 0.0);

        let mut cur = t0() + Duration::hours(4);
        for (i, net) in [3_000.0, -7_000.0, 12_500.0, -900.0, 0.0].iter().enumerate() {
            cur += Duration::minutes(17 * (i as i64 + 1));
            let v = soc.observe(4_000.0, *net, cur);
            assert!((0.0..=4_000.0).contains(&v), "soc {v} escaped bounds");
        }
    }

    #[test]
    fn one_wh_floor_still_respects_tiny_capacity() {
        let mut soc = SocIntegrator::new();
        assert_eq!(soc.observe(0.5, 0.0, t0()), 0.5);
        let mut soc = SocIntegrator::new();
        assert_eq!(soc.observe(1.5, 0.0, t0()), 1.0);
    }

    #[test]
    fn shrinking_capacity_clamps_immediately() {
        let mut soc = SocIntegrator::new();
        soc.observe(10_000.0, 0.0, t0());
        assert_eq!(soc.observe(2_000.0, 0.0, t0()), 2_000.0);
    }

    #[test]
    fn non_positive_capacity_resets_and_allows_reseed() {
        let mut soc = SocIntegrator::new();
        soc.observe(10_000.0, 500.0, t0());
        soc.observe(10_000.0, 500.0, t0() + Duration::hours(1));

        assert_eq!(soc.observe(0.0, 500.0, t0() + Duration::hours(2)), 0.0);
        assert!(!soc.is_seeded());
        assert_eq!(soc.last_tick(), Some(t0() + Duration::hours(2)));

        // Capacity comes back: seed again rather than integrate from zero.
        assert_eq!(
            soc.observe(8_000.0, 500.0, t0() + Duration::hours(3)),
            4_000.0
        );
    }

    #[test]
    fn non_finite_net_or_clock_skew_only_moves_the_tick() {
        let mut soc = SocIntegrator::new();
        soc.observe(10_000.0, 0.0, t0());

        let v = soc.observe(10_000.0, f64::NAN, t0() + Duration::hours(1));
        assert_eq!(v, 5_000.0);
        assert_eq!(soc.last_tick(), Some(t0() + Duration::hours(1)));

        let v = soc.observe(10_000.0, 1_000.0, t0());
        assert_eq!(v, 5_000.0);
        assert_eq!(soc.last_tick(), Some(t0()));
    }

    #[test]
    fn reset_clears_state() {
        let mut soc = SocIntegrator::new();
        soc.observe(10_000.0, 0.0, t0());
        soc.reset();
        assert_eq!(soc, SocIntegrator::new());
    }

    #[test]
    fn percentages() {
        assert_eq!(soc_pct(2_500.0, 10_000.0), 25.0);
        assert_eq!(soc_pct(3_333.0, 10_000.0), 33.0);
        assert_eq!(soc_pct(100.0, 0.0), 0.0);
        let negative = soc_pct(0.0, -5_000.0);
        assert!(negative == 0.0 && negative.is_sign_positive());
        assert_eq!(format!("{negative:.0}%"), "0%");
        assert_eq!(fill_pct(0.0, -5_000.0), 0.0);
        assert_eq!(fill_pct(12_000.0, 10_000.0), 100.0);
        assert_eq!(fill_pct(-5.0, 10_000.0), 0.0);
        assert_eq!(fill_pct(5.0, 0.0), 0.0);
    }
}

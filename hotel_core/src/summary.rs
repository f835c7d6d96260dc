use crate::Hotel;

/// Aggregates shown on the hotel detail view. Missing readings count as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HotelSummary {
    pub panel_count: usize,
    pub inverter_count: usize,
    pub tank_count: usize,
    pub total_panel_power_w: f64,
    pub total_inverter_ac_w: f64,
    pub capacity_wh: f64,
    pub demand_w: f64,
    /// Inverter AC output minus demand; positive means the battery is charging.
    pub net_w: f64,
}

impl HotelSummary {
    pub fn of(hotel: &Hotel) -> Self {
        let total_panel_power_w: f64 = hotel.panels.iter().map(|p| p.power.unwrap_or(0.0)).sum();
        let total_inverter_ac_w: f64 = hotel
            .inverters
            .iter()
            .map(|inv| inv.ac_output.unwrap_or(0.0))
            .sum();
        let demand_w = hotel.demand.unwrap_or(0.0);
        Self {
            panel_count: hotel.panels.len(),
            inverter_count: hotel.inverters.len(),
            tank_count: hotel.tanks.len(),
            total_panel_power_w,
            total_inverter_ac_w,
            capacity_wh: hotel.battery_capacity.unwrap_or(0.0),
            demand_w,
            net_w: total_inverter_ac_w - demand_w,
        }
    }
}

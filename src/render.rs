//! Text views for the hotel list and the hotel detail page.

use comfy_table::{Attribute, Cell, CellAlignment, Table, presets::UTF8_FULL};
use hotel_core::{Hotel, HotelDetail, fmt_kw, fmt_kwh, format::direction, num};

const BAR_WIDTH: usize = 30;

fn table_with_header(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn empty_row(table: &mut Table, message: &str) {
    table.add_row(vec![
        Cell::new(message)
            .add_attribute(Attribute::Dim)
            .set_alignment(CellAlignment::Center),
    ]);
}

/// Hotel list with the command that opens each detail view.
pub fn hotel_list(hotels: &[Hotel]) -> String {
    let mut table = table_with_header(&["ID", "Name", "Location", "Open"]);
    for h in hotels {
        table.add_row(vec![
            Cell::new(h.id),
            Cell::new(&h.name),
            Cell::new(&h.location),
            Cell::new(format!("deaas watch {}", h.id)),
        ]);
    }
    if hotels.is_empty() {
        empty_row(&mut table, "No hotels yet");
    }
    format!("Hotels\n{table}\n")
}

/// Text battery gauge, e.g. `[##########--------------------]`.
pub fn battery_bar(fill_pct: f64) -> String {
    let filled = ((fill_pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH.saturating_sub(filled))
    )
}

pub fn hotel_detail(view: &HotelDetail) -> String {
    let (Some(hotel), Some(stats)) = (view.hotel(), view.stats()) else {
        let mut out = String::from("Loading…\n");
        if let Some(err) = view.error() {
            out.push_str(&format!("error: {err}\n"));
        }
        return out;
    };
    let s = stats.summary;

    let mut out = String::new();
    out.push_str(&format!("{} ({})\n\n", hotel.name, hotel.location));

    out.push_str(&format!(
        "Panels: {}   Inverters: {}   Tanks: {}\n",
        s.panel_count, s.inverter_count, s.tank_count
    ));
    out.push_str(&format!(
        "Sum Panel Power: {}   Sum Inverter AC: {}\n",
        fmt_kw(s.total_panel_power_w),
        fmt_kw(s.total_inverter_ac_w)
    ));
    out.push_str(&format!("Battery Capacity: {}\n", fmt_kwh(s.capacity_wh)));
    out.push_str(&format!(
        "SOC: {} ({}%)   Demand: {} W   Net Power: {} W {}\n",
        fmt_kwh(stats.soc_wh),
        stats.soc_pct,
        num(Some(s.demand_w)),
        num(Some(s.net_w)),
        direction(s.net_w)
    ));
    out.push_str(&format!("{}\n", battery_bar(stats.fill_pct)));
    out.push_str(&format!("{}\n", stats.eta));
    if let Some(err) = view.error() {
        out.push_str(&format!("error: {err}\n"));
    }

    out.push_str(&format!("\nPanels\n{}\n", panel_table(view, hotel)));
    out.push_str(&format!("\nInverters\n{}\n", inverter_table(hotel)));
    out.push_str(&format!("\nTanks\n{}\n", tank_table(hotel)));
    out
}

fn panel_table(view: &HotelDetail, hotel: &Hotel) -> Table {
    let mut table = table_with_header(&[
        "ID",
        "Name",
        "V",
        "A",
        "Power (W)",
        "Thermal (W)",
        "Enabled",
        "Action",
    ]);
    for p in &hotel.panels {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.name),
            Cell::new(num(p.voltage)),
            Cell::new(num(p.current)),
            Cell::new(num(p.power)),
            Cell::new(num(p.thermal_power)),
            Cell::new(if p.enabled { "ON" } else { "OFF" }),
            Cell::new(view.toggle_label(p.id, p.enabled)),
        ]);
    }
    if hotel.panels.is_empty() {
        empty_row(&mut table, "No panels yet");
    }
    table
}

fn inverter_table(hotel: &Hotel) -> Table {
    let mut table = table_with_header(&[
        "ID",
        "Enabled",
        "Total Power (W)",
        "AC Output (W)",
        "Fault",
    ]);
    for i in &hotel.inverters {
        table.add_row(vec![
            Cell::new(i.id),
            Cell::new(yes_no(i.enabled)),
            Cell::new(num(i.total_power)),
            Cell::new(num(i.ac_output)),
            Cell::new(yes_no(i.fault)),
        ]);
    }
    if hotel.inverters.is_empty() {
        empty_row(&mut table, "No inverters yet");
    }
    table
}

fn tank_table(hotel: &Hotel) -> Table {
    let mut table = table_with_header(&["ID", "Temp (°C)", "Thermal Input (W)"]);
    for t in &hotel.tanks {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(num(t.temperature)),
            Cell::new(num(t.thermal_input)),
        ]);
    }
    if hotel.tanks.is_empty() {
        empty_row(&mut table, "No tanks yet");
    }
    table
}

fn yes_no(v: bool) -> &'static str {
    if v { "Yes" } else { "No" }
}

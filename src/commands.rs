//! One handler per dashboard action. Each returns the text view to print:
//! mutations reload and render the page they were issued from.

use anyhow::{Context, Result};
use chrono::Utc;
use hotel_core::{HotelDetail, Id, NewHotel, NewInverter, NewPanel, NewTank, PanelPower};

use crate::api::ApiClient;
use crate::render;

pub async fn list_hotels(client: &ApiClient) -> Result<String> {
    let hotels = client.list_hotels().await.context("failed to load hotels")?;
    tracing::debug!(count = hotels.len(), "loaded hotels");
    Ok(render::hotel_list(&hotels))
}

pub async fn create_hotel(client: &ApiClient, hotel: NewHotel) -> Result<String> {
    hotel.validate()?;
    client
        .create_hotel(&hotel)
        .await
        .context("failed to create hotel")?;
    tracing::info!("created hotel {} ({})", hotel.name, hotel.location);
    list_hotels(client).await
}

/// Single fetch of the detail page; the SOC estimate is just the seed value.
pub async fn load_detail(client: &ApiClient, hotel_id: Id) -> Result<HotelDetail> {
    let mut view = HotelDetail::new(hotel_id);
    reload(client, &mut view).await?;
    Ok(view)
}

async fn reload(client: &ApiClient, view: &mut HotelDetail) -> Result<()> {
    view.begin_load();
    let hotel = client
        .get_hotel(view.hotel_id())
        .await
        .with_context(|| format!("failed to load hotel {}", view.hotel_id()))?;
    view.finish_load(Ok(hotel), Utc::now());
    Ok(())
}

pub async fn show_hotel(client: &ApiClient, hotel_id: Id) -> Result<String> {
    let view = load_detail(client, hotel_id).await?;
    Ok(render::hotel_detail(&view))
}

pub async fn add_panel(client: &ApiClient, panel: NewPanel) -> Result<String> {
    panel.validate()?;
    client
        .create_panel(&panel)
        .await
        .context("failed to add panel")?;
    tracing::info!("added panel {} to hotel {}", panel.name, panel.hotel_id);
    show_hotel(client, panel.hotel_id).await
}

pub async fn add_inverter(client: &ApiClient, inverter: NewInverter) -> Result<String> {
    client
        .create_inverter(&inverter)
        .await
        .context("failed to add inverter")?;
    tracing::info!("added inverter to hotel {}", inverter.hotel_id);
    show_hotel(client, inverter.hotel_id).await
}

pub async fn add_tank(client: &ApiClient, tank: NewTank) -> Result<String> {
    client
        .create_tank(&tank)
        .await
        .context("failed to add tank")?;
    tracing::info!("added tank to hotel {}", tank.hotel_id);
    show_hotel(client, tank.hotel_id).await
}

/// Flip a panel based on the state the API currently reports for it.
pub async fn toggle_panel(client: &ApiClient, hotel_id: Id, panel_id: Id) -> Result<String> {
    let mut view = load_detail(client, hotel_id).await?;
    let panel = view
        .hotel()
        .and_then(|h| h.panels.iter().find(|p| p.id == panel_id))
        .cloned()
        .with_context(|| format!("panel {panel_id} not found on hotel {hotel_id}"))?;

    let payload = PanelPower::toggle(&panel);
    view.begin_toggle(panel_id);
    tracing::info!(
        "switching panel {} {}",
        panel_id,
        if payload.enabled == 1 { "on" } else { "off" }
    );
    let outcome = client.set_panel_power(panel_id, payload).await;
    view.end_toggle();
    outcome.context("failed to toggle panel")?;

    reload(client, &mut view).await?;
    Ok(render::hotel_detail(&view))
}

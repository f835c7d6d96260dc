//! Detail-view poll loop.
//!
//! The timer fires a fresh fetch on every tick without waiting for earlier
//! ones, so a slow response can land after a newer one; whatever arrives last
//! wins. Fetch tasks only hand results back over a channel; the loop is the
//! sole owner of the view state. A failing `on_update` (for example a closed
//! stdout) ends the watch with that error.

use std::time::Duration;

use anyhow::Result;
use chrono::{Local, Utc};
use hotel_core::{Hotel, HotelDetail, Id};
use tokio::{sync::mpsc, time::MissedTickBehavior};

use crate::api::ApiClient;

#[derive(Clone, Copy, Debug)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Stop after this many polls have been issued and answered.
    pub max_polls: Option<u64>,
}

pub async fn watch<F>(
    client: &ApiClient,
    hotel_id: Id,
    opts: WatchOptions,
    mut on_update: F,
) -> Result<HotelDetail>
where
    F: FnMut(&HotelDetail) -> Result<()>,
{
    let mut view = HotelDetail::new(hotel_id);
    if opts.max_polls == Some(0) {
        return Ok(view);
    }
    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Result<Hotel, String>)>();

    let mut interval = tokio::time::interval(opts.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut issued: u64 = 0;
    let mut answered: u64 = 0;
    tracing::info!(
        "watching hotel {} every {:?} via {}",
        hotel_id,
        opts.interval,
        client.base_url()
    );

    loop {
        tokio::select! {
            _ = interval.tick(), if opts.max_polls.is_none_or(|max| issued < max) => {
                issued += 1;
                let seq = issued;
                tracing::debug!("poll #{} /hotels/{} @ {}", seq, hotel_id, Local::now().format("%H:%M:%S"));
                view.begin_load();

                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client.get_hotel(hotel_id).await.map_err(|e| e.to_string());
                    // Receiver gone means the loop already stopped.
                    let _ = tx.send((seq, result));
                });
            }
            Some((seq, result)) = rx.recv() => {
                answered += 1;
                if let Err(message) = &result {
                    tracing::warn!("poll #{} failed: {}", seq, message);
                }
                view.finish_load(result, Utc::now());
                if let Err(err) = on_update(&view) {
                    tracing::info!("watch stopped: {:#}", err);
                    return Err(err);
                }
                if opts.max_polls.is_some_and(|max| answered >= max) {
                    break;
                }
            }
            res = &mut shutdown => {
                if let Err(err) = res {
                    tracing::warn!(?err, "ctrl-c handler failed; stopping watch");
                }
                tracing::info!("watch stopped");
                break;
            }
        }
    }

    Ok(view)
}

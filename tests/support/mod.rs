//! In-memory stand-in for the hotel API, served by axum on an ephemeral port.
//! It answers the same routes the dashboard consumes and, like the real
//! service, is loose about JSON types (capacity comes back as a string,
//! flags as 0/1).
#![allow(dead_code)]

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tokio::sync::RwLock;

#[derive(Default)]
struct Backend {
    hotels: BTreeMap<i64, Value>,
    panel_owner: BTreeMap<i64, i64>,
    next_id: i64,
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    backend: Arc<RwLock<Backend>>,
    pub hotel_gets: Arc<AtomicU64>,
    /// Per-request delays for `GET /hotels/{id}`, consumed in arrival order.
    get_delays: Arc<Mutex<VecDeque<Duration>>>,
    /// When set, each `GET /hotels/{id}` reports its arrival number as the location.
    stamp_gets: Arc<AtomicBool>,
}

pub struct TestApi {
    pub base_url: String,
    pub state: AppState,
}

impl TestApi {
    pub async fn start() -> Self {
        let state = AppState::default();
        let app = Router::new()
            .route("/hotels", get(list_hotels).post(create_hotel))
            .route("/hotels/{id}", get(get_hotel))
            .route("/panels", post(create_panel))
            .route("/inverters", post(create_inverter))
            .route("/tanks", post(create_tank))
            .route("/panels/{id}/power", put(set_panel_power))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Seed a hotel directly, bypassing the API.
    pub async fn seed_hotel(&self, name: &str, capacity_wh: f64, demand_w: f64) -> i64 {
        let mut backend = self.state.backend.write().await;
        let id = backend.next_id();
        backend.hotels.insert(
            id,
            json!({
                "id": id,
                "name": name,
                "location": "Test Bay",
                "battery_capacity": capacity_wh.to_string(),
                "demand": demand_w,
                "panels": [],
                "inverters": [],
                "tanks": []
            }),
        );
        id
    }

    pub async fn hotel_json(&self, id: i64) -> Option<Value> {
        self.state.backend.read().await.hotels.get(&id).cloned()
    }

    pub fn hotel_gets(&self) -> u64 {
        self.state.hotel_gets.load(Ordering::SeqCst)
    }

    /// Hold the next `GET /hotels/{id}` requests for the given delays, and
    /// stamp every response with `location: "request N"`.
    pub fn delay_hotel_gets(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.get_delays.lock().unwrap().extend(delays);
        self.state.stamp_gets.store(true, Ordering::SeqCst);
    }
}

async fn list_hotels(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.backend.read().await;
    let rows: Vec<Value> = backend
        .hotels
        .values()
        .map(|h| json!({ "id": h["id"], "name": h["name"], "location": h["location"] }))
        .collect();
    Json(rows)
}

async fn create_hotel(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let (Some(name), Some(location)) = (body["name"].as_str(), body["location"].as_str()) else {
        return (StatusCode::BAD_REQUEST, "name and location required").into_response();
    };
    let mut backend = state.backend.write().await;
    let id = backend.next_id();
    let hotel = json!({
        "id": id,
        "name": name,
        "location": location,
        "battery_capacity": null,
        "demand": null,
        "panels": null,
        "inverters": null,
        "tanks": null
    });
    backend.hotels.insert(id, hotel.clone());
    (StatusCode::CREATED, Json(hotel)).into_response()
}

async fn get_hotel(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let seq = state.hotel_gets.fetch_add(1, Ordering::SeqCst) + 1;
    let delay = state.get_delays.lock().unwrap().pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let backend = state.backend.read().await;
    match backend.hotels.get(&id) {
        Some(hotel) => {
            let mut hotel = hotel.clone();
            if state.stamp_gets.load(Ordering::SeqCst) {
                hotel["location"] = json!(format!("request {seq}"));
            }
            Json(hotel).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("hotel {id} not found")).into_response(),
    }
}

/// Append `row` to `collection` on the hotel named by `body.hotel_id`.
async fn attach(state: &AppState, body: &Value, collection: &str, mut row: Value) -> Response {
    let Some(hotel_id) = body["hotel_id"].as_i64() else {
        return (StatusCode::BAD_REQUEST, "hotel_id required").into_response();
    };
    let mut backend = state.backend.write().await;
    if !backend.hotels.contains_key(&hotel_id) {
        return (StatusCode::NOT_FOUND, format!("hotel {hotel_id} not found")).into_response();
    }
    let id = backend.next_id();
    row["id"] = json!(id);
    if collection == "panels" {
        backend.panel_owner.insert(id, hotel_id);
    }
    let Some(hotel) = backend.hotels.get_mut(&hotel_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !hotel[collection].is_array() {
        hotel[collection] = json!([]);
    }
    if let Some(rows) = hotel[collection].as_array_mut() {
        rows.push(row.clone());
    }
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn create_panel(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let row = json!({
        "name": body["name"],
        "voltage": body["voltage"],
        "current": body["current"],
        "power": body["power"],
        "thermal_power": body["thermal_power"],
        "enabled": 1
    });
    attach(&state, &body, "panels", row).await
}

async fn create_inverter(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let as_flag = |v: &Value| i64::from(v.as_bool().unwrap_or(false));
    let row = json!({
        "enabled": as_flag(&body["enabled"]),
        "total_power": body["total_power"],
        "ac_output": body["ac_output"],
        "fault": as_flag(&body["fault"])
    });
    attach(&state, &body, "inverters", row).await
}

async fn create_tank(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let row = json!({
        "temperature": body["temperature"],
        "thermal_input": body["thermal_input"]
    });
    attach(&state, &body, "tanks", row).await
}

async fn set_panel_power(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let Some(enabled) = body["enabled"].as_i64().filter(|v| *v == 0 || *v == 1) else {
        return (StatusCode::BAD_REQUEST, "enabled must be 0 or 1").into_response();
    };
    let mut backend = state.backend.write().await;
    let Some(hotel_id) = backend.panel_owner.get(&id).copied() else {
        return (StatusCode::NOT_FOUND, format!("panel {id} not found")).into_response();
    };
    let Some(panels) = backend
        .hotels
        .get_mut(&hotel_id)
        .and_then(|h| h["panels"].as_array_mut())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    for panel in panels.iter_mut() {
        if panel["id"].as_i64() == Some(id) {
            panel["enabled"] = json!(enabled);
        }
    }
    (StatusCode::OK, Json(json!({ "id": id, "enabled": enabled }))).into_response()
}

/// Give a seeded hotel an inverter producing `ac_output_w`.
pub async fn set_inverter_output(api: &TestApi, hotel_id: i64, ac_output_w: f64) {
    let mut backend = api.state.backend.write().await;
    let id = backend.next_id();
    if let Some(hotel) = backend.hotels.get_mut(&hotel_id) {
        hotel["inverters"] = json!([{
            "id": id,
            "enabled": 1,
            "total_power": ac_output_w,
            "ac_output": ac_output_w,
            "fault": 0
        }]);
    }
}

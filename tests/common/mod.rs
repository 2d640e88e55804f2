//! In-process stand-in for the gate server, recording every request.
#![allow(dead_code)]

use plate_console::types::Vehicle;
use plate_console::ApiClient;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::{Filter, Reply};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Behaves like the real gate server.
    Normal,
    /// Add/delete answers carry neither `message` nor `error`.
    Silent,
    /// Every answer is an HTML error page.
    NotJson,
}

struct GateState {
    vehicles: Vec<Vehicle>,
    recent: Vec<Value>,
    requests: Vec<Recorded>,
    mode: Mode,
    delay: Option<Duration>,
}

#[derive(Clone)]
pub struct MockGate {
    state: Arc<Mutex<GateState>>,
    base: Url,
}

impl MockGate {
    pub fn start(vehicles: Vec<Vehicle>) -> Self {
        let state = Arc::new(Mutex::new(GateState {
            vehicles,
            recent: Vec::new(),
            requests: Vec::new(),
            mode: Mode::Normal,
            delay: None,
        }));
        let shared = state.clone();
        let routes = warp::any()
            .and(warp::method())
            .and(warp::path::full())
            .and(warp::query::raw().or(warp::any().map(String::new)).unify())
            .and(warp::header::optional::<String>("content-type"))
            .and(warp::body::bytes())
            .and_then(
                move |method: Method,
                      path: FullPath,
                      query: String,
                      content_type: Option<String>,
                      body: Bytes| {
                    let state = shared.clone();
                    async move {
                        let delay = state.lock().unwrap().delay;
                        if let Some(delay) = delay {
                            tokio::time::sleep(delay).await;
                        }
                        let request = Recorded {
                            method,
                            path: path.as_str().to_string(),
                            query,
                            content_type,
                            body: serde_json::from_slice(&body).ok(),
                        };
                        Ok::<_, Infallible>(handle(&state, request))
                    }
                },
            );
        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        MockGate {
            state,
            base: Url::parse(&format!("http://{}/", addr)).unwrap(),
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.base.clone())
    }

    pub fn set_mode(&self, mode: Mode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().delay = delay;
    }

    pub fn set_recent(&self, recent: Vec<Value>) {
        self.state.lock().unwrap().recent = recent;
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.state.lock().unwrap().vehicles.clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

fn reply(value: Value, status: StatusCode) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&value), status).into_response()
}

fn handle(state: &Mutex<GateState>, request: Recorded) -> warp::reply::Response {
    let mut state = state.lock().unwrap();
    state.requests.push(request.clone());
    if state.mode == Mode::NotJson {
        return warp::reply::with_status(
            "<html><body>Internal Server Error</body></html>",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response();
    }

    let path = request.path.as_str();
    match (request.method.as_str(), path) {
        ("GET", "/api/vehicles") => reply(json!(state.vehicles), StatusCode::OK),
        ("POST", "/api/vehicles") => {
            let body = request.body.unwrap_or(Value::Null);
            let plate = match body["plate"].as_str() {
                Some(plate) => plate.trim().to_string(),
                None => return reply(json!({"error": "Missing plate"}), StatusCode::BAD_REQUEST),
            };
            let note = body["note"].as_str().unwrap_or("").trim().to_string();
            if state.mode == Mode::Silent {
                return reply(json!({ "plate": plate }), StatusCode::OK);
            }
            if state.vehicles.iter().any(|v| v.plate == plate) {
                return reply(
                    json!({"error": "Plate already exists"}),
                    StatusCode::CONFLICT,
                );
            }
            state.vehicles.push(Vehicle::new(plate.clone(), note));
            reply(json!({"message": "Added", "plate": plate}), StatusCode::OK)
        }
        ("DELETE", p) if p.starts_with("/api/vehicles/") => {
            let encoded = &p["/api/vehicles/".len()..];
            let plate = urlencoding::decode(encoded).unwrap().into_owned();
            if state.mode == Mode::Silent {
                return reply(json!({}), StatusCode::OK);
            }
            let before = state.vehicles.len();
            state.vehicles.retain(|v| v.plate != plate);
            if state.vehicles.len() < before {
                reply(json!({"message": "Deleted"}), StatusCode::OK)
            } else {
                reply(json!({"error": "Plate not found"}), StatusCode::NOT_FOUND)
            }
        }
        ("GET", "/api/recent") => {
            let limit = request
                .query
                .split('&')
                .find_map(|pair| pair.strip_prefix("limit="))
                .and_then(|n| n.parse().ok())
                .unwrap_or(10);
            let recent: Vec<Value> = state.recent.iter().take(limit).cloned().collect();
            reply(json!(recent), StatusCode::OK)
        }
        ("GET", "/api/latest") => {
            reply(state.recent.first().cloned().unwrap_or(Value::Null), StatusCode::OK)
        }
        _ => reply(json!({"error": "Not found"}), StatusCode::NOT_FOUND),
    }
}

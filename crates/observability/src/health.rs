//! Health-Check-Endpunkt fuer meshfilter
//!
//! Endpoint: `GET /health`
//! Response: JSON mit Status, Version, Uptime und MQTT-Verbindungsstatus

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Status des Health-Checks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Antwort des Health-Check-Endpunkts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub mqtt_connected: bool,
}

/// Geteilter Zustand fuer den Health-Check-Handler
///
/// Die MQTT-Schleife setzt den Verbindungsstatus, der Handler liest ihn.
#[derive(Clone)]
pub struct HealthState {
    start_time: Arc<Instant>,
    mqtt_connected: Arc<AtomicBool>,
}

impl HealthState {
    pub fn neu() -> Self {
        Self {
            start_time: Arc::new(Instant::now()),
            mqtt_connected: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn mqtt_verbunden(&self) -> bool {
        self.mqtt_connected.load(Ordering::Relaxed)
    }

    pub fn mqtt_status_setzen(&self, verbunden: bool) {
        self.mqtt_connected.store(verbunden, Ordering::Relaxed);
    }

    /// Aktuelle Antwort, unabhaengig vom HTTP-Handler
    pub fn antwort(&self) -> HealthResponse {
        let mqtt_connected = self.mqtt_verbunden();
        HealthResponse {
            status: if mqtt_connected {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.uptime_seconds(),
            mqtt_connected,
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::neu()
    }
}

/// Axum-Router fuer den `/health`-Endpunkt
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// `GET /health` – 503 solange der Broker nicht verbunden ist
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let response = state.antwort();
    let http_status = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (http_status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_state_frisch_erstellt() {
        let state = HealthState::neu();
        assert!(state.uptime_seconds() < 5);
        assert!(!state.mqtt_verbunden());
        assert_eq!(state.antwort().status, HealthStatus::Degraded);
    }

    #[test]
    fn mqtt_status_umschalten() {
        let state = HealthState::neu();
        let kopie = state.clone();
        kopie.mqtt_status_setzen(true);
        assert!(state.mqtt_verbunden());
        assert_eq!(state.antwort().status, HealthStatus::Healthy);
        kopie.mqtt_status_setzen(false);
        assert!(!state.mqtt_verbunden());
    }

    #[test]
    fn health_response_serialisierung() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "0.1.0".to_string(),
            uptime_seconds: 3600,
            mqtt_connected: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"uptime_seconds\":3600"));
        assert!(json.contains("\"mqtt_connected\":true"));
    }

    #[tokio::test]
    async fn handler_liefert_503_ohne_broker() {
        let antwort = health_handler(State(HealthState::neu()))
            .await
            .into_response();
        assert_eq!(antwort.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

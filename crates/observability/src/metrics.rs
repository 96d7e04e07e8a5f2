//! Prometheus-kompatible Metriken fuer meshfilter
//!
//! Registrierte Metriken:
//! - `meshfilter_messages_total` – Counter: Bewertete Nachrichten
//! - `meshfilter_verdicts_total` – Counter: Entscheidungen (verdict)
//! - `meshfilter_decrypt_total` – Counter: Entschluesselungsversuche (result)
//! - `meshfilter_malformed_total` – Counter: Nicht dekodierbare Nachrichten
//! - `meshfilter_published_total` – Counter: Weitergeleitete Nachrichten

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Alle meshfilter-Prometheus-Metriken
#[derive(Clone)]
pub struct FilterMetrics {
    pub registry: Arc<Registry>,
    pub messages_total: IntCounter,
    pub verdicts_total: IntCounterVec,
    pub decrypt_total: IntCounterVec,
    pub malformed_total: IntCounter,
    pub published_total: IntCounter,
}

impl FilterMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let messages_total = IntCounter::with_opts(Opts::new(
            "meshfilter_messages_total",
            "Anzahl bewerteter Nachrichten",
        ))?;
        registry.register(Box::new(messages_total.clone()))?;

        let verdicts_total = IntCounterVec::new(
            Opts::new("meshfilter_verdicts_total", "Entscheidungen nach Art"),
            &["verdict"],
        )?;
        registry.register(Box::new(verdicts_total.clone()))?;

        let decrypt_total = IntCounterVec::new(
            Opts::new(
                "meshfilter_decrypt_total",
                "Entschluesselungsversuche nach Ergebnis",
            ),
            &["result"],
        )?;
        registry.register(Box::new(decrypt_total.clone()))?;

        let malformed_total = IntCounter::with_opts(Opts::new(
            "meshfilter_malformed_total",
            "Nicht dekodierbare Nachrichten (nicht in messages_total)",
        ))?;
        registry.register(Box::new(malformed_total.clone()))?;

        let published_total = IntCounter::with_opts(Opts::new(
            "meshfilter_published_total",
            "Auf dem Ausgangs-Topic publizierte Nachrichten",
        ))?;
        registry.register(Box::new(published_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            messages_total,
            verdicts_total,
            decrypt_total,
            malformed_total,
            published_total,
        })
    }

    /// Erfasst eine Entscheidung (zaehlt auch `messages_total`)
    pub fn verdict_erfassen(&self, verdict: &str) {
        self.messages_total.inc();
        self.verdicts_total.with_label_values(&[verdict]).inc();
    }

    /// Erfasst das Ergebnis eines Entschluesselungsversuchs
    pub fn entschluesselung_erfassen(&self, ergebnis: &str) {
        self.decrypt_total.with_label_values(&[ergebnis]).inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: FilterMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<FilterMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

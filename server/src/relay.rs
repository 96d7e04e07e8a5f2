//! MQTT-Relay: Eingangs-Topic abonnieren, filtern, weiterleiten
//!
//! `Relay::nachricht_verarbeiten` ist die komplette Logik fuer eine einzelne
//! Nachricht und laeuft ohne Broker; `mqtt_schleife` verbindet sie mit
//! rumqttc.

use std::sync::Arc;
use std::time::Duration;

use meshfilter_crypto::DecryptOutcome;
use meshfilter_filter::{topic_umschreiben, FilterStats, MeshFilter};
use meshfilter_observability::{FilterMetrics, HealthState};
use meshfilter_protocol::{envelope_dekodieren, envelope_kodieren};
use parking_lot::Mutex;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, MqttOptions, Packet, QoS};

use crate::config::MqttEinstellungen;

/// Wartezeit nach einem Verbindungsfehler
const WIEDERVERBINDEN_NACH: Duration = Duration::from_secs(5);

/// Kapazitaet der rumqttc-Anfrage-Queue
const ANFRAGE_KAPAZITAET: usize = 64;

/// Eine zu publizierende Nachricht
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weiterleitung {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Filter plus Zaehler und Topic-Abbildung
pub struct Relay {
    filter: MeshFilter,
    stats: Arc<Mutex<FilterStats>>,
    metriken: Option<FilterMetrics>,
    eingang: String,
    ausgang: String,
    republish_decrypted: bool,
    zusammenfassung_alle: u64,
}

impl Relay {
    pub fn neu(filter: MeshFilter, eingang: impl Into<String>, ausgang: impl Into<String>) -> Self {
        Self {
            filter,
            stats: Arc::new(Mutex::new(FilterStats::new())),
            metriken: None,
            eingang: eingang.into(),
            ausgang: ausgang.into(),
            republish_decrypted: false,
            zusammenfassung_alle: 0,
        }
    }

    pub fn mit_metriken(mut self, metriken: FilterMetrics) -> Self {
        self.metriken = Some(metriken);
        self
    }

    /// Entschluesselten Envelope statt Originalbytes publizieren
    pub fn mit_entschluesseltem_payload(mut self, aktiv: bool) -> Self {
        self.republish_decrypted = aktiv;
        self
    }

    /// Zusammenfassung nach jeweils `n` bewerteten Nachrichten (0 = nie)
    pub fn mit_zusammenfassung_alle(mut self, n: u64) -> Self {
        self.zusammenfassung_alle = n;
        self
    }

    /// Geteilte Zaehler (fuer die periodische Zusammenfassung)
    pub fn stats(&self) -> Arc<Mutex<FilterStats>> {
        Arc::clone(&self.stats)
    }

    /// Momentaufnahme der Zaehler
    pub fn stats_snapshot(&self) -> FilterStats {
        *self.stats.lock()
    }

    /// Verarbeitet eine eingehende Nachricht
    ///
    /// Gibt `Some` zurueck wenn die Nachricht weitergeleitet werden soll.
    pub fn nachricht_verarbeiten(&self, topic: &str, payload: &[u8]) -> Option<Weiterleitung> {
        let mut envelope = match envelope_dekodieren(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(topic, fehler = %e, "Nachricht nicht dekodierbar, uebersprungen");
                self.stats.lock().malformed_zaehlen();
                if let Some(m) = &self.metriken {
                    m.malformed_total.inc();
                }
                return None;
            }
        };

        // Zaehlen ohne Sperre; das Ablehnungs-Log schreibt auf Platte
        let mut lokal = FilterStats::new();
        let ergebnis = match self.filter.verarbeiten(&mut envelope, &mut lokal) {
            Ok(ergebnis) => ergebnis,
            Err(e) => {
                tracing::debug!(topic, fehler = %e, "Nachricht uebersprungen");
                self.stats.lock().malformed_zaehlen();
                if let Some(m) = &self.metriken {
                    m.malformed_total.inc();
                }
                return None;
            }
        };
        let snapshot = {
            let mut stats = self.stats.lock();
            stats.zusammenfuehren(&lokal);
            *stats
        };

        if let Some(m) = &self.metriken {
            m.verdict_erfassen(ergebnis.verdict.code());
            match &ergebnis.entschluesselung {
                DecryptOutcome::Entschluesselt { .. } => m.entschluesselung_erfassen("decrypted"),
                DecryptOutcome::Erschoepft => m.entschluesselung_erfassen("exhausted"),
                DecryptOutcome::NichtAnwendbar => {}
            }
        }

        let from = envelope
            .packet
            .as_ref()
            .map(|p| p.absender().to_string())
            .unwrap_or_default();

        let weiterleitung = if ergebnis.verdict.ist_weiterleitung() {
            let ziel = topic_umschreiben(topic, &self.eingang, &self.ausgang);
            if ziel == topic {
                // Ausgang == Eingang: der Relay wuerde sich selbst wieder empfangen
                tracing::warn!(
                    topic,
                    eingang = %self.eingang,
                    "Ausgangs-Topic entspricht dem Eingangs-Topic, nicht publiziert"
                );
                None
            } else {
                let payload = if self.republish_decrypted {
                    envelope_kodieren(&envelope)
                } else {
                    payload.to_vec()
                };
                tracing::info!(from = %from, topic = %ziel, verdict = %ergebnis.verdict, "Weitergeleitet");
                Some(Weiterleitung {
                    topic: ziel,
                    payload,
                })
            }
        } else {
            tracing::info!(from = %from, grund = %ergebnis.verdict, "Abgelehnt");
            None
        };

        if self.zusammenfassung_alle > 0 && snapshot.total % self.zusammenfassung_alle == 0 {
            zusammenfassung_loggen(&snapshot);
        }

        weiterleitung
    }
}

/// Schreibt die Zusammenfassung zeilenweise ins Log
pub fn zusammenfassung_loggen(stats: &FilterStats) {
    for zeile in stats.zusammenfassung() {
        tracing::info!("{zeile}");
    }
}

/// rumqttc-Optionen aus der Konfiguration
pub fn mqtt_optionen(mqtt: &MqttEinstellungen) -> MqttOptions {
    let mut optionen = MqttOptions::new(&mqtt.client_id, &mqtt.broker, mqtt.port);
    optionen.set_keep_alive(Duration::from_secs(mqtt.keep_alive_secs));
    if let Some(user) = &mqtt.username {
        optionen.set_credentials(user, mqtt.password.clone().unwrap_or_default());
    }
    optionen
}

/// Ereignisschleife bis zum Abbruch des Tasks
///
/// Abonniert nach jedem ConnAck neu, damit Wiederverbindungen ohne
/// persistente Session weiterlaufen. Verbindungsfehler beenden die Schleife
/// nicht.
pub async fn mqtt_schleife(relay: Arc<Relay>, mqtt: MqttEinstellungen, health: HealthState) {
    let (client, mut eventloop) = AsyncClient::new(mqtt_optionen(&mqtt), ANFRAGE_KAPAZITAET);
    tracing::info!(
        broker = %mqtt.broker,
        port = mqtt.port,
        client_id = %mqtt.client_id,
        "Verbinde mit MQTT-Broker"
    );

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code != ConnectReturnCode::Success {
                    tracing::error!(code = ?ack.code, "Broker hat Verbindung abgelehnt");
                    health.mqtt_status_setzen(false);
                    continue;
                }
                health.mqtt_status_setzen(true);
                tracing::info!(topic = %mqtt.input_topic, "Verbunden, abonniere Eingangs-Topic");
                if let Err(e) = client.try_subscribe(&mqtt.input_topic, QoS::AtMostOnce) {
                    tracing::error!(fehler = %e, "Abonnieren fehlgeschlagen");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if let Some(w) = relay.nachricht_verarbeiten(&publish.topic, &publish.payload) {
                    match client.try_publish(&w.topic, QoS::AtMostOnce, false, w.payload) {
                        Ok(()) => {
                            if let Some(m) = &relay.metriken {
                                m.published_total.inc();
                            }
                        }
                        Err(e) => {
                            tracing::warn!(topic = %w.topic, fehler = %e, "Weiterleitung verworfen");
                        }
                    }
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::warn!("Broker hat Verbindung getrennt");
                health.mqtt_status_setzen(false);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    fehler = %e,
                    wartezeit_s = WIEDERVERBINDEN_NACH.as_secs(),
                    "MQTT-Verbindungsfehler, neuer Versuch"
                );
                health.mqtt_status_setzen(false);
                tokio::time::sleep(WIEDERVERBINDEN_NACH).await;
            }
        }
    }
}

/// Zeitgesteuerte Zusammenfassung
pub async fn statistik_schleife(stats: Arc<Mutex<FilterStats>>, intervall: Duration) {
    let mut ticker = tokio::time::interval(intervall);
    // Erster Tick kommt sofort
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let snapshot = *stats.lock();
        zusammenfassung_loggen(&snapshot);
    }
}

//! meshfilter-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod relay;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::MeshfilterConfig;
use meshfilter_filter::{MeshFilter, RejectFileLog};
use meshfilter_observability::{observability_server_starten, FilterMetrics, HealthState};
use relay::{mqtt_schleife, statistik_schleife, zusammenfassung_loggen, Relay};

/// Haelt den laufenden Relay-Zustand zusammen
pub struct Server {
    pub config: MeshfilterConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: MeshfilterConfig) -> Self {
        Self { config }
    }

    /// Baut Filter und Relay aus der Konfiguration
    ///
    /// Schlaegt nur fehl, wenn das Ablehnungs-Log nicht geoeffnet werden kann.
    pub fn relay_aufbauen(&self, metriken: Option<FilterMetrics>) -> Result<Relay> {
        let filter_cfg = &self.config.filter;
        let mut filter = MeshFilter::aus_optionen(&filter_cfg.optionen);

        if let Some(pfad) = &filter_cfg.reject_log_file {
            let log = RejectFileLog::oeffnen(pfad)
                .with_context(|| format!("Ablehnungs-Log '{pfad}' nicht oeffenbar"))?;
            filter = filter.mit_ablehnungs_log(Arc::new(log));
        }

        let mut relay = Relay::neu(
            filter,
            &self.config.mqtt.input_topic,
            &self.config.mqtt.output_topic,
        )
        .mit_entschluesseltem_payload(filter_cfg.republish_decrypted)
        .mit_zusammenfassung_alle(self.config.stats.every_messages);

        if let Some(m) = metriken {
            relay = relay.mit_metriken(m);
        }
        Ok(relay)
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Konfiguration pruefen
    /// 2. Observability-Server starten (optional)
    /// 3. Relay aufbauen, MQTT-Schleife starten
    /// 4. Auf Ctrl-C warten, Abschluss-Statistik ausgeben
    pub async fn starten(self) -> Result<()> {
        self.config.pruefen()?;

        tracing::info!(
            broker = %self.config.broker_adresse(),
            eingang = %self.config.mqtt.input_topic,
            ausgang = %self.config.mqtt.output_topic,
            "meshfilter startet"
        );

        let health = HealthState::neu();
        let metriken = if self.config.observability.enabled {
            let metriken = FilterMetrics::neu()?;
            let bind: SocketAddr = self
                .config
                .observability
                .bind
                .parse()
                .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.config.observability.bind))?;
            let (m, h) = (metriken.clone(), health.clone());
            tokio::spawn(async move {
                if let Err(e) = observability_server_starten(bind, m, h).await {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
            Some(metriken)
        } else {
            None
        };

        let relay = Arc::new(self.relay_aufbauen(metriken)?);

        if self.config.stats.show_stats {
            let intervall = Duration::from_secs(self.config.stats.interval_secs);
            tokio::spawn(statistik_schleife(relay.stats(), intervall));
        }

        let schleife = tokio::spawn(mqtt_schleife(
            Arc::clone(&relay),
            self.config.mqtt.clone(),
            health,
        ));

        tracing::info!("Relay laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Relay wird beendet");
        schleife.abort();

        zusammenfassung_loggen(&relay.stats_snapshot());
        Ok(())
    }
}

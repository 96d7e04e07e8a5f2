//! Relay-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, sodass der Relay ohne Konfigurationsdatei startet;
//! Kommandozeilen-Optionen ueberschreiben einzelne Werte.

use meshfilter_filter::FilterOptionen;
use meshfilter_observability::{log_format_gueltig, log_level_gueltig};
use serde::{Deserialize, Serialize};

/// Vollstaendige Relay-Konfiguration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeshfilterConfig {
    /// Broker und Topics
    pub mqtt: MqttEinstellungen,
    /// Schluessel, Ausnahmen und Richtlinie
    pub filter: FilterEinstellungen,
    /// Periodische Zusammenfassungen
    pub stats: StatsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Broker-Verbindung und Topics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttEinstellungen {
    pub broker: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
    /// Abonniertes Topic (Wildcards erlaubt)
    pub input_topic: String,
    /// Praefix fuer weitergeleitete Nachrichten
    pub output_topic: String,
    pub keep_alive_secs: u64,
}

impl Default for MqttEinstellungen {
    fn default() -> Self {
        Self {
            broker: "localhost".into(),
            port: 1883,
            username: None,
            password: None,
            client_id: "meshtastic_filter".into(),
            input_topic: "msh/#".into(),
            output_topic: "filtered/msh".into(),
            keep_alive_secs: 60,
        }
    }
}

/// Filter-Einstellungen
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterEinstellungen {
    /// `decrypt_default`, `channel_keys`, `exempt_nodes`, `allow_no_bitfield`
    #[serde(flatten)]
    pub optionen: FilterOptionen,
    /// JSON-Lines-Datei fuer abgelehnte Pakete (leer = kein Log)
    pub reject_log_file: Option<String>,
    /// Entschluesselten Envelope statt Originalbytes publizieren
    pub republish_decrypted: bool,
}

/// Statistik-Ausgabe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsEinstellungen {
    /// Zusammenfassung nach jeweils so vielen Nachrichten (0 = nie)
    pub every_messages: u64,
    /// Zusaetzlich zeitgesteuerte Zusammenfassung
    pub show_stats: bool,
    pub interval_secs: u64,
}

impl Default for StatsEinstellungen {
    fn default() -> Self {
        Self {
            every_messages: 10,
            show_stats: false,
            interval_secs: 30,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub enabled: bool,
    /// Bind-Adresse fuer Metriken und Health
    pub bind: String,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            enabled: false,
            bind: "0.0.0.0:9464".into(),
        }
    }
}

impl MeshfilterConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    ///
    /// `None` wenn die Datei nicht existiert; der Aufrufer entscheidet ueber
    /// Standardwerte und meldet das erst, wenn das Logging steht.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map(Some)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    pub fn aus_toml(inhalt: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(inhalt)
    }

    /// Prueft Werte, die erst zur Laufzeit auffallen wuerden
    pub fn pruefen(&self) -> meshfilter_core::Result<()> {
        use meshfilter_core::MeshfilterError;

        if self.mqtt.broker.trim().is_empty() {
            return Err(MeshfilterError::Konfiguration(
                "mqtt.broker darf nicht leer sein".into(),
            ));
        }
        if self.mqtt.input_topic.trim().is_empty() {
            return Err(MeshfilterError::Konfiguration(
                "mqtt.input_topic darf nicht leer sein".into(),
            ));
        }
        // Die Topic-Abbildung ersetzt nur woertliche Praefixe
        if self.mqtt.input_topic.contains('+') {
            return Err(MeshfilterError::Konfiguration(format!(
                "mqtt.input_topic '{}': '+' wird nicht unterstuetzt, Topics liessen sich nicht abbilden",
                self.mqtt.input_topic
            )));
        }
        if self.mqtt.input_topic.trim_end_matches('#').contains('#') {
            return Err(MeshfilterError::Konfiguration(format!(
                "mqtt.input_topic '{}': '#' ist nur am Ende erlaubt",
                self.mqtt.input_topic
            )));
        }
        // Ausgang innerhalb des Abonnements → eigene Nachrichten kaemen zurueck
        let eingang = self.mqtt.input_topic.trim_end_matches(['/', '#']);
        let ausgang = self.mqtt.output_topic.trim_end_matches(['/', '#']);
        if eingang.is_empty() || ausgang == eingang || ausgang.starts_with(&format!("{eingang}/")) {
            return Err(MeshfilterError::Konfiguration(format!(
                "mqtt.output_topic '{}' liegt innerhalb von mqtt.input_topic '{}'",
                self.mqtt.output_topic, self.mqtt.input_topic
            )));
        }
        if !log_level_gueltig(&self.logging.level) {
            return Err(MeshfilterError::Konfiguration(format!(
                "logging.level '{}' ungueltig (trace, debug, info, warn, error)",
                self.logging.level
            )));
        }
        if !log_format_gueltig(&self.logging.format) {
            return Err(MeshfilterError::Konfiguration(format!(
                "logging.format '{}' ungueltig (text, json)",
                self.logging.format
            )));
        }
        if self.stats.show_stats && self.stats.interval_secs == 0 {
            return Err(MeshfilterError::Konfiguration(
                "stats.interval_secs muss groesser 0 sein".into(),
            ));
        }
        Ok(())
    }

    /// Broker-Adresse fuer Logs
    pub fn broker_adresse(&self) -> String {
        format!("{}:{}", self.mqtt.broker, self.mqtt.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = MeshfilterConfig::default();
        assert_eq!(cfg.mqtt.port, 1883);
        assert_eq!(cfg.mqtt.client_id, "meshtastic_filter");
        assert_eq!(cfg.mqtt.keep_alive_secs, 60);
        assert!(cfg.filter.optionen.decrypt_default);
        assert!(!cfg.filter.optionen.allow_no_bitfield);
        assert!(!cfg.filter.republish_decrypted);
        assert_eq!(cfg.stats.every_messages, 10);
        assert_eq!(cfg.stats.interval_secs, 30);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.observability.enabled);
        assert!(cfg.pruefen().is_ok());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [mqtt]
            broker = "mqtt.example.org"
            username = "meshdev"
            input_topic = "msh/US/NY/#"
            output_topic = "filtered/msh/US/NY"

            [filter]
            decrypt_default = false
            channel_keys = ["MDEyMzQ1Njc4OWFiY2RlZg=="]
            exempt_nodes = ["!12345678", "0xabcdef01"]
            allow_no_bitfield = true
            reject_log_file = "/var/log/meshfilter/rejected.jsonl"

            [stats]
            show_stats = true
        "#;
        let cfg = MeshfilterConfig::aus_toml(toml).unwrap();
        assert_eq!(cfg.mqtt.broker, "mqtt.example.org");
        assert_eq!(cfg.mqtt.username.as_deref(), Some("meshdev"));
        assert_eq!(cfg.broker_adresse(), "mqtt.example.org:1883");
        assert!(!cfg.filter.optionen.decrypt_default);
        assert_eq!(cfg.filter.optionen.channel_keys.len(), 1);
        assert_eq!(cfg.filter.optionen.exempt_nodes.len(), 2);
        assert!(cfg.filter.optionen.allow_no_bitfield);
        assert_eq!(
            cfg.filter.reject_log_file.as_deref(),
            Some("/var/log/meshfilter/rejected.jsonl")
        );
        assert!(cfg.stats.show_stats);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.stats.interval_secs, 30);
        assert_eq!(cfg.mqtt.client_id, "meshtastic_filter");
        assert!(cfg.pruefen().is_ok());
    }

    #[test]
    fn ausgang_im_eingang_wird_abgelehnt() {
        let mut cfg = MeshfilterConfig::default();
        cfg.mqtt.input_topic = "msh/#".into();
        cfg.mqtt.output_topic = "msh/filtered".into();
        assert!(cfg.pruefen().is_err());

        cfg.mqtt.input_topic = "#".into();
        cfg.mqtt.output_topic = "filtered".into();
        assert!(cfg.pruefen().is_err());
    }

    #[test]
    fn einstufige_wildcard_im_eingang_wird_abgelehnt() {
        let mut cfg = MeshfilterConfig::default();
        cfg.mqtt.input_topic = "msh/+/2/e/#".into();
        cfg.mqtt.output_topic = "filtered".into();
        assert!(cfg.pruefen().is_err());

        cfg.mqtt.input_topic = "msh/#/e".into();
        assert!(cfg.pruefen().is_err());
    }

    #[test]
    fn logging_werte_werden_geprueft() {
        let mut cfg = MeshfilterConfig::default();
        cfg.logging.format = "jsno".into();
        assert!(cfg.pruefen().is_err());

        cfg.logging.format = "json".into();
        cfg.logging.level = "verbose".into();
        assert!(cfg.pruefen().is_err());

        cfg.logging.level = "debug".into();
        assert!(cfg.pruefen().is_ok());
    }

    #[test]
    fn aehnlicher_praefix_ist_erlaubt() {
        let mut cfg = MeshfilterConfig::default();
        cfg.mqtt.input_topic = "msh/#".into();
        cfg.mqtt.output_topic = "msh-filtered".into();
        assert!(cfg.pruefen().is_ok());
    }

    #[test]
    fn fehlende_datei_liefert_keine_config() {
        let cfg = MeshfilterConfig::laden("/nicht/vorhanden/meshfilter.toml").unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn vorhandene_datei_wird_geladen() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("meshfilter.toml");
        std::fs::write(&pfad, "[mqtt]\nport = 8883\n").unwrap();
        let cfg = MeshfilterConfig::laden(pfad.to_str().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(cfg.mqtt.port, 8883);
        assert_eq!(cfg.mqtt.broker, "localhost");
    }

    #[test]
    fn ungueltiges_toml_ist_fehler() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("meshfilter.toml");
        std::fs::write(&pfad, "[mqtt]\nport = \"kein port\"\n").unwrap();
        assert!(MeshfilterConfig::laden(pfad.to_str().unwrap()).is_err());
    }
}

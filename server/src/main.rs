//! meshfilter – Einstiegspunkt
//!
//! Laedt die Konfiguration, wendet Kommandozeilen-Optionen an, initialisiert
//! das Logging und startet den Relay.

use anyhow::Result;
use clap::Parser;
use meshfilter_observability::logging_initialisieren;
use meshfilter_server::{config::MeshfilterConfig, Server};

/// Leitet nur Meshtastic-Pakete weiter, deren Absender "Ok to MQTT" gesetzt hat
#[derive(Parser, Debug)]
#[command(name = "meshfilter", version, about)]
struct Cli {
    /// Konfigurationsdatei (Standard: $MESHFILTER_CONFIG oder meshfilter.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// MQTT-Broker
    #[arg(long)]
    broker: Option<String>,

    /// MQTT-Port
    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    password: Option<String>,

    /// Abonniertes Topic, z.B. `msh/US/#`
    #[arg(long)]
    input_topic: Option<String>,

    /// Praefix fuer weitergeleitete Nachrichten
    #[arg(long)]
    output_topic: Option<String>,

    /// Zusaetzlicher Base64-Kanalschluessel (mehrfach erlaubt)
    #[arg(long = "channel-key")]
    channel_keys: Vec<String>,

    /// Knoten ohne Pruefung weiterleiten (`!xxxxxxxx`, `0x…`, dezimal; mehrfach erlaubt)
    #[arg(long = "exempt-node")]
    exempt_nodes: Vec<String>,

    /// Standard-LongFast-Schluessel nicht probieren
    #[arg(long)]
    no_default_key: bool,

    /// Pakete ohne Bitfield weiterleiten
    #[arg(long)]
    allow_no_bitfield: bool,

    /// Abgelehnte Pakete als JSON-Lines protokollieren
    #[arg(long)]
    reject_log: Option<String>,

    /// Zeitgesteuerte Statistik ausgeben
    #[arg(long)]
    show_stats: bool,

    /// Debug-Logging erzwingen
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    /// Ueberschreibt Werte aus der Datei mit gesetzten Optionen
    fn anwenden(self, config: &mut MeshfilterConfig) {
        let mqtt = &mut config.mqtt;
        if let Some(broker) = self.broker {
            mqtt.broker = broker;
        }
        if let Some(port) = self.port {
            mqtt.port = port;
        }
        if self.username.is_some() {
            mqtt.username = self.username;
        }
        if self.password.is_some() {
            mqtt.password = self.password;
        }
        if let Some(topic) = self.input_topic {
            mqtt.input_topic = topic;
        }
        if let Some(topic) = self.output_topic {
            mqtt.output_topic = topic;
        }

        let filter = &mut config.filter;
        filter.optionen.channel_keys.extend(self.channel_keys);
        filter.optionen.exempt_nodes.extend(self.exempt_nodes);
        if self.no_default_key {
            filter.optionen.decrypt_default = false;
        }
        if self.allow_no_bitfield {
            filter.optionen.allow_no_bitfield = true;
        }
        if self.reject_log.is_some() {
            filter.reject_log_file = self.reject_log;
        }
        if self.show_stats {
            config.stats.show_stats = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Konfigurationsdatei-Pfad: CLI, Umgebungsvariable oder Standard
    let config_pfad = cli
        .config
        .clone()
        .or_else(|| std::env::var("MESHFILTER_CONFIG").ok())
        .unwrap_or_else(|| "meshfilter.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let geladen = MeshfilterConfig::laden(&config_pfad)?;
    let datei_fehlt = geladen.is_none();
    let mut config = geladen.unwrap_or_default();
    let debug = cli.debug;
    cli.anwenden(&mut config);

    logging_initialisieren(&config.logging.level, &config.logging.format, debug);

    if datei_fehlt {
        tracing::warn!(
            pfad = %config_pfad,
            "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
        );
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "meshfilter wird initialisiert"
    );

    Server::neu(config).starten().await
}

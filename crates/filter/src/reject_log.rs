//! Append-only Protokoll abgelehnter Pakete
//!
//! Eine Zeile pro Ablehnung, JSON-kodiert. Die Datei wird nur angehaengt,
//! nie gekuerzt oder umgeschrieben.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use meshfilter_core::NodeId;
use meshfilter_protocol::{MeshPacket, ServiceEnvelope};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::FilterResult;
use crate::policy::Verdict;

/// Ein abgelehntes Paket
#[derive(Debug, Clone, Serialize)]
pub struct Ablehnung {
    pub timestamp: DateTime<Utc>,
    /// Absender im Meshtastic-Format `!xxxxxxxx`
    pub from: String,
    pub reason: &'static str,
    pub channel_id: String,
    pub gateway_id: String,
    pub packet_id: u32,
}

impl Ablehnung {
    pub fn neu(envelope: &ServiceEnvelope, paket: &MeshPacket, verdict: Verdict) -> Self {
        Self {
            timestamp: Utc::now(),
            from: NodeId(paket.from).to_string(),
            reason: verdict.code(),
            channel_id: envelope.channel_id.clone(),
            gateway_id: envelope.gateway_id.clone(),
            packet_id: paket.id,
        }
    }
}

/// Ziel fuer Ablehnungs-Eintraege
pub trait RejectionSink: Send + Sync {
    fn ablehnung_protokollieren(&self, ablehnung: &Ablehnung) -> FilterResult<()>;
}

/// Schreibt Ablehnungen als JSON-Lines in eine Datei (oder einen Writer)
pub struct RejectFileLog {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl RejectFileLog {
    /// Oeffnet (oder erstellt) die Datei im Anhaenge-Modus
    pub fn oeffnen(pfad: impl AsRef<Path>) -> FilterResult<Self> {
        let datei = OpenOptions::new()
            .create(true)
            .append(true)
            .open(pfad.as_ref())?;
        tracing::info!(pfad = %pfad.as_ref().display(), "Ablehnungs-Log geoeffnet");
        Ok(Self::from_writer(datei))
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl RejectionSink for RejectFileLog {
    fn ablehnung_protokollieren(&self, ablehnung: &Ablehnung) -> FilterResult<()> {
        let mut zeile = serde_json::to_vec(ablehnung)?;
        zeile.push(b'\n');

        let mut writer = self.writer.lock();
        writer.write_all(&zeile)?;
        writer.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for RejectFileLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectFileLog").finish_non_exhaustive()
    }
}

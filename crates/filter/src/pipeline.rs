//! `MeshFilter` – Entschluesselung → Richtlinie → Statistik
//!
//! Haelt nur unveraenderlichen Zustand (Schluesselring, Ausnahmen); die
//! Zaehler gehoeren dem Aufrufer und werden per `&mut` durchgereicht.

use std::sync::Arc;

use meshfilter_crypto::{DecryptOutcome, DecryptionEngine, KeyRing};
use meshfilter_protocol::ServiceEnvelope;
use serde::Deserialize;

use crate::error::{FilterError, FilterResult};
use crate::policy::{AdmissionPolicy, ExemptNodeSet, Verdict};
use crate::reject_log::{Ablehnung, RejectionSink};
use crate::stats::FilterStats;

/// Einstellungen fuer Schluesselring und Richtlinie
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterOptionen {
    /// Meshtastic-Standardschluessel probieren
    pub decrypt_default: bool,
    /// Zusaetzliche Base64-Schluessel
    pub channel_keys: Vec<String>,
    /// Knoten, die immer weitergeleitet werden (`0x…`, `!…`, dezimal)
    pub exempt_nodes: Vec<String>,
    /// Pakete ohne Bitfield weiterleiten
    pub allow_no_bitfield: bool,
}

impl Default for FilterOptionen {
    fn default() -> Self {
        Self {
            decrypt_default: true,
            channel_keys: Vec::new(),
            exempt_nodes: Vec::new(),
            allow_no_bitfield: false,
        }
    }
}

/// Ergebnis fuer eine verarbeitete Nachricht
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterErgebnis {
    pub verdict: Verdict,
    pub entschluesselung: DecryptOutcome,
}

/// Filter-Pipeline fuer einzelne Envelopes
pub struct MeshFilter {
    engine: DecryptionEngine,
    richtlinie: AdmissionPolicy,
    ablehnungen: Option<Arc<dyn RejectionSink>>,
}

impl MeshFilter {
    pub fn new(engine: DecryptionEngine, richtlinie: AdmissionPolicy) -> Self {
        Self {
            engine,
            richtlinie,
            ablehnungen: None,
        }
    }

    /// Baut Schluesselring und Richtlinie aus den Optionen
    pub fn aus_optionen(optionen: &FilterOptionen) -> Self {
        let ring = KeyRing::aufbauen(optionen.decrypt_default, optionen.channel_keys.as_slice());
        let ausnahmen = ExemptNodeSet::aus_eintraegen(optionen.exempt_nodes.as_slice());

        tracing::info!(
            schluessel = ?ring.namen(),
            ausnahmen = ausnahmen.len(),
            allow_no_bitfield = optionen.allow_no_bitfield,
            "Filter konfiguriert"
        );

        Self::new(
            DecryptionEngine::new(ring),
            AdmissionPolicy::new(ausnahmen, optionen.allow_no_bitfield),
        )
    }

    /// Haengt ein Ziel fuer abgelehnte Pakete an
    pub fn mit_ablehnungs_log(mut self, sink: Arc<dyn RejectionSink>) -> Self {
        self.ablehnungen = Some(sink);
        self
    }

    /// Verarbeitet genau einen Envelope
    ///
    /// Ein verschluesseltes Paket wird bei passendem Schluessel im Envelope
    /// durch seinen Klartext ersetzt. `stats` wird nur veraendert, wenn der
    /// Envelope ein Paket enthaelt.
    pub fn verarbeiten(
        &self,
        envelope: &mut ServiceEnvelope,
        stats: &mut FilterStats,
    ) -> FilterResult<FilterErgebnis> {
        let Some(paket) = envelope.packet.as_mut() else {
            return Err(FilterError::KeinPaket);
        };

        let entschluesselung = self.engine.entschluesseln(paket, &envelope.channel_id);
        stats.entschluesselung_zaehlen(&entschluesselung);

        let paket = envelope.packet.as_ref().ok_or(FilterError::KeinPaket)?;
        let verdict = self.richtlinie.bewerten(envelope, paket);
        stats.verdict_zaehlen(verdict);

        if !verdict.ist_weiterleitung() {
            if let Some(sink) = &self.ablehnungen {
                let ablehnung = Ablehnung::neu(envelope, paket, verdict);
                if let Err(e) = sink.ablehnung_protokollieren(&ablehnung) {
                    tracing::warn!(fehler = %e, "Ablehnung konnte nicht protokolliert werden");
                }
            }
        }

        Ok(FilterErgebnis {
            verdict,
            entschluesselung,
        })
    }
}

impl std::fmt::Debug for MeshFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshFilter")
            .field("engine", &self.engine)
            .field("richtlinie", &self.richtlinie)
            .field("ablehnungs_log", &self.ablehnungen.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

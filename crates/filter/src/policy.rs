//! Zulassungsrichtlinie – darf ein Paket das Mesh verlassen?
//!
//! Pruefreihenfolge (erste zutreffende Regel entscheidet):
//! 1. Absender in der Ausnahmeliste → `ForwardExempt`
//! 2. Kein dekodierter Inhalt → `RejectEncrypted`
//! 3. Kein Bitfield → `RejectNoBitfield` (oder `Forward` mit `allow_no_bitfield`)
//! 4. Bit 0 gesetzt → `Forward`, sonst `RejectBitfieldDisabled`

use std::collections::HashSet;

use meshfilter_core::NodeId;
use meshfilter_protocol::{MeshPacket, ServiceEnvelope};

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Entscheidung fuer genau ein Paket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Absender hat "Ok to MQTT" gesetzt (oder Bitfield fehlt und ist erlaubt)
    Forward,
    /// Absender steht auf der Ausnahmeliste
    ForwardExempt,
    /// Paket ist (weiterhin) verschluesselt
    RejectEncrypted,
    /// Firmware des Absenders kennt das Bitfield nicht
    RejectNoBitfield,
    /// Absender hat "Ok to MQTT" ausgeschaltet
    RejectBitfieldDisabled,
}

impl Verdict {
    /// Nur weiterleitende Entscheidungen fuehren zum Publizieren
    pub fn ist_weiterleitung(&self) -> bool {
        matches!(self, Self::Forward | Self::ForwardExempt)
    }

    /// Stabiler Code fuer Logs und Metrik-Labels
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::ForwardExempt => "forward_exempt",
            Self::RejectEncrypted => "encrypted",
            Self::RejectNoBitfield => "no_bitfield",
            Self::RejectBitfieldDisabled => "bitfield_disabled",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// ExemptNodeSet
// ---------------------------------------------------------------------------

/// Knoten, deren Pakete ohne weitere Pruefung weitergeleitet werden
#[derive(Debug, Clone, Default)]
pub struct ExemptNodeSet {
    knoten: HashSet<NodeId>,
}

impl ExemptNodeSet {
    /// Parst die konfigurierten Eintraege (`0x…`, `!…` oder dezimal)
    ///
    /// Ungueltige Eintraege werden protokolliert und uebersprungen.
    pub fn aus_eintraegen<S: AsRef<str>>(eintraege: &[S]) -> Self {
        let mut knoten = HashSet::with_capacity(eintraege.len());
        for eintrag in eintraege {
            match eintrag.as_ref().parse::<NodeId>() {
                Ok(id) => {
                    tracing::info!(node = %id, "Ausnahme-Knoten hinzugefuegt");
                    knoten.insert(id);
                }
                Err(e) => {
                    tracing::warn!(eintrag = eintrag.as_ref(), fehler = %e, "Ausnahme-Knoten ungueltig, wird ignoriert");
                }
            }
        }
        Self { knoten }
    }

    pub fn enthaelt(&self, id: NodeId) -> bool {
        self.knoten.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.knoten.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knoten.is_empty()
    }
}

// ---------------------------------------------------------------------------
// AdmissionPolicy
// ---------------------------------------------------------------------------

/// Richtlinie ohne veraenderlichen Zustand
#[derive(Debug, Clone, Default)]
pub struct AdmissionPolicy {
    ausnahmen: ExemptNodeSet,
    /// Pakete ohne Bitfield weiterleiten statt ablehnen
    allow_no_bitfield: bool,
}

impl AdmissionPolicy {
    pub fn new(ausnahmen: ExemptNodeSet, allow_no_bitfield: bool) -> Self {
        Self {
            ausnahmen,
            allow_no_bitfield,
        }
    }

    /// Bewertet ein (ggf. bereits entschluesseltes) Paket
    pub fn bewerten(&self, envelope: &ServiceEnvelope, paket: &MeshPacket) -> Verdict {
        let from = paket.absender();

        let verdict = if self.ausnahmen.enthaelt(from) {
            Verdict::ForwardExempt
        } else {
            match paket.decoded().map(|data| data.ok_to_mqtt()) {
                None => Verdict::RejectEncrypted,
                Some(None) if self.allow_no_bitfield => Verdict::Forward,
                Some(None) => Verdict::RejectNoBitfield,
                Some(Some(true)) => Verdict::Forward,
                Some(Some(false)) => Verdict::RejectBitfieldDisabled,
            }
        };

        tracing::debug!(
            from = %from,
            channel_id = %envelope.channel_id,
            verdict = %verdict,
            "Paket bewertet"
        );
        verdict
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use meshfilter_protocol::{Data, PayloadVariant};

    const ABSENDER: u32 = 0x1234_5678;

    fn envelope() -> ServiceEnvelope {
        ServiceEnvelope {
            packet: None,
            channel_id: "LongFast".into(),
            gateway_id: "!87654321".into(),
        }
    }

    fn dekodiert(bitfield: Option<u32>) -> MeshPacket {
        MeshPacket {
            id: 123_456,
            from: ABSENDER,
            to: 0xFFFF_FFFF,
            payload_variant: Some(PayloadVariant::Decoded(Data {
                portnum: 1,
                payload: b"Test message".to_vec(),
                bitfield,
                ..Default::default()
            })),
            ..Default::default()
        }
    }

    fn verschluesselt() -> MeshPacket {
        MeshPacket {
            id: 123_456,
            from: ABSENDER,
            payload_variant: Some(PayloadVariant::Encrypted(vec![1, 2, 3, 4, 5])),
            ..Default::default()
        }
    }

    fn mit_ausnahme() -> AdmissionPolicy {
        AdmissionPolicy::new(ExemptNodeSet::aus_eintraegen(&["!12345678"]), false)
    }

    #[test]
    fn bitfield_gesetzt_wird_weitergeleitet() {
        let policy = AdmissionPolicy::default();
        assert_eq!(policy.bewerten(&envelope(), &dekodiert(Some(0x01))), Verdict::Forward);
        assert_eq!(policy.bewerten(&envelope(), &dekodiert(Some(0xFF))), Verdict::Forward);
    }

    #[test]
    fn bitfield_geloescht_wird_abgelehnt() {
        let policy = AdmissionPolicy::default();
        assert_eq!(
            policy.bewerten(&envelope(), &dekodiert(Some(0x00))),
            Verdict::RejectBitfieldDisabled
        );
        assert_eq!(
            policy.bewerten(&envelope(), &dekodiert(Some(0xFE))),
            Verdict::RejectBitfieldDisabled
        );
    }

    #[test]
    fn fehlendes_bitfield_standardmaessig_abgelehnt() {
        let policy = AdmissionPolicy::default();
        assert_eq!(
            policy.bewerten(&envelope(), &dekodiert(None)),
            Verdict::RejectNoBitfield
        );
    }

    #[test]
    fn fehlendes_bitfield_mit_erlaubnis_weitergeleitet() {
        let policy = AdmissionPolicy::new(ExemptNodeSet::default(), true);
        assert_eq!(policy.bewerten(&envelope(), &dekodiert(None)), Verdict::Forward);
        // Ein explizit ausgeschaltetes Bit bleibt abgelehnt
        assert_eq!(
            policy.bewerten(&envelope(), &dekodiert(Some(0))),
            Verdict::RejectBitfieldDisabled
        );
    }

    #[test]
    fn verschluesselt_wird_abgelehnt() {
        let policy = AdmissionPolicy::default();
        assert_eq!(
            policy.bewerten(&envelope(), &verschluesselt()),
            Verdict::RejectEncrypted
        );
    }

    #[test]
    fn paket_ohne_payload_gilt_als_verschluesselt() {
        let paket = MeshPacket {
            from: ABSENDER,
            ..Default::default()
        };
        assert_eq!(
            AdmissionPolicy::default().bewerten(&envelope(), &paket),
            Verdict::RejectEncrypted
        );
    }

    #[test]
    fn ausnahme_umgeht_alle_pruefungen() {
        let policy = mit_ausnahme();
        for paket in [
            verschluesselt(),
            dekodiert(None),
            dekodiert(Some(0x00)),
            dekodiert(Some(0x01)),
        ] {
            assert_eq!(policy.bewerten(&envelope(), &paket), Verdict::ForwardExempt);
        }
    }

    #[test]
    fn ausnahme_gilt_nur_fuer_absender() {
        let policy = mit_ausnahme();
        let mut paket = dekodiert(Some(0x00));
        paket.from = 0x0BAD_F00D;
        paket.to = ABSENDER;
        assert_eq!(
            policy.bewerten(&envelope(), &paket),
            Verdict::RejectBitfieldDisabled
        );
    }

    #[test]
    fn ausnahmen_alle_formate() {
        let set = ExemptNodeSet::aus_eintraegen(&["0x12345678", "!abcdef01", "305419896"]);
        assert!(set.enthaelt(NodeId(0x1234_5678)));
        assert!(set.enthaelt(NodeId(0xABCD_EF01)));
        // Dezimal und Hex beschreiben denselben Knoten
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ungueltige_ausnahme_wird_ignoriert() {
        let set = ExemptNodeSet::aus_eintraegen(&["invalid", "0x12345678"]);
        assert_eq!(set.len(), 1);
        assert!(set.enthaelt(NodeId(0x1234_5678)));
    }

    #[test]
    fn verdict_weiterleitung_und_codes() {
        assert!(Verdict::Forward.ist_weiterleitung());
        assert!(Verdict::ForwardExempt.ist_weiterleitung());
        assert!(!Verdict::RejectEncrypted.ist_weiterleitung());
        assert!(!Verdict::RejectNoBitfield.ist_weiterleitung());
        assert!(!Verdict::RejectBitfieldDisabled.ist_weiterleitung());
        assert_eq!(Verdict::RejectNoBitfield.to_string(), "no_bitfield");
    }
}

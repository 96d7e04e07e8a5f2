//! Zaehler fuer jede Filter-Entscheidung
//!
//! Jede bewertete Nachricht erhoeht `total` genau einmal und genau einen
//! Verdict-Zaehler. Daraus folgt:
//!
//! ```text
//! total == forwarded + forwarded_exempt + rejected_encrypted
//!        + rejected_no_bitfield + rejected_bitfield_disabled
//! ```
//!
//! `malformed` zaehlt Nachrichten, die schon beim Dekodieren scheitern; sie
//! erreichen die Richtlinie nie und sind daher nicht Teil von `total`.

use serde::Serialize;

use meshfilter_crypto::DecryptOutcome;

use crate::policy::Verdict;

/// Zaehler-Sammlung; lebt so lange wie der Prozess
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: u64,
    pub forwarded: u64,
    pub forwarded_exempt: u64,
    pub rejected_encrypted: u64,
    pub rejected_no_bitfield: u64,
    pub rejected_bitfield_disabled: u64,
    pub decrypted: u64,
    pub decryption_failed: u64,
    pub malformed: u64,
}

impl FilterStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zaehlt eine Entscheidung (inkl. `total`)
    pub fn verdict_zaehlen(&mut self, verdict: Verdict) {
        self.total += 1;
        let zaehler = match verdict {
            Verdict::Forward => &mut self.forwarded,
            Verdict::ForwardExempt => &mut self.forwarded_exempt,
            Verdict::RejectEncrypted => &mut self.rejected_encrypted,
            Verdict::RejectNoBitfield => &mut self.rejected_no_bitfield,
            Verdict::RejectBitfieldDisabled => &mut self.rejected_bitfield_disabled,
        };
        *zaehler += 1;
    }

    /// Zaehlt das Ergebnis eines Entschluesselungsversuchs
    pub fn entschluesselung_zaehlen(&mut self, ergebnis: &DecryptOutcome) {
        match ergebnis {
            DecryptOutcome::Entschluesselt { .. } => self.decrypted += 1,
            DecryptOutcome::Erschoepft => self.decryption_failed += 1,
            DecryptOutcome::NichtAnwendbar => {}
        }
    }

    /// Zaehlt eine nicht dekodierbare Nachricht
    pub fn malformed_zaehlen(&mut self) {
        self.malformed += 1;
    }

    /// Addiert die Zaehler einer anderen Sammlung
    ///
    /// Erlaubt das Zaehlen in eine lokale Sammlung ohne Sperre und das
    /// spaetere Uebernehmen in die geteilte.
    pub fn zusammenfuehren(&mut self, andere: &FilterStats) {
        self.total += andere.total;
        self.forwarded += andere.forwarded;
        self.forwarded_exempt += andere.forwarded_exempt;
        self.rejected_encrypted += andere.rejected_encrypted;
        self.rejected_no_bitfield += andere.rejected_no_bitfield;
        self.rejected_bitfield_disabled += andere.rejected_bitfield_disabled;
        self.decrypted += andere.decrypted;
        self.decryption_failed += andere.decryption_failed;
        self.malformed += andere.malformed;
    }

    /// Alle weitergeleiteten Nachrichten
    pub fn weitergeleitet(&self) -> u64 {
        self.forwarded + self.forwarded_exempt
    }

    /// Alle abgelehnten Nachrichten
    pub fn abgelehnt(&self) -> u64 {
        self.rejected_encrypted + self.rejected_no_bitfield + self.rejected_bitfield_disabled
    }

    /// Prueft die Erhaltungs-Invariante
    pub fn ist_konsistent(&self) -> bool {
        self.total == self.weitergeleitet() + self.abgelehnt()
    }

    /// Menschenlesbare Zusammenfassung, eine Zeile pro Eintrag
    ///
    /// Leer solange noch keine Nachricht bewertet wurde.
    pub fn zusammenfassung(&self) -> Vec<String> {
        if self.total == 0 {
            return Vec::new();
        }

        let prozent = |teil: u64| 100.0 * teil as f64 / self.total as f64;
        let mut zeilen = vec![
            "MESSAGE STATISTICS:".to_string(),
            format!("  Total messages: {}", self.total),
            format!(
                "  Forwarded: {} ({:.1}%)",
                self.weitergeleitet(),
                prozent(self.weitergeleitet())
            ),
            format!("    - Exempt nodes: {}", self.forwarded_exempt),
            format!(
                "  Rejected: {} ({:.1}%)",
                self.abgelehnt(),
                prozent(self.abgelehnt())
            ),
        ];

        if self.decrypted > 0 || self.decryption_failed > 0 {
            zeilen.push(format!("  Decrypted: {}", self.decrypted));
            zeilen.push(format!("  Decryption failed: {}", self.decryption_failed));
        }
        if self.malformed > 0 {
            zeilen.push(format!("  Malformed (not counted): {}", self.malformed));
        }

        zeilen.extend([
            "  Rejection reasons:".to_string(),
            format!(
                "    - Encrypted (no decoded data): {}",
                self.rejected_encrypted
            ),
            format!(
                "    - No bitfield (older firmware): {}",
                self.rejected_no_bitfield
            ),
            format!(
                "    - Bitfield disabled by user: {}",
                self.rejected_bitfield_disabled
            ),
        ]);
        zeilen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zusammenfuehren_addiert_alle_zaehler() {
        let mut gesamt = FilterStats::new();
        gesamt.verdict_zaehlen(Verdict::Forward);
        gesamt.malformed_zaehlen();

        let mut lokal = FilterStats::new();
        lokal.verdict_zaehlen(Verdict::RejectNoBitfield);
        lokal.entschluesselung_zaehlen(&DecryptOutcome::Erschoepft);

        gesamt.zusammenfuehren(&lokal);

        assert_eq!(gesamt.total, 2);
        assert_eq!(gesamt.forwarded, 1);
        assert_eq!(gesamt.rejected_no_bitfield, 1);
        assert_eq!(gesamt.decryption_failed, 1);
        assert_eq!(gesamt.malformed, 1);
        assert!(gesamt.ist_konsistent());
    }

    #[test]
    fn neue_statistik_ist_leer() {
        let stats = FilterStats::new();
        assert_eq!(stats.total, 0);
        assert!(stats.ist_konsistent());
        assert!(stats.zusammenfassung().is_empty());
    }

    #[test]
    fn jedes_verdict_erhoeht_genau_einen_zaehler() {
        let mut stats = FilterStats::new();
        stats.verdict_zaehlen(Verdict::Forward);
        stats.verdict_zaehlen(Verdict::ForwardExempt);
        stats.verdict_zaehlen(Verdict::RejectEncrypted);
        stats.verdict_zaehlen(Verdict::RejectNoBitfield);
        stats.verdict_zaehlen(Verdict::RejectBitfieldDisabled);
        stats.verdict_zaehlen(Verdict::RejectBitfieldDisabled);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.forwarded_exempt, 1);
        assert_eq!(stats.rejected_encrypted, 1);
        assert_eq!(stats.rejected_no_bitfield, 1);
        assert_eq!(stats.rejected_bitfield_disabled, 2);
        assert!(stats.ist_konsistent());
    }

    #[test]
    fn entschluesselung_zaehlt_nicht_in_total() {
        let mut stats = FilterStats::new();
        stats.entschluesselung_zaehlen(&DecryptOutcome::Entschluesselt {
            key_name: "default".into(),
        });
        stats.entschluesselung_zaehlen(&DecryptOutcome::Erschoepft);
        stats.entschluesselung_zaehlen(&DecryptOutcome::NichtAnwendbar);
        stats.malformed_zaehlen();

        assert_eq!(stats.decrypted, 1);
        assert_eq!(stats.decryption_failed, 1);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn zusammenfassung_mit_prozenten() {
        let mut stats = FilterStats::new();
        stats.verdict_zaehlen(Verdict::Forward);
        stats.verdict_zaehlen(Verdict::RejectNoBitfield);
        stats.verdict_zaehlen(Verdict::RejectNoBitfield);
        stats.verdict_zaehlen(Verdict::RejectEncrypted);

        let text = stats.zusammenfassung().join("\n");
        assert!(text.contains("Total messages: 4"));
        assert!(text.contains("Forwarded: 1 (25.0%)"));
        assert!(text.contains("Rejected: 3 (75.0%)"));
        assert!(text.contains("No bitfield (older firmware): 2"));
        // Ohne Entschluesselungsversuche keine Decrypt-Zeilen
        assert!(!text.contains("Decrypted"));
    }

    #[test]
    fn statistik_als_json() {
        let mut stats = FilterStats::new();
        stats.verdict_zaehlen(Verdict::Forward);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["forwarded"], 1);
    }
}

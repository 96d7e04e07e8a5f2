//! Schluesselring – geordnete Kandidaten-Schluessel
//!
//! Wird einmal beim Start aufgebaut und danach nur noch gelesen:
//! 1. Der eingebaute Meshtastic-Standardschluessel (`default`), sofern nicht
//!    deaktiviert
//! 2. Vom Betreiber konfigurierte Base64-Schluessel (`custom-<index>`)
//!
//! Ungueltige Schluessel werden mit einer Warnung verworfen; der Aufbau
//! schlaegt dadurch nie fehl.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CryptoError, CryptoResult};
use crate::types::KeyEntry;

/// Meshtastic-Standardschluessel des `LongFast`-Kanals (`1PG7OiApB1nwvP+rz05pAQ==`)
pub const DEFAULT_KEY: [u8; 16] = [
    0xd4, 0xf1, 0xbb, 0x3a, 0x20, 0x29, 0x07, 0x59, 0xf0, 0xbc, 0xff, 0xab, 0xcf, 0x4e, 0x69,
    0x01,
];

/// Name des eingebauten Schluessels
pub const DEFAULT_KEY_NAME: &str = "default";

/// Geordnete, unveraenderliche Liste der Kandidaten-Schluessel
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    eintraege: Vec<KeyEntry>,
}

impl KeyRing {
    /// Baut den Ring aus Konfiguration auf
    ///
    /// # Parameter
    /// - `standard_aktiv`: Standardschluessel als ersten Eintrag aufnehmen
    /// - `zusatz_schluessel`: Base64-kodierte Schluessel; der Name ergibt sich
    ///   aus der Position in dieser Liste
    pub fn aufbauen<S: AsRef<str>>(standard_aktiv: bool, zusatz_schluessel: &[S]) -> Self {
        let mut eintraege = Vec::with_capacity(zusatz_schluessel.len() + 1);

        if standard_aktiv {
            eintraege.push(KeyEntry::new(DEFAULT_KEY_NAME, &DEFAULT_KEY[..]));
            tracing::info!("Verschluesselung: Standard-LongFast-Schluessel aktiv");
        }

        for (index, b64) in zusatz_schluessel.iter().enumerate() {
            match base64_schluessel_dekodieren(b64.as_ref()) {
                Ok(key) => {
                    tracing::info!(
                        index,
                        bytes = key.len(),
                        "Verschluesselung: Zusatz-Schluessel hinzugefuegt"
                    );
                    eintraege.push(KeyEntry::new(format!("custom-{index}"), key.as_slice()));
                }
                Err(e) => {
                    tracing::warn!(index, fehler = %e, "Zusatz-Schluessel ungueltig, wird ignoriert");
                }
            }
        }

        Self { eintraege }
    }

    /// Ring aus bereits dekodierten Eintraegen (Tests, Tools)
    pub fn aus_eintraegen(eintraege: Vec<KeyEntry>) -> Self {
        Self { eintraege }
    }

    /// Eintraege in Probe-Reihenfolge
    pub fn iter(&self) -> impl Iterator<Item = &KeyEntry> {
        self.eintraege.iter()
    }

    pub fn len(&self) -> usize {
        self.eintraege.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eintraege.is_empty()
    }

    /// Namen aller Eintraege (fuer Start-Logs)
    pub fn namen(&self) -> Vec<&str> {
        self.eintraege.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Dekodiert einen Base64-Schluessel; leere Schluessel sind ungueltig
fn base64_schluessel_dekodieren(b64: &str) -> CryptoResult<Vec<u8>> {
    let key = STANDARD.decode(b64.trim())?;
    if key.is_empty() {
        return Err(CryptoError::LeererSchluessel);
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Probe-Entschluesselung von Kanal-Paketen
//!
//! Ein verschluesseltes `MeshPacket` traegt keinen Hinweis darauf, mit welchem
//! Schluessel es verschluesselt wurde. Die Engine probiert daher jeden
//! Schluessel des Rings der Reihe nach:
//!
//! 1. Effektiven Schluessel fuer den Kanal ableiten
//! 2. AES-CTR mit der Paket-Nonce anwenden
//! 3. Klartext als `Data` dekodieren – Fehler → naechster Schluessel
//! 4. `portnum == 0` → falscher Schluessel, naechster Schluessel
//! 5. Erster Treffer ersetzt den Ciphertext im Paket, Abbruch
//!
//! CTR hat keinen Auth-Tag; ein falscher Schluessel liefert Zufallsbytes, die
//! gelegentlich als Protobuf dekodierbar sind. Die `portnum`-Pruefung faengt
//! die meisten dieser Fehltreffer ab.

use meshfilter_protocol::{portnum, Data, MeshPacket};
use prost::Message;

use crate::cipher::{ctr_anwenden, PacketNonce};
use crate::derive::schluessel_ableiten;
use crate::error::{CryptoError, CryptoResult};
use crate::keyring::KeyRing;

/// Ergebnis eines Entschluesselungsversuchs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// Paket war nicht verschluesselt oder der Ciphertext war leer
    NichtAnwendbar,
    /// Schluessel `key_name` hat gepasst, das Paket ist jetzt dekodiert
    Entschluesselt { key_name: String },
    /// Kein Schluessel hat gepasst, das Paket ist unveraendert
    Erschoepft,
}

/// Probiert alle Schluessel eines Rings auf ein Paket
#[derive(Debug, Clone)]
pub struct DecryptionEngine {
    ring: KeyRing,
}

impl DecryptionEngine {
    pub fn new(ring: KeyRing) -> Self {
        Self { ring }
    }

    /// Versucht das Paket zu entschluesseln
    ///
    /// Nur bei Erfolg wird `paket` veraendert (Encrypted → Decoded).
    pub fn entschluesseln(&self, paket: &mut MeshPacket, kanal: &str) -> DecryptOutcome {
        let ciphertext = match paket.encrypted() {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return DecryptOutcome::NichtAnwendbar,
        };

        if self.ring.is_empty() {
            tracing::debug!(from = %paket.absender(), "Keine Schluessel verfuegbar");
            return DecryptOutcome::Erschoepft;
        }

        let nonce = PacketNonce::neu(u64::from(paket.id), paket.absender().als_u64());
        tracing::trace!(
            packet_id = paket.id,
            from = %paket.absender(),
            bytes = ciphertext.len(),
            kanal,
            schluessel = self.ring.len(),
            "Entschluesselung wird versucht"
        );

        let treffer = self.ring.iter().find_map(|eintrag| {
            let key = schluessel_ableiten(eintrag.key.as_bytes(), kanal);
            match klartext_pruefen(key.as_bytes(), &nonce, ciphertext) {
                Ok(data) => Some((eintrag.name.clone(), data)),
                Err(e) => {
                    tracing::trace!(schluessel = %eintrag.name, grund = %e, "Schluessel passt nicht");
                    None
                }
            }
        });

        match treffer {
            Some((key_name, data)) => {
                tracing::debug!(
                    from = %paket.absender(),
                    schluessel = %key_name,
                    portnum = portnum::name(data.portnum),
                    "Paket entschluesselt"
                );
                paket.entschluesselt_setzen(data);
                DecryptOutcome::Entschluesselt { key_name }
            }
            None => {
                tracing::debug!(from = %paket.absender(), "Kein Schluessel passt");
                DecryptOutcome::Erschoepft
            }
        }
    }
}

/// Entschluesselt mit genau einem Schluessel und prueft die Struktur
fn klartext_pruefen(key: &[u8], nonce: &PacketNonce, ciphertext: &[u8]) -> CryptoResult<Data> {
    let mut klartext = ciphertext.to_vec();
    ctr_anwenden(key, nonce, &mut klartext)?;

    let data = Data::decode(klartext.as_slice())?;
    if data.portnum == portnum::UNKNOWN_APP {
        return Err(CryptoError::UnbekannterPort);
    }
    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

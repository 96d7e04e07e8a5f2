//! Nonce-Aufbau und AES-CTR fuer Meshtastic-Kanal-Pakete
//!
//! ## Nonce-Aufbau (16 Bytes)
//! ```text
//! [packet_id (u64 LE)] [from (u64 LE)]
//! ```
//! Beide Felder sind auf dem Wire 32 Bit breit und werden mit Nullen
//! erweitert. Der Zaehler laeuft als 128-Bit Big-Endian ueber den ganzen Block.
//!
//! ## Schluessel
//! 16 Bytes → AES-128-CTR, 32 Bytes → AES-256-CTR. CTR aendert die Laenge nicht,
//! Ver- und Entschluesselung sind dieselbe Operation.

use aes::{Aes128, Aes256};
use ctr::cipher::{KeyIvInit, StreamCipher};
use meshfilter_protocol::Data;
use prost::Message;

use crate::error::{CryptoError, CryptoResult};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// 16-Byte Nonce eines Pakets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketNonce([u8; 16]);

impl PacketNonce {
    /// Baut die Nonce aus Paket-ID und Absender-Adresse
    pub fn neu(packet_id: u64, from: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&packet_id.to_le_bytes());
        bytes[8..16].copy_from_slice(&from.to_le_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

/// Wendet den AES-CTR-Schluesselstrom in-place auf `daten` an
pub fn ctr_anwenden(key: &[u8], nonce: &PacketNonce, daten: &mut [u8]) -> CryptoResult<()> {
    let laenge_fehler = |_| CryptoError::UngueltigeSchluesselLaenge {
        erhalten: key.len(),
    };

    match key.len() {
        0 => return Err(CryptoError::LeererSchluessel),
        16 => Aes128Ctr::new_from_slices(key, nonce.as_bytes())
            .map_err(laenge_fehler)?
            .apply_keystream(daten),
        32 => Aes256Ctr::new_from_slices(key, nonce.as_bytes())
            .map_err(laenge_fehler)?
            .apply_keystream(daten),
        erhalten => return Err(CryptoError::UngueltigeSchluesselLaenge { erhalten }),
    }
    Ok(())
}

/// Verschluesselt eine `Data`-Struktur so, wie ein Mesh-Knoten sie senden wuerde
///
/// Gegenstueck zur Probe-Entschluesselung; genutzt fuer Test-Fixtures und Tools.
pub fn daten_verschluesseln(
    data: &Data,
    key: &[u8],
    packet_id: u32,
    from: u32,
) -> CryptoResult<Vec<u8>> {
    let mut bytes = data.encode_to_vec();
    let nonce = PacketNonce::neu(u64::from(packet_id), u64::from(from));
    ctr_anwenden(key, &nonce, &mut bytes)?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

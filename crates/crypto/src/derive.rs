//! Kanal-spezifische Schluesselableitung
//!
//! Fuer benannte Kanaele wird aus einem kurzen Basis-Schluessel ein 32-Byte
//! Schluessel abgeleitet:
//!
//! ```text
//! key = SHA-256(base_key || utf8(channel_name))
//! ```
//!
//! Der primaere Kanal (leerer Name oder `LongFast`) nutzt den Basis-Schluessel
//! unveraendert.

use sha2::{Digest, Sha256};

use crate::types::SecretBytes;

/// Name des primaeren Kanals, fuer den keine Ableitung stattfindet
pub const PRIMAER_KANAL: &str = "LongFast";

/// Gibt true zurueck wenn der Kanal den Basis-Schluessel direkt nutzt
pub fn ist_primaer_kanal(kanal: &str) -> bool {
    kanal.is_empty() || kanal == PRIMAER_KANAL
}

/// Leitet den effektiven Schluessel fuer einen Kanal ab
pub fn schluessel_ableiten(basis: &[u8], kanal: &str) -> SecretBytes {
    if ist_primaer_kanal(kanal) {
        return SecretBytes::from(basis);
    }

    let mut hasher = Sha256::new();
    hasher.update(basis);
    hasher.update(kanal.as_bytes());
    SecretBytes::new(hasher.finalize().to_vec())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

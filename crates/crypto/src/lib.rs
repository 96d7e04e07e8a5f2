//! # meshfilter-crypto
//!
//! Entschluesselung von Meshtastic-Kanal-Paketen.
//!
//! ## Module
//! - `keyring` - Geordnete Liste der Kandidaten-Schluessel
//! - `derive` - Kanal-spezifische Schluesselableitung (SHA-256)
//! - `cipher` - Nonce-Aufbau und AES-CTR
//! - `engine` - Probe-Entschluesselung ueber alle Schluessel
//! - `types` - Gemeinsame Typen (SecretBytes, KeyEntry)
//! - `error` - Fehlertypen

pub mod cipher;
pub mod derive;
pub mod engine;
pub mod error;
pub mod keyring;
pub mod types;

// Bequeme Re-Exports
pub use cipher::{ctr_anwenden, daten_verschluesseln, PacketNonce};
pub use derive::{schluessel_ableiten, PRIMAER_KANAL};
pub use engine::{DecryptOutcome, DecryptionEngine};
pub use error::{CryptoError, CryptoResult};
pub use keyring::{KeyRing, DEFAULT_KEY};
pub use types::{KeyEntry, SecretBytes};

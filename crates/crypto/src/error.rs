//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Ungueltige Schluessel-Laenge: erwartet 16 oder 32, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erhalten: usize },

    #[error("Leerer Schluessel")]
    LeererSchluessel,

    #[error("Klartext ist keine gueltige Data-Struktur: {0}")]
    UngueltigerKlartext(#[from] prost::DecodeError),

    #[error("Klartext hat portnum=0 (UNKNOWN_APP), vermutlich falscher Schluessel")]
    UnbekannterPort,

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

//! Fehlertypen fuer das Wire-Format

use thiserror::Error;

/// Fehler beim Dekodieren/Kodieren von Meshtastic-Nachrichten
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Nachricht zu gross: {groesse} Bytes (Maximum: {max} Bytes)")]
    ZuGross { groesse: usize, max: usize },

    #[error("Leere Nachricht")]
    Leer,

    #[error("Protobuf-Dekodierung fehlgeschlagen: {0}")]
    Dekodierung(#[from] prost::DecodeError),

    #[error("Envelope ohne MeshPacket")]
    KeinPaket,
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

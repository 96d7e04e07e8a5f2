//! Fehlertypen fuer das Filter-Crate

use thiserror::Error;

/// Filter-Fehlertypen
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Envelope ohne MeshPacket")]
    KeinPaket,

    #[error("Ablehnungs-Log nicht beschreibbar: {0}")]
    AblehnungsLog(#[from] std::io::Error),

    #[error("Serialisierung fehlgeschlagen: {0}")]
    Serialisierung(#[from] serde_json::Error),
}

pub type FilterResult<T> = Result<T, FilterError>;

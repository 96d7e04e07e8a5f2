//! Fehlertypen fuer meshfilter
//!
//! Zentraler Fehler-Enum fuer Zustaende, die ueber Crate-Grenzen hinweg
//! transportiert werden. Die Fach-Crates definieren eigene Fehler.

use thiserror::Error;

/// Globaler Result-Alias fuer meshfilter
pub type Result<T> = std::result::Result<T, MeshfilterError>;

/// Fehler, die ueber Crate-Grenzen hinweg gemeldet werden
#[derive(Debug, Error)]
pub enum MeshfilterError {
    #[error("Ungueltige Node-ID '{eingabe}': {grund}")]
    UngueltigeNodeId { eingabe: String, grund: String },

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),
}

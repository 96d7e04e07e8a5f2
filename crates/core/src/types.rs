//! Gemeinsame Identifikationstypen fuer meshfilter
//!
//! Mesh-Knoten werden ueber eine 32-Bit-Adresse identifiziert. Das
//! Newtype-Pattern verhindert Verwechslungen mit Paket-IDs oder Kanalnummern.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MeshfilterError;

/// 32-Bit-Adresse eines Mesh-Knotens
///
/// Akzeptierte Textformen beim Parsen:
/// - Hex mit Praefix: `0x12345678`
/// - Meshtastic-Stil: `!12345678`
/// - Dezimal: `305419896`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Adresse auf 64 Bit erweitert (fuer die Nonce-Konstruktion)
    pub fn als_u64(&self) -> u64 {
        u64::from(self.0)
    }
}

impl From<u32> for NodeId {
    fn from(wert: u32) -> Self {
        Self(wert)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!{:08x}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = MeshfilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let eingabe = s.trim();
        let fehler = |grund: String| MeshfilterError::UngueltigeNodeId {
            eingabe: s.to_string(),
            grund,
        };

        let hex = eingabe
            .strip_prefix("0x")
            .or_else(|| eingabe.strip_prefix("0X"))
            .or_else(|| eingabe.strip_prefix('!'));

        let wert = match hex {
            Some(ziffern) => u32::from_str_radix(ziffern, 16),
            None => eingabe.parse::<u32>(),
        };

        wert.map(NodeId).map_err(|e| fehler(e.to_string()))
    }
}

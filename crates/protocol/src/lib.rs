//! meshfilter-protocol – Meshtastic Wire-Format
//!
//! Dieses Crate definiert die Protobuf-Strukturen, die ueber MQTT
//! transportiert werden, sowie das Dekodieren/Kodieren kompletter Envelopes.

pub mod error;
pub mod mesh;
pub mod portnum;
pub mod wire;

pub use error::{ProtocolError, ProtocolResult};
pub use mesh::{Data, MeshPacket, PayloadVariant, ServiceEnvelope};
pub use wire::{envelope_dekodieren, envelope_kodieren};

//! Dekodieren und Kodieren kompletter MQTT-Payloads
//!
//! Ein MQTT-Payload auf `msh/.../e/...` ist genau ein protobuf-kodierter
//! `ServiceEnvelope`. Nachrichten ohne `MeshPacket` gelten als fehlerhaft,
//! damit die Filter-Engine nie mit einem halbgueltigen Envelope arbeitet.

use prost::Message;

use crate::error::{ProtocolError, ProtocolResult};
use crate::mesh::ServiceEnvelope;

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Maximale Payload-Groesse in Bytes. LoRa-Pakete sind < 256 Bytes, der
/// Envelope fuegt nur wenige Metadaten hinzu.
pub const MAX_NACHRICHT_GROESSE: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Dekodieren / Kodieren
// ---------------------------------------------------------------------------

/// Dekodiert einen MQTT-Payload zu einem `ServiceEnvelope`
///
/// # Fehler
/// - `Leer` bei leerem Payload
/// - `ZuGross` wenn der Payload `MAX_NACHRICHT_GROESSE` ueberschreitet
/// - `Dekodierung` bei ungueltigem Protobuf
/// - `KeinPaket` wenn der Envelope kein `MeshPacket` enthaelt
pub fn envelope_dekodieren(bytes: &[u8]) -> ProtocolResult<ServiceEnvelope> {
    if bytes.is_empty() {
        return Err(ProtocolError::Leer);
    }
    if bytes.len() > MAX_NACHRICHT_GROESSE {
        return Err(ProtocolError::ZuGross {
            groesse: bytes.len(),
            max: MAX_NACHRICHT_GROESSE,
        });
    }

    let envelope = ServiceEnvelope::decode(bytes)?;
    if envelope.packet.is_none() {
        return Err(ProtocolError::KeinPaket);
    }

    tracing::trace!(
        bytes = bytes.len(),
        channel_id = %envelope.channel_id,
        gateway_id = %envelope.gateway_id,
        "Envelope dekodiert"
    );
    Ok(envelope)
}

/// Kodiert einen `ServiceEnvelope` fuer das Publizieren
pub fn envelope_kodieren(envelope: &ServiceEnvelope) -> Vec<u8> {
    envelope.encode_to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Protobuf-Strukturen des Meshtastic-MQTT-Uplinks
//!
//! Handgeschriebene `prost`-Structs mit den Feld-Tags aus `mqtt.proto` und
//! `mesh.proto`. Es werden nur die Felder modelliert, die der Filter liest
//! oder beim Re-Serialisieren verlustfrei erhalten muss; unbekannte Felder
//! verwirft prost beim Dekodieren.
//!
//! ## Payload-Zustand
//! Ein `MeshPacket` traegt entweder Klartext (`Decoded`) oder Ciphertext
//! (`Encrypted`), modelliert als `oneof` → [`PayloadVariant`]. Der Uebergang
//! `Encrypted` → `Decoded` erfolgt genau einmal nach erfolgreicher
//! Entschluesselung ([`MeshPacket::entschluesselt_setzen`]).

use meshfilter_core::NodeId;
use prost::{Message, Oneof};

/// Aeussere MQTT-Huelle: Routing-Metadaten plus genau ein Paket
#[derive(Clone, PartialEq, Message)]
pub struct ServiceEnvelope {
    #[prost(message, optional, tag = "1")]
    pub packet: Option<MeshPacket>,
    /// Kanalname (leer = primaerer Kanal)
    #[prost(string, tag = "2")]
    pub channel_id: String,
    /// Gateway-Knoten, der das Paket ins MQTT gebracht hat (`!xxxxxxxx`)
    #[prost(string, tag = "3")]
    pub gateway_id: String,
}

/// Ein einzelnes Mesh-Paket
#[derive(Clone, PartialEq, Message)]
pub struct MeshPacket {
    #[prost(fixed32, tag = "1")]
    pub from: u32,
    #[prost(fixed32, tag = "2")]
    pub to: u32,
    #[prost(uint32, tag = "3")]
    pub channel: u32,
    #[prost(oneof = "PayloadVariant", tags = "4, 5")]
    pub payload_variant: Option<PayloadVariant>,
    #[prost(fixed32, tag = "6")]
    pub id: u32,
    #[prost(fixed32, tag = "7")]
    pub rx_time: u32,
    #[prost(float, tag = "8")]
    pub rx_snr: f32,
    #[prost(uint32, tag = "9")]
    pub hop_limit: u32,
    #[prost(bool, tag = "10")]
    pub want_ack: bool,
    #[prost(int32, tag = "11")]
    pub priority: i32,
    #[prost(int32, tag = "12")]
    pub rx_rssi: i32,
    /// Veraltet, wird nur unveraendert durchgereicht
    #[prost(int32, tag = "13")]
    pub delayed: i32,
    #[prost(bool, tag = "14")]
    pub via_mqtt: bool,
    #[prost(uint32, tag = "15")]
    pub hop_start: u32,
    #[prost(bytes = "vec", tag = "16")]
    pub public_key: Vec<u8>,
    #[prost(bool, tag = "17")]
    pub pki_encrypted: bool,
    /// Letztes Byte der Adresse des naechsten Hops
    #[prost(uint32, tag = "18")]
    pub next_hop: u32,
    /// Letztes Byte der Adresse des weiterleitenden Knotens
    #[prost(uint32, tag = "19")]
    pub relay_node: u32,
    #[prost(uint32, tag = "20")]
    pub tx_after: u32,
    #[prost(int32, tag = "21")]
    pub transport_mechanism: i32,
}

/// Payload eines Pakets: Klartext oder Ciphertext, nie beides
#[derive(Clone, PartialEq, Oneof)]
pub enum PayloadVariant {
    #[prost(message, tag = "4")]
    Decoded(Data),
    #[prost(bytes, tag = "5")]
    Encrypted(Vec<u8>),
}

/// Anwendungsdaten eines dekodierten Pakets
#[derive(Clone, PartialEq, Message)]
pub struct Data {
    /// Anwendungs-Port, siehe [`crate::portnum`]. 0 = unbekannt/ungueltig.
    #[prost(int32, tag = "1")]
    pub portnum: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub want_response: bool,
    #[prost(fixed32, tag = "4")]
    pub dest: u32,
    #[prost(fixed32, tag = "5")]
    pub source: u32,
    #[prost(fixed32, tag = "6")]
    pub request_id: u32,
    #[prost(fixed32, tag = "7")]
    pub reply_id: u32,
    #[prost(fixed32, tag = "8")]
    pub emoji: u32,
    /// Flags des Absenders. `None` = Firmware kennt das Feld nicht.
    /// Bit 0 ist das "Ok to MQTT"-Bit.
    #[prost(uint32, optional, tag = "9")]
    pub bitfield: Option<u32>,
}

/// Bit 0 im `bitfield`: Absender erlaubt Weitergabe ueber MQTT
pub const BITFIELD_OK_TO_MQTT: u32 = 0x01;

impl MeshPacket {
    /// Absender-Adresse
    pub fn absender(&self) -> NodeId {
        NodeId(self.from)
    }

    /// Dekodierte Daten, falls das Paket im Klartext-Zustand ist
    pub fn decoded(&self) -> Option<&Data> {
        match &self.payload_variant {
            Some(PayloadVariant::Decoded(data)) => Some(data),
            _ => None,
        }
    }

    /// Ciphertext, falls das Paket (noch) verschluesselt ist
    pub fn encrypted(&self) -> Option<&[u8]> {
        match &self.payload_variant {
            Some(PayloadVariant::Encrypted(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Ersetzt den Ciphertext durch die entschluesselten Daten
    pub fn entschluesselt_setzen(&mut self, data: Data) {
        self.payload_variant = Some(PayloadVariant::Decoded(data));
    }
}

impl Data {
    /// Ist das "Ok to MQTT"-Bit gesetzt? `None` wenn kein Bitfield vorhanden.
    pub fn ok_to_mqtt(&self) -> Option<bool> {
        self.bitfield.map(|bits| bits & BITFIELD_OK_TO_MQTT != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_daten(bitfield: Option<u32>) -> Data {
        Data {
            portnum: 1,
            payload: b"Hallo Mesh".to_vec(),
            bitfield,
            ..Default::default()
        }
    }

    #[test]
    fn paket_zustand_dekodiert() {
        let paket = MeshPacket {
            from: 0x1234_5678,
            payload_variant: Some(PayloadVariant::Decoded(test_daten(Some(1)))),
            ..Default::default()
        };
        assert!(paket.decoded().is_some());
        assert!(paket.encrypted().is_none());
        assert_eq!(paket.absender(), NodeId(0x1234_5678));
    }

    #[test]
    fn paket_zustand_verschluesselt() {
        let mut paket = MeshPacket {
            payload_variant: Some(PayloadVariant::Encrypted(vec![1, 2, 3])),
            ..Default::default()
        };
        assert_eq!(paket.encrypted(), Some(&[1u8, 2, 3][..]));
        assert!(paket.decoded().is_none());

        paket.entschluesselt_setzen(test_daten(None));
        assert!(paket.encrypted().is_none());
        assert_eq!(paket.decoded().map(|d| d.portnum), Some(1));
    }

    #[test]
    fn ok_to_mqtt_dreiwertig() {
        assert_eq!(test_daten(None).ok_to_mqtt(), None);
        assert_eq!(test_daten(Some(0x01)).ok_to_mqtt(), Some(true));
        assert_eq!(test_daten(Some(0x03)).ok_to_mqtt(), Some(true));
        assert_eq!(test_daten(Some(0x00)).ok_to_mqtt(), Some(false));
        assert_eq!(test_daten(Some(0x02)).ok_to_mqtt(), Some(false));
    }

    #[test]
    fn bitfield_praesenz_bleibt_beim_kodieren_erhalten() {
        // optional-Feld: Some(0) muss als Feld erhalten bleiben, None nicht
        let mit_null = test_daten(Some(0)).encode_to_vec();
        let ohne = test_daten(None).encode_to_vec();
        assert_eq!(Data::decode(mit_null.as_slice()).unwrap().bitfield, Some(0));
        assert_eq!(Data::decode(ohne.as_slice()).unwrap().bitfield, None);
    }

    #[test]
    fn routing_felder_bleiben_beim_rundweg_erhalten() {
        let paket = MeshPacket {
            from: 0x1234_5678,
            delayed: 1,
            next_hop: 0x21,
            relay_node: 0x42,
            tx_after: 500,
            transport_mechanism: 5,
            payload_variant: Some(PayloadVariant::Decoded(test_daten(Some(1)))),
            ..Default::default()
        };
        let bytes = paket.encode_to_vec();
        // Tag 19, Wire-Typ 0 = 0x98 0x01
        assert!(bytes.windows(3).any(|w| w == [0x98, 0x01, 0x42]));
        assert_eq!(MeshPacket::decode(bytes.as_slice()).unwrap(), paket);
    }

    #[test]
    fn oneof_feldnummern() {
        let paket = MeshPacket {
            payload_variant: Some(PayloadVariant::Encrypted(vec![0xAA])),
            ..Default::default()
        };
        let bytes = paket.encode_to_vec();
        // Tag 5, Wire-Typ 2 (length-delimited) = 0x2A
        assert_eq!(bytes, vec![0x2A, 0x01, 0xAA]);
    }
}

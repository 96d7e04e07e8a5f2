//! # meshfilter-filter
//!
//! Entscheidet, ob ein Meshtastic-Paket aus dem Mesh weitergegeben werden darf.
//!
//! ## Module
//! - `policy` - Zulassungsrichtlinie ("Ok to MQTT"-Bit, Ausnahmen)
//! - `stats` - Zaehler fuer jede Entscheidung
//! - `reject_log` - Append-only Protokoll abgelehnter Pakete
//! - `topic` - Umschreiben des Eingangs-Topics auf das Ausgangs-Topic
//! - `pipeline` - `MeshFilter`: Entschluesselung → Richtlinie → Statistik

pub mod error;
pub mod pipeline;
pub mod policy;
pub mod reject_log;
pub mod stats;
pub mod topic;

pub use error::{FilterError, FilterResult};
pub use pipeline::{FilterErgebnis, FilterOptionen, MeshFilter};
pub use policy::{AdmissionPolicy, ExemptNodeSet, Verdict};
pub use reject_log::{Ablehnung, RejectFileLog, RejectionSink};
pub use stats::FilterStats;
pub use topic::topic_umschreiben;

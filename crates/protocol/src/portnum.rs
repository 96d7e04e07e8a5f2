//! Meshtastic Anwendungs-Ports (Auszug aus `portnums.proto`)
//!
//! `Data::portnum` bleibt ein `i32`, damit unbekannte Ports neuerer Firmware
//! nicht beim Dekodieren verloren gehen.

pub const UNKNOWN_APP: i32 = 0;
pub const TEXT_MESSAGE_APP: i32 = 1;
pub const REMOTE_HARDWARE_APP: i32 = 2;
pub const POSITION_APP: i32 = 3;
pub const NODEINFO_APP: i32 = 4;
pub const ROUTING_APP: i32 = 5;
pub const ADMIN_APP: i32 = 6;
pub const WAYPOINT_APP: i32 = 8;
pub const DETECTION_SENSOR_APP: i32 = 10;
pub const RANGE_TEST_APP: i32 = 66;
pub const TELEMETRY_APP: i32 = 67;
pub const TRACEROUTE_APP: i32 = 70;
pub const NEIGHBORINFO_APP: i32 = 71;
pub const MAP_REPORT_APP: i32 = 73;

/// Lesbarer Name eines Ports (fuer Debug-Logs)
pub fn name(portnum: i32) -> &'static str {
    match portnum {
        UNKNOWN_APP => "UNKNOWN_APP",
        TEXT_MESSAGE_APP => "TEXT_MESSAGE_APP",
        REMOTE_HARDWARE_APP => "REMOTE_HARDWARE_APP",
        POSITION_APP => "POSITION_APP",
        NODEINFO_APP => "NODEINFO_APP",
        ROUTING_APP => "ROUTING_APP",
        ADMIN_APP => "ADMIN_APP",
        WAYPOINT_APP => "WAYPOINT_APP",
        DETECTION_SENSOR_APP => "DETECTION_SENSOR_APP",
        RANGE_TEST_APP => "RANGE_TEST_APP",
        TELEMETRY_APP => "TELEMETRY_APP",
        TRACEROUTE_APP => "TRACEROUTE_APP",
        NEIGHBORINFO_APP => "NEIGHBORINFO_APP",
        MAP_REPORT_APP => "MAP_REPORT_APP",
        _ => "OTHER",
    }
}

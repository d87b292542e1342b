// # Connectivity Snapshot
//
// The data pushed by the host: an ordered interface list plus the name of
// the interface the host currently routes through.
//
// ## Wire Format
//
// ```json
// {
//   "Interfaces": [
//     { "Name": "wlan0", "MTU": 1500, "Addrs": ["10.0.0.5/24"] }
//   ],
//   "DefaultInterface": "wlan0"
// }
// ```
//
// Decoding rules:
//
// - Keys match ignoring ASCII case; a repeated key overwrites the earlier one
// - Missing fields take the zero value; `null` leaves the field untouched
// - Unknown fields are ignored
// - MTU is any i64; out-of-range values are clamped into u32 with a warning
//
// Address strings are kept verbatim here and only parsed when an
// interface list or default route is computed.

use ipnet::IpNet;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{Error, Result};

/// Full connectivity state reported by the host at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivitySnapshot {
    /// Interfaces in host order
    #[serde(rename = "Interfaces")]
    pub interfaces: Vec<InterfaceRecord>,

    /// Name of the interface carrying the default route, or empty if unknown
    #[serde(rename = "DefaultInterface")]
    pub default_interface: String,
}

/// One interface as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    /// Interface name (unique by convention, not enforced)
    #[serde(rename = "Name")]
    pub name: String,

    /// Link MTU
    #[serde(rename = "MTU")]
    pub mtu: u32,

    /// Addresses in CIDR notation, e.g. "192.168.1.5/24"
    #[serde(rename = "Addrs")]
    pub addrs: Vec<String>,
}

impl ConnectivitySnapshot {
    /// Parse an ingestion payload
    ///
    /// The payload must be a JSON object. Any structural failure is
    /// reported as `Error::Parse` with the position of the offending
    /// token; individual address strings are not validated here.
    pub fn from_payload(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encode this snapshot as an ingestion payload
    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the host reported no interfaces at all
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Whether the host named a default interface
    pub fn has_default_interface(&self) -> bool {
        !self.default_interface.is_empty()
    }

    /// Records whose name equals `name`, in host order
    pub fn interfaces_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a InterfaceRecord> + 'a {
        self.interfaces.iter().filter(move |record| record.name == name)
    }
}

impl InterfaceRecord {
    /// Create a record with no addresses
    pub fn new(name: impl Into<String>, mtu: u32) -> Self {
        Self {
            name: name.into(),
            mtu,
            addrs: Vec::new(),
        }
    }

    /// Add a CIDR address string
    pub fn with_addr(mut self, cidr: impl Into<String>) -> Self {
        self.addrs.push(cidr.into());
        self
    }

    /// Addresses that parse as CIDR, in host order
    ///
    /// Malformed entries are logged at debug level and skipped.
    pub fn parsed_addrs(&self) -> impl Iterator<Item = IpNet> + '_ {
        self.addrs.iter().filter_map(|cidr| match parse_cidr(cidr) {
            Ok(net) => Some(net),
            Err(e) => {
                tracing::debug!("Interface {}: {}", self.name, e);
                None
            }
        })
    }
}

/// Parse a CIDR string, keeping the host address
///
/// `"10.0.0.5/24"` yields `10.0.0.5/24`, not the network `10.0.0.0/24`.
pub fn parse_cidr(cidr: &str) -> Result<IpNet> {
    cidr.parse::<IpNet>()
        .map_err(|e| Error::address_skipped(cidr, e))
}

/// Clamp a wire MTU into the descriptor range
fn clamp_mtu(name: &str, mtu: i64) -> u32 {
    u32::try_from(mtu).unwrap_or_else(|_| {
        let clamped = if mtu < 0 { 0 } else { u32::MAX };
        warn!("Interface {}: MTU {} out of range, using {}", name, mtu, clamped);
        clamped
    })
}

/// List whose `null` elements become zero values
fn zeroed<T: Default>(items: Vec<Option<T>>) -> Vec<T> {
    items.into_iter().map(Option::unwrap_or_default).collect()
}

impl<'de> Deserialize<'de> for ConnectivitySnapshot {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SnapshotVisitor)
    }
}

struct SnapshotVisitor;

impl<'de> Visitor<'de> for SnapshotVisitor {
    type Value = ConnectivitySnapshot;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a network state object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut snapshot = ConnectivitySnapshot::default();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("Interfaces") {
                if let Some(records) = map.next_value::<Option<Vec<Option<InterfaceRecord>>>>()? {
                    snapshot.interfaces = zeroed(records);
                }
            } else if key.eq_ignore_ascii_case("DefaultInterface") {
                if let Some(name) = map.next_value::<Option<String>>()? {
                    snapshot.default_interface = name;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(snapshot)
    }
}

impl<'de> Deserialize<'de> for InterfaceRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = InterfaceRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an interface object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut name = String::new();
        let mut mtu: i64 = 0;
        let mut addrs = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("Name") {
                if let Some(value) = map.next_value::<Option<String>>()? {
                    name = value;
                }
            } else if key.eq_ignore_ascii_case("MTU") {
                if let Some(value) = map.next_value::<Option<i64>>()? {
                    mtu = value;
                }
            } else if key.eq_ignore_ascii_case("Addrs") {
                if let Some(value) = map.next_value::<Option<Vec<Option<String>>>>()? {
                    addrs = zeroed(value);
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(InterfaceRecord {
            mtu: clamp_mtu(&name, mtu),
            name,
            addrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_go_style_payload() {
        let snapshot = ConnectivitySnapshot::from_payload(
            r#"{"Interfaces":[{"Name":"wlan0","MTU":1500,"Addrs":["10.0.0.5/24"]}],"DefaultInterface":"wlan0"}"#,
        )
        .unwrap();

        assert_eq!(snapshot.default_interface, "wlan0");
        assert_eq!(snapshot.interfaces.len(), 1);
        assert_eq!(snapshot.interfaces[0].name, "wlan0");
        assert_eq!(snapshot.interfaces[0].mtu, 1500);
        assert_eq!(snapshot.interfaces[0].addrs, vec!["10.0.0.5/24".to_string()]);
    }

    #[test]
    fn test_keys_match_ignoring_case() {
        let snapshot = ConnectivitySnapshot::from_payload(
            r#"{"interfaces":[{"Name":"wlan0","Mtu":1500,"ADDRS":["10.0.0.5/24"]}],"defaultinterface":"wlan0"}"#,
        )
        .unwrap();
        assert_eq!(snapshot.interfaces[0].name, "wlan0");
        assert_eq!(snapshot.interfaces[0].mtu, 1500);
        assert_eq!(snapshot.interfaces[0].addrs, vec!["10.0.0.5/24".to_string()]);
        assert_eq!(snapshot.default_interface, "wlan0");
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let snapshot =
            ConnectivitySnapshot::from_payload(r#"{"Interfaces":[{"Name":"a","name":"b","MTU":9000,"mtu":1500}]}"#)
                .unwrap();
        assert_eq!(snapshot.interfaces[0].name, "b");
        assert_eq!(snapshot.interfaces[0].mtu, 1500);

        // null does not clear an earlier value
        let snapshot =
            ConnectivitySnapshot::from_payload(r#"{"DefaultInterface":"wlan0","defaultInterface":null}"#).unwrap();
        assert_eq!(snapshot.default_interface, "wlan0");
    }

    #[test]
    fn test_missing_and_null_fields_take_zero_values() {
        let snapshot = ConnectivitySnapshot::from_payload(
            r#"{"Interfaces":[{"Name":"lo","MTU":null,"Addrs":null},null],"DefaultInterface":null,"Extra":1}"#,
        )
        .unwrap();
        assert_eq!(snapshot.interfaces[0].mtu, 0);
        assert!(snapshot.interfaces[0].addrs.is_empty());
        assert_eq!(snapshot.interfaces[1], InterfaceRecord::default());
        assert!(!snapshot.has_default_interface());

        let snapshot = ConnectivitySnapshot::from_payload(r#"{"Interfaces":[{"Name":"lo","Addrs":[null,"127.0.0.1/8"]}]}"#)
            .unwrap();
        assert_eq!(snapshot.interfaces[0].addrs, vec![String::new(), "127.0.0.1/8".to_string()]);

        let snapshot = ConnectivitySnapshot::from_payload("{}").unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot, ConnectivitySnapshot::default());
    }

    #[test]
    fn test_out_of_range_mtu_is_clamped() {
        let snapshot = ConnectivitySnapshot::from_payload(
            r#"{"Interfaces":[{"Name":"wlan0","MTU":-1},{"Name":"jumbo","MTU":99999999999}]}"#,
        )
        .unwrap();
        assert_eq!(snapshot.interfaces[0].mtu, 0);
        assert_eq!(snapshot.interfaces[1].mtu, u32::MAX);
    }

    #[test]
    fn test_structural_failures() {
        for payload in [
            "",
            "not json",
            "null",
            "[]",
            r#"[[], ""]"#,
            r#""wlan0""#,
            r#"{"Interfaces": "wlan0"}"#,
            r#"{"Interfaces": [{"Name": "wlan0", "MTU": 1500.5}]}"#,
            r#"{"Interfaces": [{"Name": "wlan0", "MTU": 18446744073709551615}]}"#,
            r#"{"Interfaces": [{"Name": 7}]}"#,
            r#"{"DefaultInterface": 3}"#,
            r#"{"DefaultInterface": "wlan0"} trailing"#,
        ] {
            let result = ConnectivitySnapshot::from_payload(payload);
            assert!(
                matches!(result, Err(Error::Parse(_))),
                "payload {:?} should be rejected, got {:?}",
                payload,
                result
            );
        }
    }

    #[test]
    fn test_parse_error_reports_position() {
        let payload = "{\n  \"Interfaces\": [\n    {\"Name\": \"wlan0\", \"MTU\": \"1500\"}\n  ]\n}";
        match ConnectivitySnapshot::from_payload(payload) {
            Err(Error::Parse(e)) => {
                assert_eq!(e.line(), 3);
                assert!(e.column() > 0);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_round_trip_uses_wire_names() {
        let snapshot = ConnectivitySnapshot {
            interfaces: vec![InterfaceRecord::new("wlan0", 1500).with_addr("10.0.0.5/24")],
            default_interface: "wlan0".to_string(),
        };
        let payload = snapshot.to_payload().unwrap();
        assert!(payload.contains(r#""DefaultInterface":"wlan0""#));
        assert!(payload.contains(r#""MTU":1500"#));
        assert_eq!(ConnectivitySnapshot::from_payload(&payload).unwrap(), snapshot);
    }

    #[test]
    fn test_parse_cidr_keeps_host_address() {
        let net = parse_cidr("10.0.0.5/24").unwrap();
        assert_eq!(net.addr().to_string(), "10.0.0.5");
        assert_eq!(net.prefix_len(), 24);

        assert!(matches!(
            parse_cidr("bad-cidr"),
            Err(Error::AddressSkipped { .. })
        ));
        assert!(parse_cidr("10.0.0.5").is_err());
        assert!(parse_cidr("fe80::1%wlan0/64").is_err());
        assert!(parse_cidr("fe80::1/64").is_ok());
    }

    #[test]
    fn test_parsed_addrs_skips_malformed() {
        let record = InterfaceRecord::new("wlan0", 1500)
            .with_addr("bad-cidr")
            .with_addr("192.168.1.5/24");
        let addrs: Vec<IpNet> = record.parsed_addrs().collect();
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].to_string(), "192.168.1.5/24");
    }

    #[test]
    fn test_interfaces_named_keeps_order() {
        let snapshot = ConnectivitySnapshot {
            interfaces: vec![
                InterfaceRecord::new("wlan0", 1500),
                InterfaceRecord::new("rmnet0", 1400),
                InterfaceRecord::new("wlan0", 1280),
            ],
            default_interface: String::new(),
        };
        let mtus: Vec<u32> = snapshot.interfaces_named("wlan0").map(|r| r.mtu).collect();
        assert_eq!(mtus, vec![1500, 1280]);
    }
}

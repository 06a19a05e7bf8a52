//! Attribute decoding: one TLV record in, one named field out.
//!
//! Attribute type codes index fixed name tables (the IFLA_* / IFA_* sets);
//! codes past the table end are unrecognized, never an error. Each decode
//! produces a tagged [`DecodedAttr`] so callers can tell "decoded",
//! "unknown to us", and "corrupt" apart without sentinel values.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use tracing::{debug, trace};

use crate::attr::{AttrIter, NLA_HDRLEN};
use crate::error::Result;
use crate::stats::StatsBlock;

/// Decoded attribute values, keyed by field name.
pub type AttributeMap = BTreeMap<&'static str, AttrValue>;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
#[cfg_attr(feature = "output", serde(untagged))]
pub enum AttrValue {
    /// Single-byte unsigned integer.
    U8(u8),
    /// Four-byte unsigned integer, little endian.
    U32(u32),
    /// NUL-terminated ASCII text.
    Text(String),
    /// Hardware address, colon-separated uppercase hex octets.
    Mac(String),
    /// IPv4 address.
    Ipv4(Ipv4Addr),
    /// Opaque bytes as lowercase hex.
    Hex(String),
    /// Interface counter block.
    Stats(StatsBlock),
}

impl AttrValue {
    /// The value as text, if it is a text field.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) | AttrValue::Mac(s) | AttrValue::Hex(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an unsigned integer, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttrValue::U8(v) => Some(u64::from(*v)),
            AttrValue::U32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    /// The value as a counter block, if it is one.
    pub fn as_stats(&self) -> Option<&StatsBlock> {
        match self {
            AttrValue::Stats(s) => Some(s),
            _ => None,
        }
    }
}

/// Outcome of decoding one attribute record.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedAttr {
    /// A recognized field and its decoded value.
    Value(&'static str, AttrValue),
    /// Type code or length combination this crate does not know.
    Unrecognized,
    /// A recognized field whose payload does not decode.
    Malformed,
}

/// IFLA_* codes the link decoder treats specially.
pub(crate) mod link_attrs {
    pub const ADDRESS: u16 = 1;
    pub const BROADCAST: u16 = 2;
    pub const IFNAME: u16 = 3;
    pub const QDISC: u16 = 6;
    pub const STATS: u16 = 7;
    pub const IFALIAS: u16 = 20;
    pub const STATS64: u16 = 23;
    pub const PHYS_PORT_ID: u16 = 34;
    pub const PHYS_SWITCH_ID: u16 = 36;
}

/// IFA_* codes the address decoder treats specially.
pub(crate) mod addr_attrs {
    pub const ADDRESS: u16 = 1;
    pub const LOCAL: u16 = 2;
    pub const LABEL: u16 = 3;
    pub const BROADCAST: u16 = 4;
    pub const ANYCAST: u16 = 5;
    pub const MULTICAST: u16 = 7;
}

/// Field names for IFLA_* codes, indexed by type code.
const LINK_ATTR_NAMES: [&str; 44] = [
    "none",
    "address",
    "broadcast",
    "ifname",
    "mtu",
    "link",
    "qdisc",
    "stats",
    "cost",
    "priority",
    "master",
    "wireless",
    "protinfo",
    "txqlen",
    "map",
    "weight",
    "operstate",
    "linkmode",
    "linkinfo",
    "net_ns_pid",
    "ifalias",
    "num_vf",
    "vfinfo_list",
    "stats64",
    "vf_ports",
    "port_self",
    "af_spec",
    "group",
    "net_ns_fd",
    "ext_mask",
    "promiscuity",
    "num_tx_queues",
    "num_rx_queues",
    "carrier",
    "phys_port_id",
    "carrier_changes",
    "phys_switch_id",
    "link_netnsid",
    "phys_port_name",
    "proto_down",
    "gso_max_segs",
    "gso_max_size",
    "pad",
    "xdp",
];

/// Field names for IFA_* codes, indexed by type code.
const ADDR_ATTR_NAMES: [&str; 12] = [
    "none",
    "address",
    "local",
    "label",
    "broadcast",
    "anycast",
    "cacheinfo",
    "multicast",
    "flags",
    "rt_priority",
    "target_netnsid",
    "proto",
];

/// Decode one link-message (IFLA_*) attribute.
pub fn decode_link_attr(code: u16, payload: &[u8]) -> DecodedAttr {
    let Some(&name) = LINK_ATTR_NAMES.get(usize::from(code)) else {
        return DecodedAttr::Unrecognized;
    };

    match code {
        link_attrs::ADDRESS | link_attrs::BROADCAST => {
            DecodedAttr::Value(name, AttrValue::Mac(colon_hex(payload)))
        }
        link_attrs::IFNAME | link_attrs::IFALIAS | link_attrs::QDISC => {
            match ascii_until_nul(payload) {
                Some(text) => DecodedAttr::Value(name, AttrValue::Text(text)),
                None => DecodedAttr::Malformed,
            }
        }
        // Both counter encodings land under the "stats" field; the block
        // parser arbitrates which one sticks.
        link_attrs::STATS => match StatsBlock::from_wire32(payload) {
            Some(stats) => DecodedAttr::Value("stats", AttrValue::Stats(stats)),
            None => DecodedAttr::Malformed,
        },
        link_attrs::STATS64 => match StatsBlock::from_wire64(payload) {
            Some(stats) => DecodedAttr::Value("stats", AttrValue::Stats(stats)),
            None => DecodedAttr::Malformed,
        },
        link_attrs::PHYS_PORT_ID | link_attrs::PHYS_SWITCH_ID => {
            DecodedAttr::Value(name, AttrValue::Hex(lower_hex(payload)))
        }
        _ => decode_generic(name, payload),
    }
}

/// Decode one address-message (IFA_*) attribute.
pub fn decode_addr_attr(code: u16, payload: &[u8]) -> DecodedAttr {
    let Some(&name) = ADDR_ATTR_NAMES.get(usize::from(code)) else {
        return DecodedAttr::Unrecognized;
    };

    match code {
        addr_attrs::ADDRESS
        | addr_attrs::LOCAL
        | addr_attrs::BROADCAST
        | addr_attrs::ANYCAST
        | addr_attrs::MULTICAST => match <[u8; 4]>::try_from(payload) {
            Ok(octets) => DecodedAttr::Value(name, AttrValue::Ipv4(Ipv4Addr::from(octets))),
            // IPv6 payloads land here; this crate only decodes IPv4.
            Err(_) => DecodedAttr::Unrecognized,
        },
        addr_attrs::LABEL => match ascii_until_nul(payload) {
            Some(text) => DecodedAttr::Value(name, AttrValue::Text(text)),
            None => DecodedAttr::Malformed,
        },
        _ => decode_generic(name, payload),
    }
}

/// Fallback decode by payload length: 1 byte -> u8, 4 bytes -> u32.
fn decode_generic(name: &'static str, payload: &[u8]) -> DecodedAttr {
    match payload {
        [b] => DecodedAttr::Value(name, AttrValue::U8(*b)),
        [a, b, c, d] => {
            DecodedAttr::Value(name, AttrValue::U32(u32::from_le_bytes([*a, *b, *c, *d])))
        }
        _ => DecodedAttr::Unrecognized,
    }
}

/// Walk a link message's attribute block into a map.
///
/// A record declaring more bytes than remain fails the whole block; the
/// containing message must be dropped. Unrecognized and malformed records
/// are skipped without affecting their siblings. `stats` never overwrites a
/// counter block already present; `stats64` always does.
pub(crate) fn parse_link_attrs(data: &[u8]) -> Result<AttributeMap> {
    let mut map = AttributeMap::new();
    if data.len() <= NLA_HDRLEN {
        return Ok(map);
    }
    for record in AttrIter::new(data) {
        let (code, payload) = record?;
        match decode_link_attr(code, payload) {
            DecodedAttr::Value(name, value) => {
                if code == link_attrs::STATS && map.contains_key("stats") {
                    continue;
                }
                map.insert(name, value);
            }
            DecodedAttr::Unrecognized => {
                trace!(code, len = payload.len(), "unrecognized link attribute");
            }
            DecodedAttr::Malformed => {
                debug!(code, len = payload.len(), "malformed link attribute");
            }
        }
    }
    Ok(map)
}

/// Walk an address message's attribute block into a map.
pub(crate) fn parse_addr_attrs(data: &[u8]) -> Result<AttributeMap> {
    let mut map = AttributeMap::new();
    if data.len() <= NLA_HDRLEN {
        return Ok(map);
    }
    for record in AttrIter::new(data) {
        let (code, payload) = record?;
        match decode_addr_attr(code, payload) {
            DecodedAttr::Value(name, value) => {
                map.insert(name, value);
            }
            DecodedAttr::Unrecognized => {
                trace!(code, len = payload.len(), "unrecognized address attribute");
            }
            DecodedAttr::Malformed => {
                debug!(code, len = payload.len(), "malformed address attribute");
            }
        }
    }
    Ok(map)
}

/// ASCII text up to the first NUL; bytes after the NUL are ignored.
fn ascii_until_nul(data: &[u8]) -> Option<String> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let head = &data[..end];
    if !head.is_ascii() {
        return None;
    }
    std::str::from_utf8(head).ok().map(str::to_owned)
}

/// Colon-separated uppercase hex octets (hardware address form).
fn colon_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Lowercase hex with no separator (opaque identifier form).
fn lower_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::stats::{STATS32_LEN, STATS64_LEN};

    #[test]
    fn mac_is_uppercase_colon_hex() {
        let decoded = decode_link_attr(link_attrs::ADDRESS, &[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]);
        assert_eq!(
            decoded,
            DecodedAttr::Value("address", AttrValue::Mac("DE:AD:BE:EF:00:01".into()))
        );
    }

    #[test]
    fn ifname_stops_at_nul() {
        let decoded = decode_link_attr(link_attrs::IFNAME, b"eth0\0garbage");
        assert_eq!(
            decoded,
            DecodedAttr::Value("ifname", AttrValue::Text("eth0".into()))
        );
    }

    #[test]
    fn non_ascii_text_is_malformed() {
        assert_eq!(
            decode_link_attr(link_attrs::IFNAME, &[0xff, 0xfe, 0x00]),
            DecodedAttr::Malformed
        );
    }

    #[test]
    fn generic_lengths() {
        assert_eq!(
            decode_link_attr(33, &[1]), // carrier
            DecodedAttr::Value("carrier", AttrValue::U8(1))
        );
        assert_eq!(
            decode_link_attr(4, &[0x00, 0x00, 0x01, 0x00]), // mtu
            DecodedAttr::Value("mtu", AttrValue::U32(65536))
        );
        assert_eq!(decode_link_attr(4, &[1, 2]), DecodedAttr::Unrecognized);
    }

    #[test]
    fn out_of_table_code_is_unrecognized() {
        assert_eq!(decode_link_attr(200, &[0; 4]), DecodedAttr::Unrecognized);
        assert_eq!(decode_addr_attr(50, &[0; 4]), DecodedAttr::Unrecognized);
    }

    #[test]
    fn ipv4_fields_decode_dotted() {
        let decoded = decode_addr_attr(addr_attrs::ADDRESS, &[192, 168, 1, 10]);
        assert_eq!(
            decoded,
            DecodedAttr::Value("address", AttrValue::Ipv4(Ipv4Addr::new(192, 168, 1, 10)))
        );
        // 16-byte (IPv6) payload is not ours to decode
        assert_eq!(
            decode_addr_attr(addr_attrs::ADDRESS, &[0u8; 16]),
            DecodedAttr::Unrecognized
        );
    }

    #[test]
    fn phys_port_id_is_lower_hex() {
        assert_eq!(
            decode_link_attr(link_attrs::PHYS_PORT_ID, &[0xAB, 0x01]),
            DecodedAttr::Value("phys_port_id", AttrValue::Hex("ab01".into()))
        );
    }

    #[test]
    fn stats64_wins_over_stats() {
        let mut w32 = vec![0u8; STATS32_LEN];
        w32[0] = 1; // rx_packets = 1
        let mut w64 = vec![0u8; STATS64_LEN];
        w64[0] = 9; // rx_packets = 9

        // stats64 first: a later stats must not overwrite it.
        let mut block = fixtures::attr(link_attrs::STATS64, &w64);
        block.extend_from_slice(&fixtures::attr(link_attrs::STATS, &w32));
        let map = parse_link_attrs(&block).unwrap();
        assert_eq!(map["stats"].as_stats().unwrap().rx_packets, 9);

        // stats first: a later stats64 must overwrite it.
        let mut block = fixtures::attr(link_attrs::STATS, &w32);
        block.extend_from_slice(&fixtures::attr(link_attrs::STATS64, &w64));
        let map = parse_link_attrs(&block).unwrap();
        assert_eq!(map["stats"].as_stats().unwrap().rx_packets, 9);
    }

    #[test]
    fn short_stats_payload_is_skipped() {
        let block = fixtures::attr(link_attrs::STATS, &[0u8; 8]);
        let map = parse_link_attrs(&block).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn tiny_block_has_no_attributes() {
        assert!(parse_link_attrs(&[]).unwrap().is_empty());
        assert!(parse_link_attrs(&[0, 0, 0, 0]).unwrap().is_empty());
    }

    #[test]
    fn overlong_record_fails_the_block() {
        let mut block = fixtures::attr(link_attrs::IFNAME, b"eth0\0");
        block.extend_from_slice(&[0x40, 0x00, 0x04, 0x00]); // claims 64 bytes
        assert!(parse_link_attrs(&block).is_err());
    }
}

use winnow::Parser;

use crate::decode::{parse_link_attrs, AttrValue, AttributeMap};
use crate::types::link::{parse_ifinfomsg, InterfaceFlags, IFINFO_LEN};

/// An interface appeared, changed, or went away.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
pub struct LinkEvent {
    /// True for RTM_NEWLINK, false for RTM_DELLINK.
    pub exists: bool,
    /// Address family from the fixed header.
    pub family: u8,
    /// ARPHRD_* device type.
    pub dev_type: u16,
    /// Kernel interface index.
    pub ifindex: i32,
    /// Interface flag word.
    pub flags: InterfaceFlags,
    /// Which flag bits the event concerns.
    pub change_mask: u32,
    /// Decoded attributes, keyed by field name.
    pub attrs: AttributeMap,
}

impl LinkEvent {
    /// Decode a link message body. Returns `None` when the message cannot
    /// yield a usable event: short header, broken attribute block, or a
    /// missing or empty interface name.
    pub(crate) fn parse(exists: bool, payload: &[u8]) -> Option<Self> {
        if payload.len() < IFINFO_LEN {
            return None;
        }
        let mut input = payload;
        let hdr = parse_ifinfomsg.parse_next(&mut input).ok()?;
        let attrs = parse_link_attrs(input).ok()?;
        let event = LinkEvent {
            exists,
            family: hdr.ifi_family,
            dev_type: hdr.ifi_type,
            ifindex: hdr.ifi_index,
            flags: InterfaceFlags(hdr.ifi_flags),
            change_mask: hdr.ifi_change,
            attrs,
        };
        if event.name().is_none_or(str::is_empty) {
            return None;
        }
        Some(event)
    }

    /// Interface name. Guaranteed present and non-empty after `parse`.
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("ifname").and_then(AttrValue::as_str)
    }

    /// Administrative up bit.
    pub fn up(&self) -> bool {
        self.flags.is_up()
    }

    /// Carrier state from the `carrier` attribute. `None` when the kernel
    /// did not report one.
    pub fn carrier(&self) -> Option<bool> {
        self.attrs
            .get("carrier")
            .and_then(AttrValue::as_u64)
            .map(|v| v != 0)
    }

    /// Hardware address, if the kernel reported one.
    pub fn mac(&self) -> Option<&str> {
        self.attrs.get("address").and_then(AttrValue::as_str)
    }

    /// Maximum transmission unit, if reported.
    pub fn mtu(&self) -> Option<u32> {
        self.attrs
            .get("mtu")
            .and_then(AttrValue::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// Interface counters, if reported.
    pub fn stats(&self) -> Option<&crate::stats::StatsBlock> {
        self.attrs.get("stats").and_then(AttrValue::as_stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn newlink_decodes_header_and_attrs() {
        let mut body = fixtures::ifinfomsg(2, 0x43, 0);
        body.extend_from_slice(&fixtures::attr(3, b"eth0\0"));
        body.extend_from_slice(&fixtures::attr(1, &[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]));
        body.extend_from_slice(&fixtures::attr(4, &1500u32.to_le_bytes()));
        body.extend_from_slice(&fixtures::attr(33, &[1]));

        let event = LinkEvent::parse(true, &body).unwrap();
        assert!(event.exists);
        assert_eq!(event.ifindex, 2);
        assert_eq!(event.name(), Some("eth0"));
        assert!(event.up());
        assert_eq!(event.carrier(), Some(true));
        assert_eq!(event.mac(), Some("DE:AD:BE:EF:00:01"));
        assert_eq!(event.mtu(), Some(1500));
    }

    #[test]
    fn carrier_comes_from_the_attribute_not_the_flags() {
        // Flags word says up only; the carrier attribute alone decides.
        let mut body = fixtures::ifinfomsg(2, 0x1, 0);
        body.extend_from_slice(&fixtures::attr(3, b"eth0\0"));
        body.extend_from_slice(&fixtures::attr(33, &[1]));
        let event = LinkEvent::parse(true, &body).unwrap();
        assert_eq!(event.carrier(), Some(true));

        let mut body = fixtures::ifinfomsg(2, 0x1, 0);
        body.extend_from_slice(&fixtures::attr(3, b"eth0\0"));
        body.extend_from_slice(&fixtures::attr(33, &[0]));
        let event = LinkEvent::parse(true, &body).unwrap();
        assert_eq!(event.carrier(), Some(false));
    }

    #[test]
    fn carrier_absent_is_unknown() {
        // Even with lower_up set in the flags word.
        let mut body = fixtures::ifinfomsg(2, 0x0001_0001, 0);
        body.extend_from_slice(&fixtures::attr(3, b"eth0\0"));
        let event = LinkEvent::parse(true, &body).unwrap();
        assert_eq!(event.carrier(), None);
    }

    #[test]
    fn missing_ifname_drops_the_event() {
        let mut body = fixtures::ifinfomsg(3, 0, 0);
        body.extend_from_slice(&fixtures::attr(4, &1500u32.to_le_bytes()));
        assert!(LinkEvent::parse(true, &body).is_none());
    }

    #[test]
    fn short_header_drops_the_event() {
        assert!(LinkEvent::parse(true, &[0u8; 8]).is_none());
    }

    #[test]
    fn broken_attr_block_drops_the_event() {
        let mut body = fixtures::ifinfomsg(2, 0, 0);
        body.extend_from_slice(&fixtures::attr(3, b"eth0\0"));
        body.extend_from_slice(&[0x40, 0x00, 0x01, 0x00]); // claims 64 bytes
        assert!(LinkEvent::parse(true, &body).is_none());
    }
}

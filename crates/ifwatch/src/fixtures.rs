//! Hand-built wire frames and events for tests.
//!
//! Not part of the public API; kept compiled-in so integration tests can
//! use the same builders as unit tests.
#![doc(hidden)]

use std::net::Ipv4Addr;

use crate::decode::{AttrValue, AttributeMap};
use crate::message::{NlMsgType, NLMSG_HDRLEN};
use crate::messages::{AddressEvent, LinkEvent};
use crate::types::link::InterfaceFlags;

/// Frame a payload with a 16-byte message header carrying the total length.
pub fn nlmsg(msg_type: u16, payload: &[u8]) -> Vec<u8> {
    let total = NLMSG_HDRLEN + payload.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&msg_type.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u32.to_le_bytes()); // seq
    out.extend_from_slice(&0u32.to_le_bytes()); // pid
    out.extend_from_slice(payload);
    out
}

/// One attribute record: 4-byte header, unpadded length, padded payload.
pub fn attr(code: u16, payload: &[u8]) -> Vec<u8> {
    let len = 4 + payload.len();
    let mut out = Vec::with_capacity((len + 3) & !3);
    out.extend_from_slice(&(len as u16).to_le_bytes());
    out.extend_from_slice(&code.to_le_bytes());
    out.extend_from_slice(payload);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

/// A 16-byte ifinfomsg with family, pad, and device type zeroed.
pub fn ifinfomsg(ifindex: i32, flags: u32, change: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(16);
    out.push(0); // family
    out.push(0); // pad
    out.extend_from_slice(&0u16.to_le_bytes()); // device type
    out.extend_from_slice(&ifindex.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&change.to_le_bytes());
    out
}

/// An 8-byte ifaddrmsg.
pub fn ifaddrmsg(family: u8, prefix_len: u8, scope: u8, ifindex: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.push(family);
    out.push(prefix_len);
    out.push(0); // flags
    out.push(scope);
    out.extend_from_slice(&ifindex.to_le_bytes());
    out
}

/// A link message body: header plus a name attribute.
pub fn link_body(ifindex: i32, flags: u32, change: u32, name: &str) -> Vec<u8> {
    let mut body = ifinfomsg(ifindex, flags, change);
    let mut ifname = name.as_bytes().to_vec();
    ifname.push(0);
    body.extend_from_slice(&attr(3, &ifname));
    body
}

/// A framed RTM_NEWLINK with a name and a carrier attribute.
pub fn newlink(ifindex: i32, flags: u32, name: &str) -> Vec<u8> {
    let mut body = link_body(ifindex, flags, 0, name);
    body.extend_from_slice(&attr(33, &[1])); // carrier
    nlmsg(NlMsgType::RTM_NEWLINK, &body)
}

/// A framed RTM_NEWADDR with label and address attributes.
pub fn newaddr(ifindex: u32, prefix_len: u8, label: &str, address: [u8; 4]) -> Vec<u8> {
    let mut body = ifaddrmsg(2, prefix_len, 0, ifindex);
    body.extend_from_slice(&attr(1, &address));
    let mut label_bytes = label.as_bytes().to_vec();
    label_bytes.push(0);
    body.extend_from_slice(&attr(3, &label_bytes));
    nlmsg(NlMsgType::RTM_NEWADDR, &body)
}

/// A framed NLMSG_DONE terminator.
pub fn done() -> Vec<u8> {
    nlmsg(NlMsgType::DONE, &[0u8; 4])
}

/// A decoded wired-up interface: up, carrier, mac, mtu.
pub fn link_eth0() -> LinkEvent {
    let mut attrs = AttributeMap::new();
    attrs.insert("ifname", AttrValue::Text("eth0".into()));
    attrs.insert("address", AttrValue::Mac("DE:AD:BE:EF:00:01".into()));
    attrs.insert("mtu", AttrValue::U32(1500));
    attrs.insert("carrier", AttrValue::U8(1));
    LinkEvent {
        exists: true,
        family: 0,
        dev_type: 1,
        ifindex: 2,
        flags: InterfaceFlags(0x43), // up, broadcast, running
        change_mask: 0,
        attrs,
    }
}

/// A decoded loopback interface with no carrier attribute.
pub fn link_loopback() -> LinkEvent {
    let mut attrs = AttributeMap::new();
    attrs.insert("ifname", AttrValue::Text("lo".into()));
    attrs.insert("mtu", AttrValue::U32(65536));
    LinkEvent {
        exists: true,
        family: 0,
        dev_type: 772,
        ifindex: 1,
        flags: InterfaceFlags(0x49), // up, loopback, running
        change_mask: 0,
        attrs,
    }
}

/// A decoded IPv4 address on eth0.
pub fn addr_eth0() -> AddressEvent {
    let mut attrs = AttributeMap::new();
    attrs.insert("address", AttrValue::Ipv4(Ipv4Addr::new(192, 168, 1, 10)));
    attrs.insert("label", AttrValue::Text("eth0".into()));
    AddressEvent {
        exists: true,
        family: 2,
        prefix_len: 24,
        flags: 0,
        scope: 0,
        ifindex: 2,
        attrs,
    }
}

use std::net::Ipv4Addr;

use winnow::Parser;

use crate::decode::{parse_addr_attrs, AttrValue, AttributeMap};
use crate::types::addr::{parse_ifaddrmsg, scope_name, IFADDR_LEN};

/// An address was added to or removed from an interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
pub struct AddressEvent {
    /// True for RTM_NEWADDR, false for RTM_DELADDR.
    pub exists: bool,
    /// Address family from the fixed header.
    pub family: u8,
    /// Prefix length in bits.
    pub prefix_len: u8,
    /// IFA_F_* flag byte.
    pub flags: u8,
    /// Address scope (RT_SCOPE_*).
    pub scope: u8,
    /// Kernel interface index.
    pub ifindex: u32,
    /// Decoded attributes, keyed by field name.
    pub attrs: AttributeMap,
}

impl AddressEvent {
    /// Decode an address message body. Returns `None` when the message
    /// cannot yield a usable event: short header, broken attribute block,
    /// or a missing or empty interface label.
    pub(crate) fn parse(exists: bool, payload: &[u8]) -> Option<Self> {
        if payload.len() < IFADDR_LEN {
            return None;
        }
        let mut input = payload;
        let hdr = parse_ifaddrmsg.parse_next(&mut input).ok()?;
        let attrs = parse_addr_attrs(input).ok()?;
        let event = AddressEvent {
            exists,
            family: hdr.ifa_family,
            prefix_len: hdr.ifa_prefixlen,
            flags: hdr.ifa_flags,
            scope: hdr.ifa_scope,
            ifindex: hdr.ifa_index,
            attrs,
        };
        if event.label().is_none_or(str::is_empty) {
            return None;
        }
        Some(event)
    }

    /// Interface label, which names the owning interface for IPv4.
    pub fn label(&self) -> Option<&str> {
        self.attrs.get("label").and_then(AttrValue::as_str)
    }

    /// The address itself, if the kernel reported an IPv4 one.
    pub fn address(&self) -> Option<Ipv4Addr> {
        match self.attrs.get("address") {
            Some(AttrValue::Ipv4(addr)) => Some(*addr),
            _ => None,
        }
    }

    /// Human name for the address scope.
    pub fn scope_name(&self) -> &'static str {
        scope_name(self.scope)
    }
}

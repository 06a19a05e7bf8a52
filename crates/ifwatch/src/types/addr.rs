//! Address assignment body structure.

use crate::parse::{PResult, parse_u8, parse_u32};

/// Wire size of struct ifaddrmsg.
pub const IFADDR_LEN: usize = 8;

/// Interface address message body (struct ifaddrmsg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfAddrMsg {
    /// Address family (AF_INET, AF_INET6).
    pub ifa_family: u8,
    /// Prefix length.
    pub ifa_prefixlen: u8,
    /// Address flags (IFA_F_*).
    pub ifa_flags: u8,
    /// Address scope (RT_SCOPE_*).
    pub ifa_scope: u8,
    /// Interface index.
    pub ifa_index: u32,
}

/// Parse struct ifaddrmsg: `u8 family | u8 prefixlen | u8 flags | u8 scope |
/// u32 index`.
pub(crate) fn parse_ifaddrmsg(input: &mut &[u8]) -> PResult<IfAddrMsg> {
    let ifa_family = parse_u8(input)?;
    let ifa_prefixlen = parse_u8(input)?;
    let ifa_flags = parse_u8(input)?;
    let ifa_scope = parse_u8(input)?;
    let ifa_index = parse_u32(input)?;
    Ok(IfAddrMsg {
        ifa_family,
        ifa_prefixlen,
        ifa_flags,
        ifa_scope,
        ifa_index,
    })
}

/// Human-readable name of an address scope.
pub fn scope_name(scope: u8) -> &'static str {
    match scope {
        0 => "global",
        200 => "site",
        253 => "link",
        254 => "host",
        255 => "nowhere",
        _ => "unknown",
    }
}

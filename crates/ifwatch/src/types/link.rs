//! Link (network interface) body structure and flag word.

use crate::parse::{PResult, parse_i32, parse_u8, parse_u16, parse_u32, skip};

/// Wire size of struct ifinfomsg.
pub const IFINFO_LEN: usize = 16;

/// Interface info message body (struct ifinfomsg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfInfoMsg {
    /// Address family (usually AF_UNSPEC).
    pub ifi_family: u8,
    /// Device type (ARPHRD_*).
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Device flags (IFF_*).
    pub ifi_flags: u32,
    /// Mask of flags that changed.
    pub ifi_change: u32,
}

/// Parse struct ifinfomsg: `u8 family | u8 pad | u16 type | i32 index |
/// u32 flags | u32 change`.
pub(crate) fn parse_ifinfomsg(input: &mut &[u8]) -> PResult<IfInfoMsg> {
    let ifi_family = parse_u8(input)?;
    skip(input, 1)?;
    let ifi_type = parse_u16(input)?;
    let ifi_index = parse_i32(input)?;
    let ifi_flags = parse_u32(input)?;
    let ifi_change = parse_u32(input)?;
    Ok(IfInfoMsg {
        ifi_family,
        ifi_type,
        ifi_index,
        ifi_flags,
        ifi_change,
    })
}

/// Names of the interface flag bits, LSB first (IFF_UP .. IFF_ECHO).
pub const FLAG_NAMES: [&str; 19] = [
    "up",
    "broadcast",
    "debug",
    "loopback",
    "pointopoint",
    "notrailers",
    "running",
    "noarp",
    "promisc",
    "allmulti",
    "master",
    "slave",
    "multicast",
    "portsel",
    "automedia",
    "dynamic",
    "lower_up",
    "dormant",
    "echo",
];

/// The raw interface flags word with the 19 named bits unpacked on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
pub struct InterfaceFlags(pub u32);

impl InterfaceFlags {
    /// The raw flags word.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Administrative up state (bit 0, IFF_UP).
    pub fn is_up(self) -> bool {
        self.0 & 1 != 0
    }

    /// Operational L1 up state (bit 16, IFF_LOWER_UP).
    pub fn is_lower_up(self) -> bool {
        self.0 & (1 << 16) != 0
    }

    /// Check a flag by its name.
    pub fn contains(self, name: &str) -> bool {
        FLAG_NAMES
            .iter()
            .position(|&n| n == name)
            .is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    /// Names of all set flags, in bit order.
    pub fn active(self) -> Vec<&'static str> {
        FLAG_NAMES
            .iter()
            .enumerate()
            .filter(|&(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, &name)| name)
            .collect()
    }
}

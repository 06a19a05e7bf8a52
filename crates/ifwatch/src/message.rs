//! Netlink message header and packet framing.

use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = std::mem::size_of::<NlMsgHdr>();

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Check if this message terminates a dump.
    pub fn is_done(&self) -> bool {
        self.nlmsg_type == NlMsgType::DONE
    }

    /// Convert header to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse header from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Netlink message types handled by this crate.
pub struct NlMsgType;

impl NlMsgType {
    /// End of multipart message (dump terminator).
    pub const DONE: u16 = 3;

    /// A link was created or changed.
    pub const RTM_NEWLINK: u16 = 16;
    /// A link was deleted.
    pub const RTM_DELLINK: u16 = 17;
    /// Request a link dump.
    pub const RTM_GETLINK: u16 = 18;

    /// An address was added.
    pub const RTM_NEWADDR: u16 = 20;
    /// An address was removed.
    pub const RTM_DELADDR: u16 = 21;
    /// Request an address dump.
    pub const RTM_GETADDR: u16 = 22;
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;

// Modifiers to GET requests
pub const NLM_F_ROOT: u16 = 0x100;
pub const NLM_F_MATCH: u16 = 0x200;
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

/// rtgen_family for dump requests.
const AF_PACKET: u32 = 17;

/// Encode the fixed 20-byte dump request for `RTM_GETLINK` / `RTM_GETADDR`.
///
/// nlmsghdr with `NLM_F_REQUEST | NLM_F_DUMP`, seq 1, followed by a 4-byte
/// rtgenmsg body selecting AF_PACKET.
pub fn dump_request(msg_type: u16, pid: u32) -> Vec<u8> {
    let header = NlMsgHdr {
        nlmsg_len: (NLMSG_HDRLEN + 4) as u32,
        nlmsg_type: msg_type,
        nlmsg_flags: NLM_F_REQUEST | NLM_F_DUMP,
        nlmsg_seq: 1,
        nlmsg_pid: pid,
    };
    let mut buf = Vec::with_capacity(NLMSG_HDRLEN + 4);
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(&AF_PACKET.to_le_bytes());
    buf
}

/// Iterator over the netlink messages in one socket read.
///
/// Each item is the message header plus the payload the header's declared
/// length covers. A header declaring more bytes than remain ends iteration;
/// the truncated tail is discarded, so later messages in the same read are
/// never mis-framed.
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Create a new message iterator over one received packet.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = (&'a NlMsgHdr, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        if data.len() < NLMSG_HDRLEN {
            return None;
        }

        let header = NlMsgHdr::from_bytes(data).ok()?;
        let msg_len = header.nlmsg_len as usize;
        if msg_len < NLMSG_HDRLEN || msg_len > data.len() {
            debug!(
                declared = msg_len,
                remaining = data.len(),
                "discarding truncated netlink message"
            );
            self.data = &[];
            return None;
        }

        let payload = &data[NLMSG_HDRLEN..msg_len];
        self.data = &data[msg_len..];
        Some((header, payload))
    }
}

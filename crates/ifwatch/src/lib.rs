//! rtnetlink interface watching for Linux.
//!
//! Decodes link and IPv4 address messages straight off a NETLINK_ROUTE
//! socket and exposes them as a filtered, timeout-bounded event stream.
//! All I/O is blocking and single threaded.

pub mod attr;
pub mod decode;
mod error;
pub mod filter;
pub mod message;
pub mod messages;
mod parse;
mod socket;
pub mod stats;
pub mod stream;
pub mod sysfs;
pub mod types;

pub mod fixtures;

pub use attr::{AttrIter, NlAttr};
pub use decode::{AttrValue, AttributeMap, DecodedAttr};
pub use error::{Error, Result};
pub use filter::EventFilter;
pub use message::{dump_request, MessageIter, NlMsgHdr, NlMsgType, NLMSG_HDRLEN};
pub use messages::{decode_frame, AddressEvent, Decoded, Event, LinkEvent};
pub use socket::{rtnetlink_groups, NetlinkSocket};
pub use stats::StatsBlock;
pub use stream::{DumpKind, EventStream, EventStreamBuilder};
pub use types::link::InterfaceFlags;

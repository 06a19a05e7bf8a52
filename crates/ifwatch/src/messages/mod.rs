//! Message bodies lifted into events.
//!
//! [`decode_frame`] is the single entry point: it maps a message type and
//! payload to an [`Event`], to stream control ([`Decoded::Done`]), or to
//! nothing at all. Malformed bodies decode to [`Decoded::Ignored`], never
//! to an error; one bad message must not take down the stream.

pub mod addr;
pub mod link;

use tracing::debug;

pub use addr::AddressEvent;
pub use link::LinkEvent;

use crate::message::NlMsgType;
use crate::types::addr::IFADDR_LEN;
use crate::types::link::IFINFO_LEN;

/// One decoded interface event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
#[cfg_attr(feature = "output", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Event {
    /// Interface state change.
    Link(LinkEvent),
    /// Address add or remove.
    Address(AddressEvent),
}

impl Event {
    /// Interface name the event concerns, when one was decoded.
    pub fn name(&self) -> Option<&str> {
        match self {
            Event::Link(link) => link.name(),
            Event::Address(addr) => addr.label(),
        }
    }
}

/// Outcome of decoding one framed message.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A usable event.
    Event(Event),
    /// End of a dump (NLMSG_DONE).
    Done,
    /// Unknown type or undecodable body.
    Ignored,
}

/// Decode one message payload by its header type.
pub fn decode_frame(msg_type: u16, payload: &[u8]) -> Decoded {
    match msg_type {
        NlMsgType::DONE => Decoded::Done,
        NlMsgType::RTM_NEWLINK | NlMsgType::RTM_DELLINK if payload.len() >= IFINFO_LEN => {
            let exists = msg_type == NlMsgType::RTM_NEWLINK;
            match LinkEvent::parse(exists, payload) {
                Some(event) => Decoded::Event(Event::Link(event)),
                None => {
                    debug!(msg_type, len = payload.len(), "dropped link message");
                    Decoded::Ignored
                }
            }
        }
        NlMsgType::RTM_NEWADDR | NlMsgType::RTM_DELADDR if payload.len() >= IFADDR_LEN => {
            let exists = msg_type == NlMsgType::RTM_NEWADDR;
            match AddressEvent::parse(exists, payload) {
                Some(event) => Decoded::Event(Event::Address(event)),
                None => {
                    debug!(msg_type, len = payload.len(), "dropped address message");
                    Decoded::Ignored
                }
            }
        }
        _ => Decoded::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn done_is_stream_control() {
        assert_eq!(decode_frame(NlMsgType::DONE, &[]), Decoded::Done);
    }

    #[test]
    fn unknown_type_is_ignored() {
        assert_eq!(decode_frame(2, &[0u8; 32]), Decoded::Ignored);
    }

    #[test]
    fn short_link_body_is_ignored() {
        assert_eq!(
            decode_frame(NlMsgType::RTM_NEWLINK, &[0u8; 8]),
            Decoded::Ignored
        );
    }

    #[test]
    fn dellink_clears_exists() {
        let body = fixtures::link_body(2, 0, 0, "eth0");
        match decode_frame(NlMsgType::RTM_DELLINK, &body) {
            Decoded::Event(Event::Link(link)) => assert!(!link.exists),
            other => panic!("unexpected decode: {other:?}"),
        }
    }
}

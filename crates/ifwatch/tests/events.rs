//! End-to-end decode scenarios over built wire frames.

use std::net::Ipv4Addr;
use std::time::Duration;

use ifwatch::{
    decode_frame, fixtures, Decoded, Event, EventFilter, EventStream, MessageIter, NlMsgType,
};

/// Walk a datagram the way a stream does: decode frames until a terminator,
/// keep what the filter admits, and report whether the terminator was seen.
fn run(data: &[u8], filter: &EventFilter) -> (Vec<Event>, bool) {
    let mut events = Vec::new();
    for (header, payload) in MessageIter::new(data) {
        match decode_frame(header.nlmsg_type, payload) {
            Decoded::Event(event) => {
                if filter.admits(&event) {
                    events.push(event);
                }
            }
            Decoded::Done => return (events, true),
            Decoded::Ignored => {}
        }
    }
    (events, false)
}

fn filter(accept: &[&str], reject: &[&str], strict: bool) -> EventFilter {
    let accept: Vec<String> = accept.iter().map(|s| s.to_string()).collect();
    let reject: Vec<String> = reject.iter().map(|s| s.to_string()).collect();
    EventFilter::new(&accept, &reject, strict).unwrap()
}

#[test]
fn strict_newlink_with_carrier_is_admitted() {
    // Flags carry only the up bit; carrier must come from the attribute.
    let data = fixtures::newlink(2, 0x1, "eth0");
    let (events, done) = run(&data, &filter(&["eth*"], &[], true));
    assert!(!done);
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::Link(link) => {
            assert_eq!(link.name(), Some("eth0"));
            assert!(link.up());
            assert_eq!(link.carrier(), Some(true));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn loopback_is_rejected_by_pattern() {
    let mut data = fixtures::newlink(1, 0x49, "lo");
    data.extend_from_slice(&fixtures::newlink(2, 0x1, "eth0"));
    let (events, _) = run(&data, &filter(&["*"], &["lo"], false));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), Some("eth0"));
}

#[test]
fn newaddr_decodes_prefix_and_address() {
    let data = fixtures::newaddr(2, 24, "eth0", [192, 168, 1, 10]);
    let (events, _) = run(&data, &EventFilter::default());
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::Address(addr) => {
            assert!(addr.exists);
            assert_eq!(addr.prefix_len, 24);
            assert_eq!(addr.address(), Some(Ipv4Addr::new(192, 168, 1, 10)));
            assert_eq!(addr.label(), Some("eth0"));
            assert_eq!(addr.scope_name(), "global");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn terminator_is_reported() {
    let mut data = fixtures::newlink(2, 0x1, "eth0");
    data.extend_from_slice(&fixtures::done());
    let (events, done) = run(&data, &EventFilter::default());
    assert!(done);
    assert_eq!(events.len(), 1);
}

#[test]
fn terminator_ends_the_read() {
    // Anything framed after NLMSG_DONE in the same read is never decoded.
    let mut data = fixtures::newlink(1, 0x49, "lo");
    data.extend_from_slice(&fixtures::done());
    data.extend_from_slice(&fixtures::newlink(2, 0x1, "eth0"));

    let (events, done) = run(&data, &EventFilter::default());
    assert!(done);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), Some("lo"));
}

#[test]
fn broken_message_does_not_take_down_its_siblings() {
    // First frame carries an attribute record claiming more bytes than the
    // message holds; only that message is dropped.
    let mut bad_body = fixtures::ifinfomsg(7, 0, 0);
    bad_body.extend_from_slice(&[0x40, 0x00, 0x03, 0x00]); // 64-byte claim
    let mut data = fixtures::nlmsg(NlMsgType::RTM_NEWLINK, &bad_body);
    data.extend_from_slice(&fixtures::newlink(2, 0x1, "eth0"));

    let (events, _) = run(&data, &EventFilter::default());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), Some("eth0"));
}

#[test]
fn nameless_link_is_never_admitted() {
    let data = fixtures::nlmsg(NlMsgType::RTM_NEWLINK, &fixtures::ifinfomsg(9, 0x01, 0));
    let (events, _) = run(&data, &EventFilter::default());
    assert!(events.is_empty());
}

#[test]
fn wait_window_expires_with_no_events() {
    // Needs a route socket; skip where the environment forbids one.
    let Ok(mut stream) = EventStream::builder()
        .accept(["ifwatch-test-no-such-interface"])
        .open()
    else {
        return;
    };
    let events: Vec<_> = stream.wait(Some(Duration::from_millis(50))).collect();
    assert!(events.is_empty());
}

//! Filtered interface event streams.
//!
//! [`EventStream`] owns one rtnetlink socket and exposes two modes: a
//! one-shot [`dump`] of current state and an open-ended [`wait`] that
//! yields multicast events until an inactivity window passes with nothing
//! admitted.
//!
//! [`dump`]: EventStream::dump
//! [`wait`]: EventStream::wait

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;
use crate::filter::EventFilter;
use crate::message::{dump_request, MessageIter, NlMsgType};
use crate::messages::{decode_frame, Decoded, Event};
use crate::socket::{rtnetlink_groups, NetlinkSocket};

/// How long a dump may sit idle before it is abandoned.
const DUMP_TIMEOUT: Duration = Duration::from_secs(1);

/// What a one-shot dump should enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
    /// All interfaces (RTM_GETLINK).
    Links,
    /// All addresses (RTM_GETADDR).
    Addresses,
}

impl DumpKind {
    fn request_type(self) -> u16 {
        match self {
            DumpKind::Links => NlMsgType::RTM_GETLINK,
            DumpKind::Addresses => NlMsgType::RTM_GETADDR,
        }
    }
}

/// Configures and opens an [`EventStream`].
#[derive(Debug, Clone)]
pub struct EventStreamBuilder {
    links: bool,
    addresses: bool,
    accept: Vec<String>,
    reject: Vec<String>,
    strict: bool,
}

impl Default for EventStreamBuilder {
    fn default() -> Self {
        EventStreamBuilder {
            links: true,
            addresses: false,
            accept: vec!["*".to_string()],
            reject: Vec::new(),
            strict: false,
        }
    }
}

impl EventStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to link state changes. On by default.
    pub fn links(mut self, enable: bool) -> Self {
        self.links = enable;
        self
    }

    /// Subscribe to IPv4 address changes. Off by default.
    pub fn addresses(mut self, enable: bool) -> Self {
        self.addresses = enable;
        self
    }

    /// Glob patterns interface names must match.
    pub fn accept<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Glob patterns that exclude interfaces, ahead of accept patterns.
    pub fn reject<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reject = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Drop events missing the attributes callers usually read.
    pub fn strict(mut self, enable: bool) -> Self {
        self.strict = enable;
        self
    }

    /// Open the socket, join the requested groups, and build the stream.
    pub fn open(self) -> Result<EventStream> {
        let filter = EventFilter::new(&self.accept, &self.reject, self.strict)?;
        let mut socket = NetlinkSocket::new()?;
        if self.links {
            socket.subscribe(rtnetlink_groups::RTNLGRP_LINK)?;
        }
        if self.addresses {
            socket.subscribe(rtnetlink_groups::RTNLGRP_IPV4_IFADDR)?;
        }
        Ok(EventStream {
            socket,
            filter,
            pending: VecDeque::new(),
        })
    }
}

/// A filtered stream of interface events.
pub struct EventStream {
    socket: NetlinkSocket,
    filter: EventFilter,
    pending: VecDeque<Event>,
}

impl EventStream {
    /// Configure a new stream.
    pub fn builder() -> EventStreamBuilder {
        EventStreamBuilder::new()
    }

    /// Ask the kernel for a full enumeration and collect the admitted
    /// events. Ends at NLMSG_DONE, or when the kernel goes quiet for
    /// a second. Dump results never mix with multicast events queued
    /// for `wait`.
    pub fn dump(&mut self, kind: DumpKind) -> Result<Vec<Event>> {
        let request = dump_request(kind.request_type(), self.socket.pid());
        self.socket.send(&request)?;

        let mut queued = VecDeque::new();
        loop {
            if !self.socket.poll_read(Some(DUMP_TIMEOUT))? {
                warn!("dump went quiet before NLMSG_DONE");
                break;
            }
            let data = self.socket.recv()?;
            if collect_events(&data, &self.filter, &mut queued) {
                break;
            }
        }
        debug!(count = queued.len(), "dump complete");
        Ok(queued.into_iter().collect())
    }

    /// Iterate multicast events as they arrive.
    ///
    /// `window` is an inactivity bound: the countdown re-arms every time an
    /// event is yielded, and the iterator ends once a full window passes
    /// without one. `None` waits forever.
    pub fn wait(&mut self, window: Option<Duration>) -> EventIter<'_> {
        EventIter {
            stream: self,
            window,
            deadline: window.map(|w| Instant::now() + w),
            state: StreamState::Armed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// Reading from the socket.
    Armed,
    /// Saw a terminator; hand out what is queued, read no more.
    Draining,
    /// No further items.
    Finished,
}

/// Blocking iterator over admitted events. See [`EventStream::wait`].
pub struct EventIter<'a> {
    stream: &'a mut EventStream,
    window: Option<Duration>,
    deadline: Option<Instant>,
    state: StreamState,
}

impl EventIter<'_> {
    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

impl Iterator for EventIter<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                StreamState::Finished => return None,
                StreamState::Draining => {
                    let event = self.stream.pending.pop_front();
                    if event.is_none() {
                        self.state = StreamState::Finished;
                    }
                    return event.map(Ok);
                }
                StreamState::Armed => {
                    if let Some(event) = self.stream.pending.pop_front() {
                        self.deadline = self.window.map(|w| Instant::now() + w);
                        return Some(Ok(event));
                    }
                    if self.remaining() == Some(Duration::ZERO) {
                        debug!("event stream idle past its window");
                        self.state = StreamState::Finished;
                        return None;
                    }
                    match self.stream.socket.poll_read(self.remaining()) {
                        Ok(true) => {}
                        Ok(false) => {
                            self.state = StreamState::Finished;
                            return None;
                        }
                        Err(err) => {
                            self.state = StreamState::Finished;
                            return Some(Err(err));
                        }
                    }
                    match self.stream.socket.recv() {
                        Ok(data) => {
                            if collect_events(&data, &self.stream.filter, &mut self.stream.pending)
                            {
                                self.state = StreamState::Draining;
                            }
                        }
                        Err(err) => {
                            self.state = StreamState::Finished;
                            return Some(Err(err));
                        }
                    }
                }
            }
        }
    }
}

/// Split one datagram into messages, decode them, and queue what the
/// filter admits. A terminator ends the walk; the rest of the read is
/// not examined. Returns true when the terminator was seen.
fn collect_events(data: &[u8], filter: &EventFilter, pending: &mut VecDeque<Event>) -> bool {
    for (header, payload) in MessageIter::new(data) {
        match decode_frame(header.nlmsg_type, payload) {
            Decoded::Event(event) => {
                if filter.admits(&event) {
                    pending.push_back(event);
                }
            }
            Decoded::Done => return true,
            Decoded::Ignored => {}
        }
    }
    false
}

//! Glob-based event admission.

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::trace;

use crate::error::Result;
use crate::messages::Event;

/// Decides which decoded events a stream hands to its caller.
///
/// Reject patterns beat accept patterns. An event whose name did not decode
/// is never admitted. Strict mode additionally demands the attribute the
/// caller is most likely to read: a carrier attribute for link events and a
/// decoded IPv4 address for address events.
#[derive(Debug, Clone)]
pub struct EventFilter {
    accept: GlobSet,
    reject: GlobSet,
    strict: bool,
}

impl EventFilter {
    /// Build a filter from shell-style glob patterns.
    pub fn new(accept: &[String], reject: &[String], strict: bool) -> Result<Self> {
        Ok(EventFilter {
            accept: build_set(accept)?,
            reject: build_set(reject)?,
            strict,
        })
    }

    /// Whether a decoded event passes the filter.
    pub fn admits(&self, event: &Event) -> bool {
        let Some(name) = event.name() else {
            return false;
        };
        if name.is_empty() {
            return false;
        }
        if self.strict && !self.has_required_attrs(event) {
            trace!(name, "strict filter dropped incomplete event");
            return false;
        }
        if self.reject.is_match(name) {
            trace!(name, "rejected by pattern");
            return false;
        }
        self.accept.is_match(name)
    }

    fn has_required_attrs(&self, event: &Event) -> bool {
        match event {
            Event::Link(link) => link.attrs.contains_key("carrier"),
            Event::Address(addr) => addr.address().is_some(),
        }
    }
}

impl Default for EventFilter {
    /// Accept everything, reject nothing, no strictness.
    fn default() -> Self {
        EventFilter {
            accept: build_set(&["*".to_string()]).unwrap_or_else(|_| GlobSet::empty()),
            reject: GlobSet::empty(),
            strict: false,
        }
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::messages::Event;

    fn filter(accept: &[&str], reject: &[&str], strict: bool) -> EventFilter {
        let accept: Vec<String> = accept.iter().map(|s| s.to_string()).collect();
        let reject: Vec<String> = reject.iter().map(|s| s.to_string()).collect();
        EventFilter::new(&accept, &reject, strict).unwrap()
    }

    #[test]
    fn reject_beats_accept() {
        let f = filter(&["*"], &["lo"], false);
        assert!(f.admits(&Event::Link(fixtures::link_eth0())));
        assert!(!f.admits(&Event::Link(fixtures::link_loopback())));
    }

    #[test]
    fn accept_glob_matches_prefix() {
        let f = filter(&["eth*"], &[], false);
        assert!(f.admits(&Event::Link(fixtures::link_eth0())));
        assert!(!f.admits(&Event::Link(fixtures::link_loopback())));
    }

    #[test]
    fn strict_requires_carrier_attr() {
        let f = filter(&["*"], &[], true);
        // link_eth0 carries a carrier attribute
        assert!(f.admits(&Event::Link(fixtures::link_eth0())));
        // loopback fixture has no carrier attribute
        assert!(!f.admits(&Event::Link(fixtures::link_loopback())));
    }

    #[test]
    fn strict_requires_ipv4_address() {
        let f = filter(&["*"], &[], true);
        assert!(f.admits(&Event::Address(fixtures::addr_eth0())));

        let mut bare = fixtures::addr_eth0();
        bare.attrs.remove("address");
        assert!(!f.admits(&Event::Address(bare)));
    }

    #[test]
    fn default_admits_named_events() {
        let f = EventFilter::default();
        assert!(f.admits(&Event::Link(fixtures::link_loopback())));
    }

    #[test]
    fn bad_pattern_is_an_error() {
        assert!(EventFilter::new(&["[".to_string()], &[], false).is_err());
    }
}

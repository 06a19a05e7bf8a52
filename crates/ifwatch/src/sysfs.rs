//! Interface enumeration through sysfs.
//!
//! Complements the event stream with point-in-time queries that need no
//! socket: which interfaces exist, and which sit behind a bridge.

use std::path::Path;

use tracing::debug;

use crate::error::Result;

const CLASS_NET: &str = "/sys/class/net";

/// Names of all network interfaces currently attached, sorted.
pub fn attached_interfaces() -> Result<Vec<String>> {
    list_names(Path::new(CLASS_NET))
}

/// Names of the ports enslaved to a bridge, sorted. Empty when the named
/// interface is not a bridge.
pub fn bridged_interfaces(bridge: &str) -> Result<Vec<String>> {
    let dir = Path::new(CLASS_NET).join(bridge).join("brif");
    if !dir.is_dir() {
        debug!(bridge, "no bridge port directory");
        return Ok(Vec::new());
    }
    list_names(&dir)
}

fn list_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_owned());
        }
    }
    names.sort();
    Ok(names)
}

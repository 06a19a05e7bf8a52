//! Interface counter blocks (struct rtnl_link_stats / rtnl_link_stats64).

use winnow::binary::{le_u32, le_u64};
use winnow::prelude::*;

use crate::parse::PResult;

/// Wire size of the legacy 32-bit counter block.
pub const STATS32_LEN: usize = 24 * 4;

/// Wire size of the 64-bit counter block.
pub const STATS64_LEN: usize = 24 * 8;

/// The 24 interface counters, field order fixed by the kernel layout.
///
/// Decoded from either the legacy 32-bit encoding (`IFLA_STATS`) or the
/// 64-bit encoding (`IFLA_STATS64`); counters are widened to u64 either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "output", derive(serde::Serialize))]
pub struct StatsBlock {
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub multicast: u64,
    pub collisions: u64,
    pub rx_length_errors: u64,
    pub rx_over_errors: u64,
    pub rx_crc_errors: u64,
    pub rx_frame_errors: u64,
    pub rx_fifo_errors: u64,
    pub rx_missed_errors: u64,
    pub tx_aborted_errors: u64,
    pub tx_carrier_errors: u64,
    pub tx_fifo_errors: u64,
    pub tx_heartbeat_errors: u64,
    pub tx_window_errors: u64,
    pub rx_compressed: u64,
    pub tx_compressed: u64,
    pub rx_nohandler: u64,
}

impl StatsBlock {
    /// Decode the legacy 32-bit counter block.
    ///
    /// Returns `None` if the payload is shorter than 24 counters; newer
    /// kernels may append fields past the 24, which are ignored.
    pub fn from_wire32(data: &[u8]) -> Option<Self> {
        if data.len() < STATS32_LEN {
            return None;
        }
        let mut input = data;
        parse_counters32(&mut input).ok().map(Self::from_counters)
    }

    /// Decode the 64-bit counter block.
    pub fn from_wire64(data: &[u8]) -> Option<Self> {
        if data.len() < STATS64_LEN {
            return None;
        }
        let mut input = data;
        parse_counters64(&mut input).ok().map(Self::from_counters)
    }

    fn from_counters(c: [u64; 24]) -> Self {
        let [
            rx_packets,
            tx_packets,
            rx_bytes,
            tx_bytes,
            rx_errors,
            tx_errors,
            rx_dropped,
            tx_dropped,
            multicast,
            collisions,
            rx_length_errors,
            rx_over_errors,
            rx_crc_errors,
            rx_frame_errors,
            rx_fifo_errors,
            rx_missed_errors,
            tx_aborted_errors,
            tx_carrier_errors,
            tx_fifo_errors,
            tx_heartbeat_errors,
            tx_window_errors,
            rx_compressed,
            tx_compressed,
            rx_nohandler,
        ] = c;
        Self {
            rx_packets,
            tx_packets,
            rx_bytes,
            tx_bytes,
            rx_errors,
            tx_errors,
            rx_dropped,
            tx_dropped,
            multicast,
            collisions,
            rx_length_errors,
            rx_over_errors,
            rx_crc_errors,
            rx_frame_errors,
            rx_fifo_errors,
            rx_missed_errors,
            tx_aborted_errors,
            tx_carrier_errors,
            tx_fifo_errors,
            tx_heartbeat_errors,
            tx_window_errors,
            rx_compressed,
            tx_compressed,
            rx_nohandler,
        }
    }
}

fn parse_counters32(input: &mut &[u8]) -> PResult<[u64; 24]> {
    let mut counters = [0u64; 24];
    for slot in &mut counters {
        *slot = u64::from(le_u32.parse_next(input)?);
    }
    Ok(counters)
}

fn parse_counters64(input: &mut &[u8]) -> PResult<[u64; 24]> {
    let mut counters = [0u64; 24];
    for slot in &mut counters {
        *slot = le_u64.parse_next(input)?;
    }
    Ok(counters)
}

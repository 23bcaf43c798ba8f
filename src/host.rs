//! Host-side timing backends, for driving a JTAG port from an OS process,
//! e.g. through memory-mapped GPIO on an embedded Linux board.
use std::time::Instant;

use embedded_hal::delay::DelayNs;

use crate::timing::MicrosClock;

/// `MicrosClock` over the host monotonic clock, counting microseconds since
/// construction.
pub struct HostClock {
    origin: Instant,
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrosClock for HostClock {
    fn micros(&mut self) -> u32 {
        // truncation is the free-running-counter wrap the trait specifies
        self.origin.elapsed().as_micros() as u32
    }
}

/// `DelayNs` over `std::thread::sleep`.  The OS may oversleep; that only
/// lengthens waits, never shortens them.
pub struct HostDelay;

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()));
    }
}

//! This crate is the hardware layer for bit-banged JTAG programming tools,
//! such as XSVF vector players.  At the lowest level, the `InputOutputPin`
//! trait adapts whatever GPIO mechanism a platform has (memory-mapped
//! registers, a HAL pin type) to the four JTAG lines.  The `Port` trait maps
//! the logical signals TCK, TMS, TDI and TDO onto those pins and provides
//! the clock pulse, the atomic unit of JTAG clocking.
//!
//! On top of the port sits the timing engine.  Vector formats express waits
//! in microseconds, but target devices disagree about what a wait means:
//! FPGA configuration logic demands TCK activity for the whole duration,
//! while PROMs only care that the time actually passes.  The `WaitStrategy`
//! implementations in [`timing`] cover both camps, and [`timing::Engine`]
//! bundles a port with the one strategy chosen for the session.
//!
//! # Example
//! ```
//! use core::num::NonZeroU32;
//! use jtag_bitbang::port::gpio::{Gpio, InputOutputPin};
//! use jtag_bitbang::port::Signal;
//! use jtag_bitbang::timing::{ClockDriven, Engine};
//!
//! // Stand-in for a memory-mapped GPIO line
//! struct Pin;
//! impl InputOutputPin for Pin {
//!     fn set_as_output(&mut self) {}
//!     fn set_as_input_pull_up(&mut self) {}
//!     fn set_high(&mut self, _high: bool) {}
//!     fn is_high(&mut self) -> bool { true }
//! }
//!
//! struct NoDelay;
//! impl embedded_hal::delay::DelayNs for NoDelay {
//!     fn delay_ns(&mut self, _ns: u32) {}
//! }
//!
//! let port = Gpio::new(Pin, Pin, Pin, Pin, NoDelay);
//! let calibration = NonZeroU32::new(72).unwrap();
//! let mut jtag = Engine::new(port, ClockDriven::new(calibration));
//! jtag.initialize();
//! jtag.set_signal(Signal::Tms, false);
//! jtag.wait(10);
//! assert!(jtag.read_tdo());
//! ```

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod port;
pub mod source;
pub mod timing;

#[cfg(feature = "std")]
pub mod host;

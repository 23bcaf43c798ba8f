//! Implement the `Port` trait for directly-wired GPIO lines.
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::port::{Port, Signal};

/// How long TCK is held after a level change so the attached device samples
/// a stable edge despite line capacitance and skew.
const TCK_SETTLE_NS: u32 = 50;

/// Minimal interface to a single GPIO line.  Implementations must support
/// switching the line between push-pull output and pulled-up input at
/// runtime; all operations are infallible.
pub trait InputOutputPin {
    fn set_as_output(&mut self);
    fn set_as_input_pull_up(&mut self);
    fn set_high(&mut self, high: bool);
    fn is_high(&mut self) -> bool;
}

/// A JTAG port wired to four GPIO lines.  The binding is fixed for the life
/// of the value; the pins are moved in and never handed back.
pub struct Gpio<Tck, Tms, Tdi, Tdo, Delay>
where
    Tck: InputOutputPin,
    Tms: InputOutputPin,
    Tdi: InputOutputPin,
    Tdo: InputOutputPin,
    Delay: DelayNs,
{
    tck: Tck,
    tms: Tms,
    tdi: Tdi,
    tdo: Tdo,
    delay: Delay,
}

impl<Tck, Tms, Tdi, Tdo, Delay> Gpio<Tck, Tms, Tdi, Tdo, Delay>
where
    Tck: InputOutputPin,
    Tms: InputOutputPin,
    Tdi: InputOutputPin,
    Tdo: InputOutputPin,
    Delay: DelayNs,
{
    pub fn new(tck: Tck, tms: Tms, tdi: Tdi, tdo: Tdo, delay: Delay) -> Self {
        Self {
            tck,
            tms,
            tdi,
            tdo,
            delay,
        }
    }
}

impl<Tck, Tms, Tdi, Tdo, Delay> Port for Gpio<Tck, Tms, Tdi, Tdo, Delay>
where
    Tck: InputOutputPin,
    Tms: InputOutputPin,
    Tdi: InputOutputPin,
    Tdo: InputOutputPin,
    Delay: DelayNs,
{
    fn initialize(&mut self) {
        debug!("configuring JTAG pins");
        self.tck.set_as_output();
        self.tms.set_as_output();
        self.tdi.set_as_output();
        self.tdo.set_as_input_pull_up();
    }

    fn set_signal(&mut self, signal: Signal, level: bool) {
        match signal {
            Signal::Tck => {
                self.tck.set_high(level);
                self.delay.delay_ns(TCK_SETTLE_NS);
            }
            Signal::Tms => self.tms.set_high(level),
            Signal::Tdi => self.tdi.set_high(level),
            // input only, nothing to drive
            Signal::Tdo => {}
        }
    }

    fn read_tdo(&mut self) -> bool {
        self.tdo.is_high()
    }
}

//! The logical JTAG signals and the `Port` trait that maps them onto
//! hardware.  Pin-level backends should implement the `Port` trait; the
//! provided `pulse_clock` composes two TCK writes into the atomic unit of
//! JTAG clocking.
pub mod gpio;

/// The four logical JTAG signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    Tck,
    Tms,
    Tdi,
    Tdo,
}

pub trait Port {
    /// Configure TCK, TMS and TDI as outputs and TDO as an input with
    /// pull-up biasing.  Safe to call more than once; the only side effect
    /// is the pin-mode configuration itself, no signal levels change.
    fn initialize(&mut self);

    /// Drive the named signal's pin to `level`, high for `true`.  After a
    /// TCK level change the implementation must hold off long enough for
    /// the line to settle, so the attached device never samples a clock
    /// edge mid-transition; TMS and TDI are expected to be stable well
    /// before the next clock edge and get no such hold.  TDO is input-only
    /// and a set against it is silently ignored.
    fn set_signal(&mut self, signal: Signal, level: bool);

    /// Sample the TDO input and return its level.  Callable at any time;
    /// never disturbs TCK, TMS or TDI.
    fn read_tdo(&mut self) -> bool;

    /// Toggle TCK low then high.  Exactly one rising edge per call:
    /// consumers count pulses to meet the minimum-clock-cycle requirements
    /// of the attached device, so implementations must never batch or
    /// elide them.
    fn pulse_clock(&mut self) {
        self.set_signal(Signal::Tck, false);
        self.set_signal(Signal::Tck, true);
    }
}

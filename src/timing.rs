//! Wait policies built on the port's clock-pulse primitive.
//!
//! A vector player asks for waits in microseconds, but what the attached
//! device actually needs varies by family.  Spartan/Virtex-class FPGA
//! configuration and indirect flash programming require TCK to keep running
//! for at least one pulse per requested microsecond, while PROMs and CPLDs
//! only require that the wall-clock time passes.  Each `WaitStrategy` below
//! serves one of those readings of "wait"; pick the one that matches the
//! attached family when constructing the [`Engine`] and it stays fixed for
//! the session.
use core::num::NonZeroU32;

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::port::{Port, Signal};

/// A free-running microsecond counter.  Expected to wrap; elapsed time is
/// always taken as a wrapping difference of two readings.
pub trait MicrosClock {
    fn micros(&mut self) -> u32;
}

/// A policy for satisfying a microsecond wait through the port.  Exactly
/// one strategy is active per [`Engine`]; swapping policies is a matter of
/// constructing a different one, neither the port nor calling code changes.
pub trait WaitStrategy<P: Port + ?Sized> {
    fn wait(&mut self, port: &mut P, duration_us: u32);
}

/// Issue a calibrated number of TCK pulses per requested microsecond.
///
/// This is the recommended policy: the pulse count is exact by
/// construction, so FPGA configuration clocking is always satisfied.  The
/// elapsed-time half of the contract holds only if `cycles_per_us` is tuned
/// so that one microsecond's worth of pulses takes at least one microsecond
/// on the deployment hardware.  Tuning it too low silently shortens waits
/// and can leave the attached device misconfigured; that calibration is the
/// operator's responsibility and is not checked here.
pub struct ClockDriven {
    cycles_per_us: NonZeroU32,
}

impl ClockDriven {
    pub fn new(cycles_per_us: NonZeroU32) -> Self {
        Self { cycles_per_us }
    }
}

impl<P: Port + ?Sized> WaitStrategy<P> for ClockDriven {
    fn wait(&mut self, port: &mut P, duration_us: u32) {
        let cycles = u64::from(duration_us) * u64::from(self.cycles_per_us.get());
        for _ in 0..cycles {
            port.pulse_clock();
        }
    }
}

/// Pulse TCK until a real clock reports the requested time has elapsed.
///
/// Exact on elapsed time.  The pulse count merely tracks the duration: the
/// clock is re-checked after every pulse, so at least one pulse is issued
/// and the count stays proportional to the wait.
pub struct TimerDriven<C: MicrosClock> {
    clock: C,
}

impl<C: MicrosClock> TimerDriven<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<P: Port + ?Sized, C: MicrosClock> WaitStrategy<P> for TimerDriven<C> {
    fn wait(&mut self, port: &mut P, duration_us: u32) {
        let start = self.clock.micros();
        loop {
            port.pulse_clock();
            if self.clock.micros().wrapping_sub(start) >= duration_us {
                break;
            }
        }
    }
}

/// Durations above this many microseconds sleep instead of pulsing.
pub const SLEEP_CUTOFF_US: u32 = 50;

/// One pulse per microsecond for short waits; a true sleep, rounded up to
/// whole milliseconds with TCK parked low, for anything above
/// [`SLEEP_CUTOFF_US`].
///
/// Long waits issue no pulses at all, so this policy is only valid for
/// XC9500/CoolRunner-class CPLDs and serial PROMs that tolerate a quiet TCK
/// during waits.  FPGA configuration sequences need one of the pulsing
/// policies.
pub struct ThresholdDriven<D: DelayNs> {
    delay: D,
}

impl<D: DelayNs> ThresholdDriven<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }
}

impl<P: Port + ?Sized, D: DelayNs> WaitStrategy<P> for ThresholdDriven<D> {
    fn wait(&mut self, port: &mut P, duration_us: u32) {
        if duration_us > SLEEP_CUTOFF_US {
            // XC18V00-class PROMs want TCK low while time passes
            port.set_signal(Signal::Tck, false);
            self.delay.delay_ms(duration_us.div_ceil(1000));
        } else {
            for _ in 0..duration_us {
                port.pulse_clock();
            }
        }
    }
}

/// A port paired with the single wait policy active for the session.
///
/// This is the surface a vector player drives: the signal operations plus
/// `wait`.  The port stays reachable for callers that want to bit-bang it
/// directly.
pub struct Engine<P, W> {
    pub port: P,
    strategy: W,
}

impl<P, W> Engine<P, W>
where
    P: Port,
    W: WaitStrategy<P>,
{
    pub fn new(port: P, strategy: W) -> Self {
        Self { port, strategy }
    }

    /// See [`Port::initialize`].
    pub fn initialize(&mut self) {
        self.port.initialize()
    }

    /// See [`Port::set_signal`].
    pub fn set_signal(&mut self, signal: Signal, level: bool) {
        self.port.set_signal(signal, level)
    }

    /// See [`Port::read_tdo`].
    pub fn read_tdo(&mut self) -> bool {
        self.port.read_tdo()
    }

    /// See [`Port::pulse_clock`].
    pub fn pulse_clock(&mut self) {
        self.port.pulse_clock()
    }

    /// Block until the active policy has satisfied `duration_us`.
    pub fn wait(&mut self, duration_us: u32) {
        trace!("wait {} us", duration_us);
        self.strategy.wait(&mut self.port, duration_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingPort {
        sets: Vec<(Signal, bool)>,
    }

    impl Port for RecordingPort {
        fn initialize(&mut self) {}

        fn set_signal(&mut self, signal: Signal, level: bool) {
            self.sets.push((signal, level));
        }

        fn read_tdo(&mut self) -> bool {
            false
        }
    }

    impl RecordingPort {
        fn pulses(&self) -> usize {
            let mut level = false;
            let mut edges = 0;
            for &(signal, high) in &self.sets {
                if signal == Signal::Tck {
                    if high && !level {
                        edges += 1;
                    }
                    level = high;
                }
            }
            edges
        }
    }

    struct StepClock {
        now: u32,
        step: u32,
    }

    impl MicrosClock for StepClock {
        fn micros(&mut self) -> u32 {
            let now = self.now;
            self.now = self.now.wrapping_add(self.step);
            now
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSleep(Rc<RefCell<Vec<u32>>>);

    impl DelayNs for RecordingSleep {
        fn delay_ns(&mut self, _ns: u32) {
            unreachable!("long waits sleep in whole milliseconds");
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(ms);
        }
    }

    fn cal(cycles_per_us: u32) -> ClockDriven {
        ClockDriven::new(NonZeroU32::new(cycles_per_us).unwrap())
    }

    #[test]
    fn clock_driven_issues_exactly_duration_times_calibration() {
        let mut port = RecordingPort::default();
        cal(3).wait(&mut port, 7);
        assert_eq!(port.pulses(), 21);
    }

    #[test]
    fn clock_driven_zero_wait_is_a_no_op() {
        let mut port = RecordingPort::default();
        cal(5).wait(&mut port, 0);
        assert!(port.sets.is_empty());
    }

    #[test]
    fn timer_driven_pulses_until_the_clock_catches_up() {
        let mut port = RecordingPort::default();
        let mut strategy = TimerDriven::new(StepClock { now: 0, step: 3 });
        strategy.wait(&mut port, 10);
        // clock readings after the start: 3, 6, 9, 12
        assert_eq!(port.pulses(), 4);
    }

    #[test]
    fn timer_driven_issues_at_least_one_pulse() {
        let mut port = RecordingPort::default();
        let mut strategy = TimerDriven::new(StepClock { now: 0, step: 100 });
        strategy.wait(&mut port, 10);
        assert_eq!(port.pulses(), 1);
    }

    #[test]
    fn timer_driven_survives_counter_rollover() {
        let mut port = RecordingPort::default();
        let clock = StepClock {
            now: u32::MAX - 15,
            step: 8,
        };
        let mut strategy = TimerDriven::new(clock);
        strategy.wait(&mut port, 20);
        // elapsed readings: 8, 16 (wrapped), 24
        assert_eq!(port.pulses(), 3);
    }

    #[test]
    fn threshold_driven_pulses_short_waits() {
        let mut port = RecordingPort::default();
        let sleep = RecordingSleep::default();
        let mut strategy = ThresholdDriven::new(sleep.clone());
        strategy.wait(&mut port, 10);
        assert_eq!(port.pulses(), 10);
        assert!(sleep.0.borrow().is_empty());
    }

    #[test]
    fn threshold_driven_pulses_at_the_cutoff() {
        let mut port = RecordingPort::default();
        let sleep = RecordingSleep::default();
        let mut strategy = ThresholdDriven::new(sleep.clone());
        strategy.wait(&mut port, SLEEP_CUTOFF_US);
        assert_eq!(port.pulses(), SLEEP_CUTOFF_US as usize);
        assert!(sleep.0.borrow().is_empty());
    }

    #[test]
    fn threshold_driven_sleeps_long_waits_with_tck_parked_low() {
        let mut port = RecordingPort::default();
        let sleep = RecordingSleep::default();
        let mut strategy = ThresholdDriven::new(sleep.clone());
        strategy.wait(&mut port, 100);
        assert_eq!(port.pulses(), 0);
        assert_eq!(*port.sets, [(Signal::Tck, false)]);
        assert_eq!(*sleep.0.borrow(), [1]);
    }

    #[test]
    fn threshold_driven_rounds_the_sleep_up() {
        let mut port = RecordingPort::default();
        let sleep = RecordingSleep::default();
        let mut strategy = ThresholdDriven::new(sleep.clone());
        strategy.wait(&mut port, 1001);
        assert_eq!(*sleep.0.borrow(), [2]);
    }

    #[test]
    fn engine_routes_waits_through_its_strategy() {
        let mut jtag = Engine::new(RecordingPort::default(), cal(1));
        jtag.initialize();
        jtag.wait(2);
        jtag.pulse_clock();
        assert_eq!(jtag.port.pulses(), 3);

        jtag.set_signal(Signal::Tdi, true);
        assert_eq!(jtag.port.sets.last(), Some(&(Signal::Tdi, true)));
        assert!(!jtag.read_tdo());
    }
}

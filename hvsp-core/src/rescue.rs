//! Recovery session driver
//!
//! [`Rescuer`] owns the five HVSP lines and the timing source for its whole
//! lifetime and runs one session per accepted trigger:
//!
//! ```text
//!  trigger ──► activate ──► step ──► step ──► ... ──► finalize ──► report
//!                 │           │                          │
//!                 └─ lines ───┴─ BitEngine ─ commands ───┘
//! ```
//!
//! Every session ends in FINALIZING, which removes programming voltage,
//! whatever happened before it.

use embedded_hal::delay::DelayNs;

use crate::config::{TargetProfile, TimingConfig, ATTINY13};
use crate::hvsp::{BitEngine, FusePair, HighFuse, HvspCommands, LowFuse, HFUSE, LFUSE};
use crate::safety::{MeteredDelay, SafetyStatus, SessionGuard};
use crate::state::{ErrorKind, Event, Outcome, Session, State};
use crate::traits::{Direction, HvspLines, Level, Line, StatusIndicator, Trigger};

/// RESET-control pin level that puts 12 V on the target's RESET pin
///
/// The control pin drives a level-shifting transistor, so the logic is
/// inverted.
pub const HV_ON_LEVEL: Level = Level::Low;

/// RESET-control pin level with programming voltage removed
pub const HV_OFF_LEVEL: Level = Level::High;

/// Result of the signature check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Identity {
    /// Signature matches the target profile
    Confirmed(u16),
    /// Anything else, including the all-zero timeout sentinel
    Unknown(u16),
}

impl Identity {
    pub fn signature(&self) -> u16 {
        match *self {
            Identity::Confirmed(sig) | Identity::Unknown(sig) => sig,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Identity::Confirmed(_))
    }
}

/// Read the signature and compare it against `profile`
pub fn identify_target<S: HvspCommands + ?Sized>(
    shifter: &mut S,
    profile: &TargetProfile,
) -> Identity {
    let signature = shifter.read_signature();
    if signature == profile.signature {
        Identity::Confirmed(signature)
    } else {
        Identity::Unknown(signature)
    }
}

/// Fuse bytes around a restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FuseReport {
    pub before: FusePair,
    /// Read-back after writing; `None` when the target never became ready
    /// again, so nothing could be read
    pub after: Option<FusePair>,
    /// Both writes finished before the ready wait gave up
    pub writes_completed: bool,
}

impl FuseReport {
    /// Read-back matches what `profile` asked for
    pub fn verified(&self, profile: &TargetProfile) -> bool {
        self.after == Some(FusePair::new(profile.lfuse, profile.hfuse))
    }

    /// The fuses found on the target kept ISP from reaching it
    pub fn was_locked_out(&self) -> bool {
        LowFuse::from(self.before.low).locks_out_isp()
            || HighFuse::from(self.before.high).locks_out_isp()
    }
}

/// Read the fuses, write the profile's values, read them back
///
/// Stops at the first write the target does not finish. Only call this on
/// an identified target.
pub fn restore_fuses<S: HvspCommands + ?Sized>(
    shifter: &mut S,
    profile: &TargetProfile,
) -> FuseReport {
    let before = shifter.read_fuses();
    let mut report = FuseReport {
        before,
        after: None,
        writes_completed: false,
    };

    if !shifter.write_fuse(LFUSE, profile.lfuse) {
        warn!("target busy after LFUSE write, HFUSE write skipped");
        return report;
    }
    if !shifter.write_fuse(HFUSE, profile.hfuse) {
        warn!("target busy after HFUSE write, no read-back");
        return report;
    }

    report.writes_completed = true;
    report.after = Some(shifter.read_fuses());
    report
}

/// Single-instance recovery session driver
pub struct Rescuer<L, D> {
    lines: L,
    delay: MeteredDelay<D>,
    timing: TimingConfig,
    profile: TargetProfile,
    state: State,
    session: Option<Session>,
    guard: SessionGuard,
    last_session: Option<Session>,
}

impl<L: HvspLines, D: DelayNs> Rescuer<L, D> {
    /// Create a driver for an ATtiny13 and park the lines
    pub fn new(lines: L, delay: D, timing: TimingConfig) -> Self {
        Self::with_profile(lines, delay, timing, ATTINY13)
    }

    pub fn with_profile(lines: L, delay: D, timing: TimingConfig, profile: TargetProfile) -> Self {
        let mut rescuer = Self {
            lines,
            delay: MeteredDelay::new(delay),
            timing,
            profile,
            state: State::Idle,
            session: None,
            guard: SessionGuard::new(timing.session_budget_ms),
            last_session: None,
        };
        rescuer.park();
        rescuer
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Session in progress, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Record of the most recently finished session
    pub fn last_session(&self) -> Option<&Session> {
        self.last_session.as_ref()
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Give the lines and timing source back
    pub fn release(self) -> (L, D) {
        (self.lines, self.delay.into_inner())
    }

    /// Idle line state: programming voltage off, supply off, outputs low
    fn park(&mut self) {
        // Level first: RESET must never glitch to HV on while becoming an output
        self.lines.drive(Line::Reset, HV_OFF_LEVEL);
        self.lines.configure(Line::Reset, Direction::Output);
        for line in [Line::Clock, Line::InstrIn, Line::DataIn] {
            self.lines.configure(line, Direction::Output);
            self.lines.drive(line, Level::Low);
        }
        self.lines.configure(Line::DataOut, Direction::InputPullUp);
        self.lines.set_supply(false);
    }

    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("{} -> {} on {}", self.state, next, event);
        }
        self.state = next;
    }

    /// Start a session
    ///
    /// Returns `false` without touching the lines unless the driver is
    /// idle.
    pub fn activate(&mut self) -> bool {
        if self.state != State::Idle {
            return false;
        }

        self.session = Some(Session::new());
        self.delay.reset();
        self.guard.reset();

        for line in [Line::Reset, Line::Clock, Line::InstrIn, Line::DataIn] {
            self.lines.configure(line, Direction::Output);
        }
        self.lines.drive(Line::InstrIn, Level::Low);
        self.lines.drive(Line::DataIn, Level::Low);
        self.lines.drive(Line::Clock, Level::Low);

        // The target must see SDO low when 12 V arrives
        self.lines.configure(Line::DataOut, Direction::Output);
        self.lines.drive(Line::DataOut, Level::Low);

        self.lines.drive(Line::Reset, HV_OFF_LEVEL);
        self.lines.set_supply(true);

        info!("session started");
        self.apply(Event::Activate);
        true
    }

    /// Advance the session by one state
    ///
    /// Returns the outcome when the step finished the session.
    pub fn step(&mut self) -> Option<Outcome> {
        let event = match self.state {
            State::Idle => return None,
            State::PoweringUp => self.enter_programming_mode(),
            State::AwaitingReady => Event::BringUpElapsed,
            State::Identifying => self.identify(),
            State::Programming => self.program(),
            State::Rejected => self.reject(),
            State::Finalizing => return Some(self.finalize()),
        };
        self.apply(event);

        if self.state != State::Finalizing {
            if let SafetyStatus::Fault(kind) = self.guard.check(self.delay.elapsed_us()) {
                warn!("{} after {=u64} us, finalizing", kind, self.delay.elapsed_us());
                if let Some(session) = self.session.as_mut() {
                    session.record(kind);
                }
                self.apply(Event::Fault(kind));
            }
        }
        None
    }

    /// Step until the session is back in IDLE
    pub fn run_session(&mut self) -> Option<Outcome> {
        while self.state.is_active() {
            if let Some(outcome) = self.step() {
                return Some(outcome);
            }
        }
        None
    }

    /// Check the trigger and, if it fired, run a whole session
    ///
    /// The indicator sees exactly one result per accepted trigger.
    pub fn poll<T, S>(&mut self, trigger: &mut T, status: &mut S) -> Option<Outcome>
    where
        T: Trigger + ?Sized,
        S: StatusIndicator + ?Sized,
    {
        if self.state != State::Idle || !trigger.activation_requested() {
            return None;
        }
        if !self.activate() {
            return None;
        }
        status.session_started();

        let outcome = self.run_session()?;
        status.report_result(outcome);
        Some(outcome)
    }

    fn enter_programming_mode(&mut self) -> Event {
        self.delay.delay_us(self.timing.settle_us);
        self.lines.drive(Line::Reset, HV_ON_LEVEL);
        self.delay.delay_us(self.timing.hv_assert_us);
        self.lines.configure(Line::DataOut, Direction::InputPullUp);
        self.delay.delay_us(self.timing.bring_up_us);
        Event::PowerSettled
    }

    fn identify(&mut self) -> Event {
        let Some(session) = self.session.as_mut() else {
            return Event::TargetRejected;
        };

        let mut engine = BitEngine::new(&mut self.lines, &mut self.delay, self.timing);
        let identity = identify_target(&mut engine, &self.profile);
        session.readiness = engine.readiness();
        session.signature = Some(identity.signature());

        if identity.is_confirmed() {
            info!("ATtiny13 found ({=u16:#x})", identity.signature());
            return Event::TargetIdentified;
        }

        if session.readiness == crate::hvsp::Readiness::TimedOut {
            session.record(ErrorKind::ReadinessTimeout);
        } else {
            warn!("unexpected signature {=u16:#x}", identity.signature());
            session.record(ErrorKind::IdentityMismatch);
        }
        Event::TargetRejected
    }

    fn program(&mut self) -> Event {
        let Some(session) = self.session.as_mut() else {
            return Event::FusesWritten;
        };

        let mut engine =
            BitEngine::resume(&mut self.lines, &mut self.delay, self.timing, session.readiness);
        session.writes_issued = true;
        let report = restore_fuses(&mut engine, &self.profile);
        session.readiness = engine.readiness();
        session.fuses_before = Some(report.before);
        session.fuses_after = report.after;

        if report.was_locked_out() {
            info!(
                "found lfuse={=u8:#x} hfuse={=u8:#x}, ISP was locked out",
                report.before.low,
                report.before.high
            );
        }
        if !report.writes_completed {
            session.record(ErrorKind::ReadinessTimeout);
        }

        if report.verified(&self.profile) {
            session.outcome = Some(Outcome::Success);
        } else {
            if let Some(after) = report.after {
                warn!(
                    "read back lfuse={=u8:#x} hfuse={=u8:#x}",
                    after.low,
                    after.high
                );
            }
            session.record(ErrorKind::VerifyMismatch);
            session.outcome = Some(Outcome::VerifyMismatch);
        }
        Event::FusesWritten
    }

    fn reject(&mut self) -> Event {
        if let Some(session) = self.session.as_mut() {
            session.outcome = Some(Outcome::Rejected);
        }
        Event::RejectionRecorded
    }

    fn finalize(&mut self) -> Outcome {
        for line in [Line::Clock, Line::InstrIn, Line::DataIn] {
            self.lines.drive(line, Level::Low);
        }
        self.lines.drive(Line::Reset, HV_OFF_LEVEL);
        self.lines.set_supply(false);

        let mut session = self.session.take().unwrap_or_default();
        let outcome = session.final_outcome();
        session.outcome = Some(outcome);

        self.delay.delay_ms(self.timing.cooldown_ms);

        info!(
            "session finished: {} (signature {=u16:#x}, {=usize} errors)",
            outcome,
            session.signature.unwrap_or(0),
            session.errors.len()
        );
        self.last_session = Some(session);
        self.apply(Event::PowerRemoved);
        outcome
    }
}

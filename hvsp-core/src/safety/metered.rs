//! Delay wrapper that accounts for the time it spends waiting

use embedded_hal::delay::DelayNs;

/// Forwards to an inner delay and sums every requested wait
///
/// Since the session busy-waits for all its timing, the sum of the waits
/// is a lower bound on the session's wall-clock time.
#[derive(Debug)]
pub struct MeteredDelay<D> {
    inner: D,
    elapsed_ns: u64,
}

impl<D: DelayNs> MeteredDelay<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            elapsed_ns: 0,
        }
    }

    /// Time waited since the last reset, in microseconds
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    pub fn reset(&mut self) {
        self.elapsed_ns = 0;
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn add(&mut self, ns: u64) {
        self.elapsed_ns = self.elapsed_ns.saturating_add(ns);
    }
}

impl<D: DelayNs> DelayNs for MeteredDelay<D> {
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_ns(ns);
        self.add(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.inner.delay_us(us);
        self.add(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
        self.add(ms as u64 * 1_000_000);
    }
}

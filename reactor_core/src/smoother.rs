//! Block-average smoothing stage.
//!
//! Raw samples are summed until a full window is collected; the window's mean
//! is emitted once and the accumulator starts over. There is no sliding
//! history, so storage is two scalars regardless of the window length.

/// Running-sum accumulator over a fixed number of samples.
#[derive(Debug, Clone, Default)]
pub struct Smoother {
    // 255 samples of any i32 reading fit comfortably in i64
    accumulator: i64,
    count: u8,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples collected towards the current window.
    pub fn pending(&self) -> u8 {
        self.count
    }

    /// Pre-fill the window as if `raw` had been read `window` times and return
    /// the resulting average (always `raw`). Used on the very first pass so the
    /// pipeline has a value without a warm-up delay.
    pub fn prime(&mut self, raw: i32, window: u8) -> i32 {
        let window = window.max(1);
        self.accumulator = i64::from(raw) * i64::from(window);
        self.count = window;
        self.take()
    }

    /// Add one sample. Returns the window average once `window` samples have
    /// been collected, `None` while the window is still filling.
    pub fn push(&mut self, raw: i32, window: u8) -> Option<i32> {
        self.accumulator += i64::from(raw);
        self.count = self.count.saturating_add(1);
        // >= so a window shrunk mid-collection completes on the next sample
        if self.count >= window.max(1) {
            Some(self.take())
        } else {
            None
        }
    }

    /// Drop any partially collected window.
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.count = 0;
    }

    fn take(&mut self) -> i32 {
        let avg = self.accumulator / i64::from(self.count.max(1));
        self.reset();
        avg as i32
    }
}

//! A single-line, throttled terminal progress bar.
//!
//! # Features
//!
//! - Intuitive API.
//! - Redraws in place with a carriage return, no cursor gymnastics.
//! - Redraws are throttled, so tight loops don't flood the terminal.
//! - Silent when not attached to a terminal, so piped output stays clean.
//! - Drive it from any byte copy via [`std::io::Write`].
//!
//! # Usage
//!
//! A [`Bar`] is created with a starting value, a total, a label, and a message
//! to print when it completes. Creating it immediately draws the empty bar, so
//! only create one when you're ready for output to begin.
//!
//! ```
//! use linebar::Bar;
//!
//! let mut bar = Bar::new(0, 50, "Downloading", "Complete!").unwrap();
//!
//! for _ in 0..50 {
//!     // ... Your logic ...
//!
//!     // Advance the bar and draw it, if enough time has passed since the
//!     // last draw.
//!     bar.inc(1);
//! }
//!
//! assert!(bar.is_finished());
//! ```
//!
//! Once the value reaches the total, the bar is drawn one final time and the
//! completion message is printed below it. This happens exactly once.
//!
//! ## Byte Streams
//!
//! `Bar` implements [`Write`], treating every written buffer as an increment
//! of its length. It always accepts the whole buffer and never fails, so it
//! can observe a copy without ever interrupting it:
//!
//! ```
//! use linebar::Bar;
//!
//! let data = vec![0u8; 4096];
//! let mut bar = Bar::new(0, data.len() as u64, "Copying", "Copied!").unwrap();
//!
//! std::io::copy(&mut data.as_slice(), &mut bar).unwrap();
//! assert_eq!(4096, bar.value());
//! ```
//!
//! ## Threads
//!
//! `Bar` is [`Send`] but has no internal locking. To feed one from several
//! threads, wrap it in the usual [concurrent sharing types][arcmutex].
//!
//! # Caveats
//!
//! - Bars are drawn to `stderr` unless another [`Target`] is given.
//! - Only one bar at a time; a second bar would overwrite the first's line.
//! - No dedicated render thread. The bar only redraws when you advance it.
//! - Throttling suppresses early redraws, it doesn't schedule late ones.
//!
//! [arcmutex]: https://doc.rust-lang.org/stable/book/ch16-03-shared-state.html?#atomic-reference-counting-with-arct

#![doc(html_root_url = "https://docs.rs/linebar/0.1.0")]

mod layout;
mod target;

pub use layout::{Layout, FALLBACK_WIDTH, OVERHEAD};
pub use target::Target;

use log::{debug, trace};
use std::io::{self, Stderr, Write};
use std::time::{Duration, Instant};

/// The minimum time between two throttled redraws.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(65);

/// Errors raised while configuring a [`Bar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// There is no way to make progress towards nothing.
    #[error("a progress bar's total must be greater than zero")]
    ZeroTotal,
}

/// A progress bar drawn on a single terminal line.
#[derive(Debug)]
pub struct Bar<T: Target = Stderr> {
    value: u64,
    total: u64,
    description: String,
    done: String,
    throttle: Duration,
    last_drawn: Option<Instant>,
    finished: bool,
    out: T,
}

impl Bar<Stderr> {
    /// Create a new bar drawn to `stderr`, and draw it.
    pub fn new<D, M>(value: u64, total: u64, description: D, done: M) -> Result<Bar, Error>
    where
        D: Into<String>,
        M: Into<String>,
    {
        Bar::with_target(io::stderr(), value, total, description, done)
    }
}

impl<T: Target> Bar<T> {
    /// Like [`Bar::new`], but draws to the given [`Target`].
    pub fn with_target<D, M>(
        out: T,
        value: u64,
        total: u64,
        description: D,
        done: M,
    ) -> Result<Bar<T>, Error>
    where
        D: Into<String>,
        M: Into<String>,
    {
        if total == 0 {
            return Err(Error::ZeroTotal);
        }

        let mut bar = Bar {
            value,
            total,
            description: description.into(),
            done: done.into(),
            throttle: DEFAULT_THROTTLE,
            last_drawn: None,
            finished: false,
            out,
        };

        // An initial rendering of the new bar.
        bar.draw(true);

        Ok(bar)
    }

    /// Use a different minimum time between throttled redraws.
    /// [`Duration::ZERO`] disables throttling.
    pub fn with_throttle(mut self, throttle: Duration) -> Bar<T> {
        self.throttle = throttle;
        self
    }

    /// Change the minimum time between throttled redraws.
    pub fn set_throttle(&mut self, throttle: Duration) {
        self.throttle = throttle;
    }

    /// Increase the bar's value, but don't draw it.
    pub fn add(&mut self, amount: u64) {
        self.value = self.value.saturating_add(amount);
    }

    /// Increase the bar's value and try to draw it.
    ///
    /// If this brings the value to the total, the bar is finished. Once
    /// finished, further increments still count but are never drawn.
    pub fn inc(&mut self, amount: u64) {
        self.add(amount);

        if self.finished {
            return;
        }

        self.draw(false);

        if self.is_done() {
            self.finish();
        }
    }

    /// Draw the bar.
    ///
    /// Unless `force` is set, nothing happens if the previous draw was more
    /// recent than the throttle interval. Nothing is ever drawn if the target
    /// isn't a terminal, or once the bar has finished.
    pub fn draw(&mut self, force: bool) {
        if self.finished || !self.out.is_tty() {
            return;
        }

        let throttled = self
            .last_drawn
            .is_some_and(|at| at.elapsed() < self.throttle);

        if throttled && !force {
            return;
        }

        // Queried every time, so a resized terminal is picked up.
        let columns = self.out.columns().unwrap_or_else(|| {
            trace!("Terminal width unavailable, assuming {}", FALLBACK_WIDTH);
            FALLBACK_WIDTH
        });

        let layout = Layout::compute(self.value, self.total, &self.description, columns);

        match write!(self.out, "{}", layout).and_then(|_| self.out.flush()) {
            Ok(()) => self.last_drawn = Some(Instant::now()),
            Err(e) => debug!("Failed to draw '{}': {}", self.description, e),
        }
    }

    /// Fill the bar, draw it a final time, and print the completion message.
    ///
    /// Called automatically once the value reaches the total, but can also be
    /// called early to close the bar. Only the first call has any effect.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }

        self.value = self.total;
        self.draw(true);
        self.finished = true;

        debug!("Finished '{}': {}", self.description, self.done);

        if self.out.is_tty() {
            if let Err(e) = write!(self.out, "\n{}\n", self.done).and_then(|_| self.out.flush()) {
                debug!("Failed to print completion of '{}': {}", self.description, e);
            }
        }
    }

    /// The current value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The value representing 100%.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The label drawn before the bar.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The minimum time between throttled redraws.
    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// Has the value reached the total?
    pub fn is_done(&self) -> bool {
        self.value >= self.total
    }

    /// Has the completion message been printed?
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The stream the bar is drawn to.
    pub fn target(&self) -> &T {
        &self.out
    }

    /// Give up the bar, returning the stream it was drawn to.
    pub fn into_target(self) -> T {
        self.out
    }
}

impl<T: Target> Write for Bar<T> {
    /// Advance the bar by the length of `buf`, which is always fully accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inc(buf.len() as u64);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Err(e) = self.out.flush() {
            debug!("Failed to flush '{}': {}", self.description, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Screen {
        buf: Vec<u8>,
        tty: bool,
        columns: Option<usize>,
        broken: bool,
    }

    impl Write for Screen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.broken {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }

            self.buf.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Target for Screen {
        fn is_tty(&self) -> bool {
            self.tty
        }

        fn columns(&self) -> Option<usize> {
            self.columns
        }
    }

    fn tty() -> Screen {
        Screen {
            buf: vec![],
            tty: true,
            columns: Some(FALLBACK_WIDTH),
            broken: false,
        }
    }

    fn text(bar: &Bar<Screen>) -> String {
        String::from_utf8_lossy(&bar.target().buf).into_owned()
    }

    fn unthrottled(value: u64, total: u64, desc: &str, done: &str) -> Bar<Screen> {
        Bar::with_target(tty(), value, total, desc, done)
            .unwrap()
            .with_throttle(Duration::ZERO)
    }

    #[test]
    fn zero_total() {
        let err = Bar::with_target(tty(), 0, 0, "x", "y").unwrap_err();
        assert_eq!(Error::ZeroTotal, err);
    }

    #[test]
    fn initial_draw() {
        let bar = Bar::with_target(tty(), 0, 10, "basic", "done!").unwrap();
        let expected = format!("\rbasic 0% [>{}] ", " ".repeat(66));
        assert_eq!(expected, text(&bar));
        assert!(bar.last_drawn.is_some());
        assert_eq!(DEFAULT_THROTTLE, bar.throttle());
    }

    #[test]
    fn basic() {
        let mut bar = unthrottled(0, 10, "basic", "done!");

        for n in 1..=10 {
            assert!(!bar.is_finished());
            bar.inc(1);
            assert_eq!(n, bar.value());
        }

        assert!(bar.is_done());
        assert!(bar.is_finished());

        let out = text(&bar);
        assert_eq!(1, out.matches("done!").count());
        assert!(out.ends_with("\ndone!\n"));
        assert!(out.contains("\rbasic 100% [="));
    }

    #[test]
    fn half() {
        let mut bar = unthrottled(0, 100, "x", "y");
        bar.inc(50);
        let line = Layout::compute(50, 100, "x", FALLBACK_WIDTH).to_string();
        assert!(line.contains(" 50% "));
        assert!(text(&bar).ends_with(&line));
    }

    #[test]
    fn throttled() {
        let mut bar = Bar::with_target(tty(), 0, 10, "slow", "done!")
            .unwrap()
            .with_throttle(Duration::from_secs(3600));
        let before = bar.target().buf.len();
        let drawn = bar.last_drawn;

        bar.inc(1);
        bar.draw(false);

        assert_eq!(before, bar.target().buf.len());
        assert_eq!(drawn, bar.last_drawn);
        assert_eq!(1, bar.value());

        bar.draw(true);
        assert!(bar.target().buf.len() > before);
        assert!(bar.last_drawn >= drawn);
    }

    #[test]
    fn finish_ignores_throttle() {
        let mut bar = Bar::with_target(tty(), 0, 10, "slow", "done!")
            .unwrap()
            .with_throttle(Duration::from_secs(3600));

        bar.inc(10);

        let out = text(&bar);
        assert!(out.contains("\rslow 100% ["));
        assert!(out.ends_with("\ndone!\n"));
    }

    #[test]
    fn no_draws_after_finish() {
        let mut bar = unthrottled(0, 10, "closed", "done!");
        bar.inc(10);
        let out = text(&bar);

        bar.draw(true);
        bar.draw(false);

        assert_eq!(out, text(&bar));
        assert!(text(&bar).ends_with("\ndone!\n"));
    }

    #[test]
    fn failed_draw_is_retried() {
        let mut bar = Bar::with_target(tty(), 0, 10, "retry", "done!")
            .unwrap()
            .with_throttle(Duration::from_secs(3600));
        let drawn = bar.last_drawn;

        bar.out.broken = true;
        bar.draw(true);
        assert_eq!(drawn, bar.last_drawn);

        // A fresh bar whose very first draw fails is never throttled.
        let screen = Screen {
            broken: true,
            ..tty()
        };
        let mut bar = Bar::with_target(screen, 0, 10, "retry", "done!")
            .unwrap()
            .with_throttle(Duration::from_secs(3600));
        assert_eq!(None, bar.last_drawn);

        bar.out.broken = false;
        bar.inc(1);
        assert!(bar.last_drawn.is_some());
        assert!(text(&bar).starts_with("\rretry 10% ["));
    }

    #[test]
    fn not_a_tty() {
        let screen = Screen {
            tty: false,
            ..tty()
        };
        let mut bar = Bar::with_target(screen, 0, 10, "quiet", "done!")
            .unwrap()
            .with_throttle(Duration::ZERO);

        for _ in 0..10 {
            bar.inc(1);
        }

        assert!(bar.is_finished());
        assert!(bar.target().buf.is_empty());
        assert_eq!(None, bar.last_drawn);
    }

    #[test]
    fn width_fallback() {
        let screen = Screen {
            columns: None,
            ..tty()
        };
        let bar = Bar::with_target(screen, 0, 10, "basic", "done!").unwrap();
        let line = Layout::compute(0, 10, "basic", FALLBACK_WIDTH).to_string();
        assert_eq!(line, text(&bar));
    }

    #[test]
    fn width_is_queried_per_draw() {
        let mut bar = unthrottled(0, 10, "resize", "done!");
        bar.out.columns = Some(40);
        bar.out.buf.clear();
        bar.inc(5);
        assert_eq!(40, text(&bar).chars().count());
    }

    #[test]
    fn finishes_once() {
        let mut bar = unthrottled(0, 10, "once", "done!");
        bar.inc(25);
        assert_eq!(10, bar.value());

        let len = bar.target().buf.len();
        bar.inc(3);
        bar.finish();

        assert_eq!(len, bar.target().buf.len());
        assert_eq!(13, bar.value());
        assert_eq!(1, text(&bar).matches("done!").count());
    }

    #[test]
    fn early_finish() {
        let mut bar = unthrottled(0, 100, "early", "stopped");
        bar.inc(10);
        bar.finish();

        assert_eq!(100, bar.value());
        assert!(bar.is_finished());
        assert!(text(&bar).contains("\rearly 100% ["));
        assert!(text(&bar).ends_with("\nstopped\n"));
    }

    #[test]
    fn add_does_not_draw() {
        let mut bar = unthrottled(0, 10, "add", "done!");
        let len = bar.target().buf.len();

        bar.add(20);

        assert_eq!(len, bar.target().buf.len());
        assert_eq!(20, bar.value());
        assert!(bar.is_done());
        assert!(!bar.is_finished());
    }

    #[test]
    fn add_saturates() {
        let mut bar = unthrottled(u64::MAX - 1, u64::MAX, "big", "done!");
        bar.add(5);
        assert_eq!(u64::MAX, bar.value());
    }

    #[test]
    fn write_is_inc() {
        let mut written = unthrottled(0, 100, "w", "done!");
        let mut incremented = unthrottled(0, 100, "w", "done!");

        assert_eq!(37, written.write(&[0; 37]).unwrap());
        incremented.inc(37);

        assert_eq!(incremented.value(), written.value());
        assert_eq!(text(&incremented), text(&written));
    }

    #[test]
    fn copy() {
        let data = vec![7u8; 100_000];
        let mut bar = Bar::with_target(tty(), 0, data.len() as u64, "copy", "copied").unwrap();

        let n = io::copy(&mut data.as_slice(), &mut bar).unwrap();

        assert_eq!(100_000, n);
        assert_eq!(100_000, bar.value());
        assert!(bar.is_finished());
        assert_eq!(1, text(&bar).matches("copied").count());
    }
}

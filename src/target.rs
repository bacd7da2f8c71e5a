//! Where bars are drawn to.

use std::io::{IsTerminal, Stderr, Write};
use terminal_size::{terminal_size_of, Width};

/// An output stream a [`Bar`](crate::Bar) can be drawn to.
///
/// This is implemented for [`Stderr`], the default. Implement it yourself to
/// redirect a bar somewhere else, or to capture its output in tests:
///
/// ```
/// use linebar::{Bar, Target};
/// use std::io::Write;
///
/// struct Capture(Vec<u8>);
///
/// impl Write for Capture {
///     fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
///         self.0.write(buf)
///     }
///
///     fn flush(&mut self) -> std::io::Result<()> {
///         Ok(())
///     }
/// }
///
/// impl Target for Capture {
///     fn is_tty(&self) -> bool {
///         true
///     }
///
///     fn columns(&self) -> Option<usize> {
///         Some(40)
///     }
/// }
///
/// let bar = Bar::with_target(Capture(vec![]), 0, 10, "capture", "done!").unwrap();
/// assert!(!bar.target().0.is_empty());
/// ```
pub trait Target: Write {
    /// Is this stream an interactive terminal? Nothing is ever drawn if not.
    fn is_tty(&self) -> bool;

    /// The current column width of the terminal, if it can be determined.
    fn columns(&self) -> Option<usize>;
}

impl Target for Stderr {
    fn is_tty(&self) -> bool {
        self.is_terminal()
    }

    fn columns(&self) -> Option<usize> {
        terminal_size_of(self).map(|(Width(w), _)| w as usize)
    }
}

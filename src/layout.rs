//! Line geometry for a single redraw.
//!
//! Nothing in here touches the terminal. A [`Layout`] is computed from the
//! bar's state and the current terminal width, and then printed through its
//! [`Display`](std::fmt::Display) impl.

use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Columns taken up by everything other than the description, the percentage,
/// and the inside of the brackets.
///
/// That is, the separating space, the two brackets, two columns of padding
/// around the cursor, and the two-column `>` marker.
pub const OVERHEAD: usize = 7;

/// The terminal width assumed when the real one can't be determined.
pub const FALLBACK_WIDTH: usize = 80;

/// The shape of one rendered bar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<'a> {
    description: &'a str,
    percent: u64,
    width: usize,
    fill: usize,
}

impl<'a> Layout<'a> {
    /// Lay out a bar of `value` out of `total` for a terminal that is
    /// `term_width` columns wide.
    ///
    /// The description is measured in display columns, so wide glyphs count
    /// twice. Values beyond `total` are displayed as `100%` with a full bar. A
    /// `total` of zero is considered complete.
    pub fn compute(value: u64, total: u64, description: &'a str, term_width: usize) -> Layout<'a> {
        let fraction = fraction(value, total);
        let percent = (fraction * 100.0).round_ties_even() as u64;

        // The inside of the brackets, not the entire bar.
        // [======     ]
        //  ^^^^^^^^^^^
        let width = term_width
            .saturating_sub(description.width())
            .saturating_sub(digits(percent) + 1)
            .saturating_sub(OVERHEAD);

        let fill = ((fraction * width as f64).floor() as usize).min(width);

        Layout {
            description,
            percent,
            width,
            fill,
        }
    }

    /// The rounded percentage, without the `%` sign.
    pub fn percent(&self) -> u64 {
        self.percent
    }

    /// The percentage as it appears in the line, e.g. `50%`.
    pub fn percent_text(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Width of the inside of the brackets.
    pub fn width(&self) -> usize {
        self.width
    }

    /// How many `=` characters are drawn.
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// How many blank columns follow the cursor.
    pub fn empty(&self) -> usize {
        self.width - self.fill
    }
}

impl fmt::Display for Layout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\r{} {}% [{:=>fill$}>{:>empty$}] ",
            self.description,
            self.percent,
            "",
            "",
            fill = self.fill,
            empty = self.empty(),
        )
    }
}

fn fraction(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }

    (value as f64 / total as f64).clamp(0.0, 1.0)
}

fn digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

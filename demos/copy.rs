//! Driving a bar from `io::copy`.
//!
//! Each buffer `io::copy` writes counts as that many bytes of progress. The
//! copy is far faster than the terminal, so throttling keeps the number of
//! redraws low.

use linebar::Bar;
use std::io::{self, Read};

const SIZE: u64 = 512 * 1024 * 1024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Debug)?;

    let mut source = io::repeat(0).take(SIZE);
    let mut bar = Bar::new(0, SIZE, "Copying zeroes", "Copied!")?;

    let copied = io::copy(&mut source, &mut bar)?;
    log::info!("{} bytes copied", copied);

    Ok(())
}

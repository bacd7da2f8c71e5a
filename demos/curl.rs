use curl::easy::Easy;
use linebar::Bar;
use std::io::Write;

const DEFAULT_URL: &str = "https://dl.google.com/go/go1.14.2.src.tar.gz";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::init_with_level(log::Level::Info)?;

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    println!("Starting tarball download...");

    let mut handle = Easy::new();
    handle.url(&url)?;
    handle.follow_location(true)?;

    // In order to set the target total, we need to know how big the data is
    // ahead of time. A `HEAD` request tells us.
    handle.nobody(true)?;
    handle.perform()?;
    let total = handle.content_length_download()?;

    if total <= 0.0 {
        log::error!("{} did not report a Content-Length", url);
        return Ok(());
    }

    handle.nobody(false)?;

    let mut bar = Bar::new(0, total as u64, "Downloading", "Complete!")?;

    // The bytes themselves are dropped; the bar is the only sink. `write_function`
    // requires the bar to be moved in.
    handle.write_function(move |data| Ok(bar.write(data).unwrap_or(data.len())))?;
    handle.perform()?;

    Ok(())
}

use linebar::Bar;
use std::time::Duration;

fn main() -> Result<(), linebar::Error> {
    simple_logger::init_with_level(log::Level::Debug).ok();

    println!("Starting bar...");

    // Creating the bar draws it immediately.
    let mut bar = Bar::new(0, 50, "Working", "Complete!")?;

    for _ in 0..50 {
        std::thread::sleep(Duration::from_millis(60));

        // The fiftieth increment fills the bar and prints "Complete!".
        bar.inc(1);
    }

    Ok(())
}

// Reads one event per line from stdin ("mouse"/"m", "keyboard"/"k"), so any
// external hook process can be piped in.

use click_tracker::capture::{InputCategory, ManualEventSource};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let source = Arc::new(ManualEventSource::new());

    let feeder = source.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            match line.trim() {
                "mouse" | "m" => {
                    feeder.emit(InputCategory::Mouse);
                }
                "keyboard" | "k" => {
                    feeder.emit(InputCategory::Keyboard);
                }
                "" => {}
                other => tracing::debug!("Ignoring unknown event {:?}", other),
            }
        }
    });

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    click_tracker::run(config_path.as_deref(), source)
}

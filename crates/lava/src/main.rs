use std::io::stdout;
use std::path::PathBuf;

use crossterm::event::{DisableFocusChange, EnableFocusChange};
use lava_config::Config;
use ratatui::DefaultTerminal;
use tracing::{info, warn};

mod app;
mod logging;
mod screenshot;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let data_dir = lava_config::data_dir()?;
    let log_path = logging::init(&data_dir)?;
    info!(log = %log_path.display(), "starting lava");

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default config");
        Config::default()
    });
    if let Ok(path) = lava_config::config_path() {
        info!(
            config = %path.display(),
            colors = config.palette.colors.len(),
            "config loaded"
        );
    }

    let terminal = ratatui::init();
    restoring(
        || run(config, data_dir, terminal),
        || {
            let _ = crossterm::execute!(stdout(), DisableFocusChange);
            ratatui::restore();
        },
    )
}

/// Run `body`, then `restore`, whether or not `body` failed.
fn restoring<T>(
    body: impl FnOnce() -> color_eyre::Result<T>,
    restore: impl FnOnce(),
) -> color_eyre::Result<T> {
    let result = body();
    restore();
    result
}

/// Everything that needs the terminal.
fn run(config: Config, data_dir: PathBuf, terminal: DefaultTerminal) -> color_eyre::Result<()> {
    crossterm::execute!(stdout(), EnableFocusChange)?;
    App::new(config)
        .with_screenshot_dir(data_dir.join("screenshots"))
        .run(terminal)
}

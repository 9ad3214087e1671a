mod app;
mod dish;
mod logging;
mod model;
mod services;
mod theme;
mod ui;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    let cfg = model::load_config()?;
    // Flushes buffered log lines on drop
    let _log_guard = logging::init_logging(&cfg)?;
    ui::run(cfg)
}

use std::fs::File;
use std::io;
use std::path::Path;

const LOG_FILE: &str = "ticker-view.log";

/// Routes `log` records from the workspace crates to stdout and a log file in
/// the data directory. Stdout stays on even when the file can't be opened.
pub fn setup(is_debug: bool) -> Result<(), fern::InitError> {
    let level = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:{} -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            ));
        })
        .level(log::LevelFilter::Off)
        .level_for("ticker_view", level)
        .level_for("ticker_view_data", level)
        .level_for("ticker_view_exchange", level)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("iced_winit", log::LevelFilter::Warn)
        .chain(io::stdout());

    let path = data::data_path(Some(LOG_FILE));

    let file_error = match open_log_file(&path) {
        Ok(file) => {
            logger = logger.chain(file);
            None
        }
        Err(e) => Some(e),
    };

    logger.apply()?;

    match file_error {
        None => log::debug!("Logging to {}", path.display()),
        Some(e) => log::warn!("Logging to stdout only, can't open {}: {e}", path.display()),
    }

    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    fern::log_file(path)
}

//! Routes `log` records from luban-core to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write_console(record.level(), &format!("[{}] {}", record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, message: &str) {
    let value = JsValue::from_str(message);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, message: &str) {
    eprintln!("{level:<5} {message}");
}

/// Parse `"off"`, `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`
/// (any case).
pub(crate) fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Install the console logger (once) and set the maximum level.
pub(crate) fn install(filter: LevelFilter) {
    // Only the first call installs; later calls just change the level.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
}

/// Send compressor logs to the browser console.
///
/// # Example
///
/// ```typescript
/// import { init_logging } from '@luban/wasm';
///
/// init_logging('debug'); // every search probe and downscale round
/// ```
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {level}")))?;
    install(filter);
    Ok(())
}

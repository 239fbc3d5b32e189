//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

pub fn init() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .level_for("pokemon_finder", LevelFilter::Debug)
        .chain(fern::Output::call(write_console))
        .apply()
}

fn write_console(record: &Record) {
    let line = JsValue::from_str(&record.args().to_string());
    match record.level() {
        Level::Error => console::error_1(&line),
        Level::Warn => console::warn_1(&line),
        Level::Info => console::info_1(&line),
        Level::Debug | Level::Trace => console::debug_1(&line),
    }
}

use std::fs::File;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::conf::config_struct::ErrorLevel;

pub const LOG_FILENAME: &str = "portapps.log";

pub fn init_logger(level: &ErrorLevel) {
    let filter: LevelFilter = level.into();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    match File::create(LOG_FILENAME) {
        Ok(file) => loggers.push(WriteLogger::new(filter, Config::default(), file)),
        Err(err) => eprintln!("Cannot open {} for logging {:?}", LOG_FILENAME, err),
    };

    if let Err(err) = CombinedLogger::init(loggers) {
        eprintln!("Logger error {:?}", err);
    }
}

//! Filesystem and shell helpers for portable Windows applications, plus the
//! release pipeline that turns a third-party archive into a portable bundle.

use std::error::Error;

pub mod archive;
pub mod args;
pub mod conf;
pub mod download;
pub mod release;
pub mod strategy;
pub mod utils;
pub mod win;


pub type DynResult<T> = Result<T, Box<dyn Error>>;

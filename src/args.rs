use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    conf::{config::DEFAULT_CONFIG_FILENAME, config_struct::ErrorLevel, properties::DEBUG},
    win::{
        attributes::{
            FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL,
            FILE_ATTRIBUTE_READONLY, FILE_ATTRIBUTE_SYSTEM,
        },
        shortcut::{ShortcutProperty, WindowsShortcut},
    },
};

/// Helpers and release tooling for portable Windows applications
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ArgsClap {
    /// Log level, one of: info, debug, warn, error, trace
    #[clap(short, long, value_enum, default_value = "info")]
    pub level: ErrorLevel,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download, extract and package every configured architecture
    Release {
        /// TOML property file
        #[clap(short, long, value_parser, default_value = DEFAULT_CONFIG_FILENAME)]
        config: PathBuf,

        /// Property override, e.g. -D app.version=1.2.3
        #[clap(short = 'D', long = "define", value_parser)]
        define: Vec<String>,

        /// Keep build, setup and temp folders
        #[clap(long)]
        debug: bool,
    },
    /// Create or update a Windows shortcut
    Shortcut {
        /// Where the .lnk file is written
        #[clap(short, long, value_parser)]
        path: PathBuf,

        /// What the shortcut points to
        #[clap(short, long, value_parser)]
        target: PathBuf,

        #[clap(long, value_parser, default_value = "", allow_hyphen_values = true)]
        arguments: String,

        #[clap(long, value_parser, default_value = "")]
        description: String,

        /// Icon in shell notation, path[,index]
        #[clap(long, value_parser, default_value = "")]
        icon: String,

        #[clap(long, value_parser, default_value = "")]
        working_dir: String,

        /// Properties to clear even when no value is given
        #[clap(long, value_enum)]
        clear: Vec<ShortcutField>,
    },
    /// Set file attributes, none given resets to normal
    Attrib {
        #[clap(value_parser)]
        path: PathBuf,

        #[clap(long)]
        readonly: bool,

        #[clap(long)]
        hidden: bool,

        #[clap(long)]
        system: bool,

        #[clap(long)]
        archive: bool,
    },
    /// Print the real Windows version
    Winver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShortcutField {
    Arguments,
    Description,
    Icon,
    WorkingDir,
}

pub fn release_overrides(define: &[String], debug: bool) -> Vec<String> {
    let mut overrides = define.to_vec();
    if debug {
        overrides.push(format!("{}=true", DEBUG));
    }
    overrides
}

pub fn attributes_mask(readonly: bool, hidden: bool, system: bool, archive: bool) -> u32 {
    let mask = [
        (readonly, FILE_ATTRIBUTE_READONLY),
        (hidden, FILE_ATTRIBUTE_HIDDEN),
        (system, FILE_ATTRIBUTE_SYSTEM),
        (archive, FILE_ATTRIBUTE_ARCHIVE),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .fold(0, |mask, (_, attr)| mask | attr);

    if mask == 0 {
        FILE_ATTRIBUTE_NORMAL
    } else {
        mask
    }
}

pub fn build_shortcut(
    path: PathBuf,
    target: PathBuf,
    values: [String; 4],
    clear: &[ShortcutField],
) -> WindowsShortcut {
    let [arguments, description, icon, working_dir] = values;
    let property = |value: String, field: ShortcutField| ShortcutProperty {
        value,
        clear: clear.contains(&field),
    };
    WindowsShortcut {
        shortcut_path: path,
        target_path: target,
        arguments: property(arguments, ShortcutField::Arguments),
        description: property(description, ShortcutField::Description),
        icon_location: property(icon, ShortcutField::Icon),
        working_directory: property(working_dir, ShortcutField::WorkingDir),
    }
}

pub mod build_id;
pub mod fs_utils;
pub mod init_logger;
pub mod path_utils;
pub mod progress_style;

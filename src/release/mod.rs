pub mod cleanup;
pub mod release;
pub mod release_header;

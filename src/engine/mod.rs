//! Engine module: per-file work and the command line around it

pub mod arg_parser;
pub mod cli;
pub mod codec;
pub mod executor;
pub mod tools;
pub mod transform;

// Re-export commonly used functions
pub use arg_parser::{Cli, normalize_legacy_args};
pub use cli::handle_run;
pub use executor::FileTaskExecutor;
pub use tools::{
    copy_target, format_for_path, glob_match, is_image_file, path_relative_to,
    should_include_in_walk,
};
pub use transform::{negate, negate_argb, scale, scaled_dimensions};

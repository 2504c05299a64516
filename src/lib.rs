pub mod api;
pub mod classifier;
pub mod comment;
pub mod config;
pub mod error;
pub mod formatter;
pub mod ignore;
pub mod mode;
pub mod prettify;
pub mod report;
pub mod review;
pub mod standardize;
mod string_utils;

// Re-export the main public API
pub use api::{fix_dir, fix_file, format_string, get_matching_paths, reformat, verify_file};
pub use classifier::{classify, StatementKind, StatementKinds};
pub use config::{load_config, Config};
pub use formatter::{format_sql, FormatOutcome};
pub use mode::Mode;
pub use review::review;
pub use standardize::standardize;

pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::get_data_dir;
pub use paths::{MAX_PROFILE_BYTES, format_path_with_tilde, open_bounded};
pub use terminal::sanitize_label;

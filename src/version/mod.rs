//! Version calculation from conventional commits.

pub mod bump;
pub mod calc;
pub mod format;
pub mod increment;
pub mod project;

pub use bump::{aggregate_bump, classify_commit, BumpCategory};
pub use calc::{calculate_next_version, VersionCalculation, BASELINE_TAG};
pub use format::{dev_channel_version, snapshot_version};
pub use increment::{apply_bump, increment_version, parse_base_version};
pub use project::{read_project_version, VERSION_FILE};

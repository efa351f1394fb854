//! Git operations through the git command-line tool.

pub mod command;
pub mod inspector;
pub mod locate;

pub use command::{GitRunner, extract_error_line};
pub use inspector::{RepositoryInspector, RepositorySnapshot, UNKNOWN_BRANCH, truncate_diff};
pub use locate::{find_git_executable, find_repository_root};

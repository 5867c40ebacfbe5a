mod branch_selection;
mod commit_action;
mod commit_message;
mod error;
mod file_status;
mod gitlab;
mod lint;
mod payload;

pub use branch_selection::*;
pub use commit_action::*;
pub use commit_message::*;
pub use error::*;
pub use file_status::*;
pub use gitlab::*;
pub use lint::*;
pub use payload::*;

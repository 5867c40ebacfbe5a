mod changeset;
mod http;
mod inquire;
mod preferences;
mod webide_infra;
mod workbench;

pub use changeset::*;
pub use http::GitLabHttpService;
pub use preferences::JsonPreferenceStore;
pub use webide_infra::*;
pub use workbench::TerminalWorkbench;

pub use self::inquire::WebIdeInquire;

mod cli;
mod commit;

pub use cli::*;
pub use commit::*;

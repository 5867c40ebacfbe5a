mod amend;
mod branch_selection;
mod confirmation;
mod divergence;
mod infra;
#[cfg(test)]
mod mock;
mod orchestrator;
mod success;

pub use amend::*;
pub use branch_selection::*;
pub use confirmation::*;
pub use divergence::*;
pub use infra::*;
pub use orchestrator::*;
pub use success::*;

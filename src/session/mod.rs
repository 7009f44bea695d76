mod phase;
mod session;

pub use phase::{Action, Phase};
pub use session::Session;

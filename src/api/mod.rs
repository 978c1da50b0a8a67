mod session;

pub use session::{CreateOutcome, Session};

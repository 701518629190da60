pub mod service;
pub mod session;

pub use session::{Access, Session, SessionRegistry, SessionState, SessionToken};

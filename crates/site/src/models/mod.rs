//! Types the site keeps per visitor.

pub mod session;

pub use session::{VisitorSession, keys};

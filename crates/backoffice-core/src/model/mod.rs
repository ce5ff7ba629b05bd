// ── Domain model ──
//
// Who is signed in, and with what.

mod identity;
mod session;

pub use identity::{Credentials, Identity};
pub use session::{AccessToken, Session};

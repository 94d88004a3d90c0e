//! Request gating and handshake completion
//!
//! - `gate`: decides what happens to a request before the application sees it
//! - `callback`: finishes a GitHub handshake and checks organization membership
//! - `errors`: error type shared by both

mod callback;
mod errors;
mod gate;

pub use callback::{CallbackOutcome, CallbackQuery, complete_callback};
pub use errors::AuthError;
pub use gate::{GateDecision, authorize_request};

mod cookie;
mod errors;
mod handshake;
mod store;
mod types;

pub use cookie::{CookieCodec, CookieSession};
pub use errors::SessionError;
pub use handshake::end_session;
pub use store::SessionStore;
pub use types::{DESIRED_LOCATION_KEY, GITHUB_STATE_KEY, HandshakeState, Principal, USER_KEY};

pub(crate) use handshake::{begin_handshake, complete_handshake};

//! State of an authentication attempt and the store that carries it across the redirect.

mod request;
mod state;
mod store;

pub use request::InboundRequest;
pub use state::{AttemptState, AuthenticationResult, CanonicalizationContext, ErrorContext};
pub use store::AttemptStore;

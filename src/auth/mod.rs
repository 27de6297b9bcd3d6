// Authentication module
// Credential storage, refresh coordination and the refresh call itself

mod coordinator;
mod refresh;
mod session;
mod tokens;
mod types;

pub use coordinator::{RefreshCoordinator, RefreshCycle, Rejection, Ticket, Waiter};
pub use refresh::request_access_token;
pub use session::{LogSessionListener, SessionListener};
pub use tokens::TokenStore;
pub use types::{CredentialPair, LoginRequest, RefreshRequest, RefreshResponse, TokenPairResponse};

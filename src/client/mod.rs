//! Pieces for Rust front ends talking to the API: the session context,
//! the route guard and a small HTTP client.

pub mod api;
pub mod guard;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use guard::{Decision, GuardState, Navigation, RouteGuard};
pub use session::{MemoryStorage, Session, TokenStorage};

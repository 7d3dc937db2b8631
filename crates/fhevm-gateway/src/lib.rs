//! fhevm-gateway: development decryption gateway
//!
//! Serves the HTTP surface the client dispatchers talk to (`/decrypt` and
//! `/acl/*`) against cleartext payloads from the mock library, with an
//! in-memory permission store. Intended for local networks and tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use routes::create_router;
pub use server::{GatewayServer, ServerBuilder};
pub use state::{create_shared_state, render_plaintext, GatewayState, SharedState};

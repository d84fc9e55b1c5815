//! HTTP server: shared state, route table and the `ServerBuilder`

pub mod builder;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use state::AppState;

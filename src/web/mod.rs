//! Web host module for Pastis Share.
//!
//! Serves the built single-page application and a readiness probe. The
//! file library itself never goes through HTTP.

pub mod middleware;
pub mod router;
pub mod server;

pub use router::{create_health_router, create_router, create_static_router};
pub use server::WebServer;

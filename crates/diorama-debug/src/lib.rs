//! Tuning tools for diorama - TCP server exposing the overlay panels
//!
//! Start the server in your app:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MyHandler::new()));
//! let _server = DebugServer::start(handler, DEFAULT_PORT);
//! ```

pub mod protocol;
pub mod server;

pub use protocol::*;
pub use server::{DebugHandler, DebugServer};

/// Default tuning server port
pub const DEFAULT_PORT: u16 = 9743;

// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod source;
pub mod stats;
pub mod timer;
pub mod typing_policy;
pub mod ui;

pub use app::App;
pub use error::{TypingError, TypingResult};
pub use session::{Phase, Session, SessionSnapshot};

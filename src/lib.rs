// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod challenge;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod puzzle;
pub mod registry;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;

pub use error::{ClawtchaError, Result};

// Core module: settings, logging collaborator and error taxonomy (NO I/O)
pub mod error;
pub mod log;
pub mod settings;

pub use error::*;
pub use log::*;
pub use settings::*;

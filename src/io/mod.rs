pub mod csv_export;
pub mod csv_import;
mod error;
mod file;

pub use error::ProjectIoError;
pub use file::{load_project, save_project};

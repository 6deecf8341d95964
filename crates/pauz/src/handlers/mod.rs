pub mod cache;
pub mod error;
pub mod free_journals;
pub mod garden;
pub mod guided_journals;
pub mod health;
pub mod previews;
pub mod stats;

pub use error::AppError;

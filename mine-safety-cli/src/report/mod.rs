//! Dashboard rendering
//!
//! Text views for the terminal and JSON export of the same data.

pub mod json;
pub mod txt;

pub use json::dashboard_json;
pub use txt::{AlertTable, Dashboard, DetailsView};

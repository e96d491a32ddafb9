//! Helper functions shared by the HTML and feed renderers

mod date;
mod url;

pub use date::*;
pub use url::*;

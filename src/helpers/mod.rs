//! Helper functions shared by the transformer and page views

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;

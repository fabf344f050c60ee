mod api;
mod color;
mod config;
mod document;
mod error;
mod host;
mod marker;
mod sanitize;
mod tool;
mod widget;

pub use crate::api::*;
pub use crate::color::*;
pub use crate::config::*;
pub use crate::document::*;
pub use crate::error::*;
pub use crate::host::*;
pub use crate::marker::*;
pub use crate::sanitize::*;
pub use crate::tool::*;
pub use crate::widget::*;

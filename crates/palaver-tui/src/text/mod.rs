//! Text measuring and wrapping.
//!
//! - [`visual_width`], [`truncate_to_width`] - cell-width aware sizing
//! - [`wrap_text`] - wrap message bodies, keeping embedded line breaks

mod width;
mod wrap;

pub use width::{truncate_to_width, visual_width};
pub use wrap::wrap_text;

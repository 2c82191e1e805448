//! Runtime scalar values.

mod format;
mod value;


pub use format::{DATE_DISPLAY_FORMAT, format_fixed, format_minimal, render_date};
pub use value::Value;

//! Value and key formatting for exported documents.

mod naming;
mod units;

pub use naming::{mode_key, needs_quotes, object_key, to_camel_case};
pub use units::{format_number, is_font_size, is_pixel_like, px_to_rem, Dimension, ROOT_FONT_SIZE};

use serde_json::{Number, Value};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert a number to JSON, writing integral values without a fraction.
///
/// Non-finite values become `null`.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

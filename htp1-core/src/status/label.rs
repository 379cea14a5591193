//! Bounded status strings

use heapless::String;

/// Capacity in bytes of every status string
pub const LABEL_CAPACITY: usize = 32;

/// Fixed-capacity status string
pub type Label = String<LABEL_CAPACITY>;

/// Copy `text` into a bounded string, truncating at a char boundary
///
/// Incoming strings longer than the capacity are cut rather than rejected.
pub fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

//! Roster report renderers. Every renderer emits families in family-name order.

pub mod html;
pub mod json;
pub mod text;

pub use html::render_roster_html;
pub use json::render_roster_json;
pub use text::render_roster_text;

use crate::model::Family;

/// Families ordered by `family_name`; ties keep their input order.
pub fn by_family_name(families: &[Family]) -> Vec<&Family> {
    let mut sorted: Vec<&Family> = families.iter().collect();
    sorted.sort_by_cached_key(|f| f.family_name());
    sorted
}

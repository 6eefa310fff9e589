//! Column alignment — give every element of a depth level the same width.
//!
//! Runs against the attached [`Surface`], since widths only exist once the
//! tree has been materialized there.

use tracing::trace;

use super::surface::Surface;

/// For each level `0..=max_depth`, widen every element to the widest one.
/// Levels with no elements are skipped.  Running it twice changes nothing.
pub fn normalize_widths(surface: &mut Surface, max_depth: Option<usize>) {
    let Some(max_depth) = max_depth else {
        return;
    };

    for depth in 0..=max_depth {
        let level = surface.select_depth(depth);
        let widest = level
            .iter()
            .map(|&at| surface.element(at).rendered_width())
            .max()
            .unwrap_or(0);

        trace!(depth, elements = level.len(), width = widest, "normalizing level");
        for at in level {
            surface.set_width(at, widest);
        }
    }
}

/// Helper utilities for SwapWatch

/// Clamp a widget coordinate so the box stays inside the drawable area.
pub fn clamp_position(pos: i32, widget_extent: u16, area_extent: u16) -> i32 {
    let max = i32::from(area_extent.saturating_sub(widget_extent));
    pos.clamp(0, max.max(0))
}

//! Dialog placement helpers

use ratatui::layout::Rect;

/// Where a dialog lands inside the available area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Content area (excluding border)
    pub content_area: Rect,
}

impl DialogLayout {
    /// Center a dialog of the preferred size, shrinking it to fit the area.
    /// Each dialog deeper in the stack is nudged down-right by `depth` cells so
    /// stacked dialogs stay distinguishable.
    pub fn centered(available: Rect, preferred: (u16, u16), depth: u16) -> Self {
        let width = preferred.0.min(available.width);
        let height = preferred.1.min(available.height);

        let x = available.x + available.width.saturating_sub(width) / 2;
        let y = available.y + available.height.saturating_sub(height) / 2;

        let max_x = available.x + available.width.saturating_sub(width);
        let max_y = available.y + available.height.saturating_sub(height);
        let dialog_area = Rect {
            x: x.saturating_add(depth).min(max_x),
            y: y.saturating_add(depth).min(max_y),
            width,
            height,
        };

        let content_area = Rect {
            x: dialog_area.x.saturating_add(1),
            y: dialog_area.y.saturating_add(1),
            width: dialog_area.width.saturating_sub(2),
            height: dialog_area.height.saturating_sub(2),
        };

        Self {
            dialog_area,
            content_area,
        }
    }
}

/// Check if a point is within an area
pub fn contains_point(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

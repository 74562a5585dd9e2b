// Widget modules for each screen panel and overlay.

pub mod confetti;
pub mod import_prompt;
pub mod participants;
pub mod quit_confirm;
pub mod roller;
pub mod status_bar;
pub mod summary;
pub mod winners;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the rectangle is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(30, 6, area);
        assert_eq!(result.width, 30);
        assert_eq!(result.height, 6);
        let dx = (result.x + result.width / 2) as i32 - 40;
        let dy = (result.y + result.height / 2) as i32 - 12;
        assert!(dx.unsigned_abs() <= 1, "off-center horizontally by {dx}");
        assert!(dy.unsigned_abs() <= 1, "off-center vertically by {dy}");
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 10, 3);
        let result = centered_rect(30, 6, area);
        assert!(result.width <= area.width);
        assert!(result.height <= area.height);
    }
}

//! Pop-up launcher contract.
//!
//! A launcher is drawn in-line like any widget. When it opens, the host asks
//! it for the pop-up content and for `PopUpParameters`, offsets measured
//! from the launcher's own top-left cell.

use ratatui::layout::Rect;

/// Where and how large the overlay should be, relative to the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopUpParameters {
    pub left: i32,
    pub top: i32,
    pub overlay_width: u16,
    pub overlay_height: u16,
}

impl PopUpParameters {
    /// Resolve to an absolute area, shifted and clipped to stay inside `bounds`.
    pub fn place(&self, anchor: Rect, bounds: Rect) -> Rect {
        let width = self.overlay_width.min(bounds.width);
        let height = self.overlay_height.min(bounds.height);

        let left = (anchor.x as i32).saturating_add(self.left);
        let top = (anchor.y as i32).saturating_add(self.top);

        let x = clamp_axis(left, bounds.x, bounds.width, width);
        let y = clamp_axis(top, bounds.y, bounds.height, height);

        Rect::new(x, y, width, height)
    }
}

fn clamp_axis(start: i32, origin: u16, extent: u16, size: u16) -> u16 {
    let min = origin as i32;
    let max = min + extent as i32 - size as i32;
    start.clamp(min, max.max(min)) as u16
}

/// Widgets that open a pop-up over the rest of the form.
pub trait PopUpLauncher {
    type PopUp;

    /// Build a fresh pop-up. Called on every open.
    fn create_pop_up(&self) -> Self::PopUp;

    /// Layout hint for the pop-up.
    fn pop_up_parameters(&self) -> PopUpParameters;

    /// Absolute overlay area for a launcher drawn at `anchor`.
    fn overlay_area(&self, anchor: Rect, bounds: Rect) -> Rect {
        self.pop_up_parameters().place(anchor, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PopUpParameters {
        PopUpParameters {
            left: -1,
            top: -2,
            overlay_width: 10,
            overlay_height: 4,
        }
    }

    #[test]
    fn test_place_relative_to_anchor() {
        let area = params().place(Rect::new(5, 10, 20, 1), Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(4, 8, 10, 4));
    }

    #[test]
    fn test_place_clamps_into_bounds() {
        let bounds = Rect::new(0, 0, 80, 24);

        let top_left = params().place(Rect::new(0, 0, 20, 1), bounds);
        assert_eq!(top_left, Rect::new(0, 0, 10, 4));

        let bottom_right = params().place(Rect::new(78, 23, 2, 1), bounds);
        assert_eq!(bottom_right, Rect::new(70, 20, 10, 4));
    }

    #[test]
    fn test_place_far_offsets() {
        let params = PopUpParameters {
            left: i32::MAX,
            top: i32::MIN,
            overlay_width: 10,
            overlay_height: 4,
        };
        let area = params.place(Rect::new(5, 10, 20, 1), Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(70, 0, 10, 4));
    }

    #[test]
    fn test_place_shrinks_to_small_terminal() {
        let area = params().place(Rect::new(2, 2, 5, 1), Rect::new(0, 0, 6, 3));
        assert_eq!(area, Rect::new(0, 0, 6, 3));
    }
}

//! Mouse drag panning: scroll offsets follow the pointer from where the press began.

use crate::model::Vec2;

pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    start: Option<(Vec2, Vec2)>, // (pointer, scroll origin)
}

impl DragState {
    /// Starts a drag for primary-button presses. Returns whether a drag began.
    pub fn press(&mut self, button: i16, pointer: Vec2, scroll: Vec2) -> bool {
        if button != PRIMARY_BUTTON {
            return false;
        }
        self.start = Some((pointer, scroll));
        true
    }

    /// Scroll offset the frame should take for the current pointer position.
    pub fn scroll_for(&self, pointer: Vec2) -> Option<Vec2> {
        self.start.map(|(start, origin)| origin - (pointer - start))
    }

    /// Ends the drag. Returns whether one was active.
    pub fn release(&mut self) -> bool { self.start.take().is_some() }

    pub fn is_dragging(&self) -> bool { self.start.is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_button_does_not_drag() {
        let mut d = DragState::default();
        assert!(!d.press(2, Vec2::ZERO, Vec2::ZERO));
        assert!(!d.is_dragging());
        assert_eq!(d.scroll_for(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn scroll_moves_opposite_to_pointer() {
        let mut d = DragState::default();
        assert!(d.press(0, Vec2::new(100.0, 100.0), Vec2::new(50.0, 20.0)));
        assert_eq!(d.scroll_for(Vec2::new(90.0, 130.0)), Some(Vec2::new(60.0, -10.0)));
        // offsets are relative to the press, not the previous move
        assert_eq!(d.scroll_for(Vec2::new(100.0, 100.0)), Some(Vec2::new(50.0, 20.0)));
        assert!(d.release());
        assert!(!d.release());
    }
}

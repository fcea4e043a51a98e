use egui::{pos2, vec2, Pos2, Vec2};

pub const DEFAULT_POSITION: Pos2 = pos2(10.0, 1035.0);
pub const BAR_SIZE: Vec2 = vec2(400.0, 32.0);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        grab_offset: Vec2,
    },
}

// Window-level state of the bar. Owned by the UI thread; mutated only through
// tray commands and pointer input.
#[derive(Clone, Debug)]
pub struct OverlayState {
    pub position: Pos2,
    pub locked: bool,
    pub visible: bool,
    drag: DragState,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            locked: false,
            visible: true,
            drag: DragState::Idle,
        }
    }
}

impl OverlayState {
    // Primary-button press. While locked, the press is ignored and the bar
    // stays put.
    pub fn begin_drag(&mut self, cursor: Pos2) {
        if self.locked {
            return;
        }
        self.drag = DragState::Dragging {
            grab_offset: cursor - self.position,
        };
    }

    // Pointer move. Returns the new window origin while a drag is in
    // progress, `None` otherwise.
    pub fn update_drag(&mut self, cursor: Pos2) -> Option<Pos2> {
        match self.drag {
            DragState::Dragging { grab_offset } => {
                self.position = cursor - grab_offset;
                Some(self.position)
            }
            DragState::Idle => None,
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }

    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(x: f32, y: f32) -> OverlayState {
        OverlayState {
            position: pos2(x, y),
            ..OverlayState::default()
        }
    }

    #[test]
    fn unlocked_drag_moves_by_the_cursor_delta() {
        let mut state = state_at(100.0, 200.0);
        state.begin_drag(pos2(10.0, 10.0));
        let moved = state.update_drag(pos2(50.0, 50.0));
        state.end_drag();
        assert_eq!(moved, Some(pos2(140.0, 240.0)));
        assert_eq!(state.position, pos2(140.0, 240.0));
        assert!(!state.dragging());
    }

    #[test]
    fn locked_drag_leaves_the_position_unchanged() {
        let mut state = state_at(100.0, 200.0);
        state.locked = true;
        state.begin_drag(pos2(10.0, 10.0));
        assert!(!state.dragging());
        assert_eq!(state.update_drag(pos2(50.0, 50.0)), None);
        state.end_drag();
        assert_eq!(state.position, pos2(100.0, 200.0));
    }

    #[test]
    fn move_without_a_press_does_nothing() {
        let mut state = state_at(0.0, 0.0);
        assert_eq!(state.update_drag(pos2(50.0, 50.0)), None);
        assert_eq!(state.position, pos2(0.0, 0.0));
    }

    #[test]
    fn toggle_lock_is_idempotent_under_double_invocation() {
        let mut state = OverlayState::default();
        assert!(state.toggle_lock());
        assert!(!state.toggle_lock());
        assert!(!state.locked);
    }

    #[test]
    fn visibility_alternates_from_visible() {
        let mut state = OverlayState::default();
        assert!(state.visible);
        assert!(!state.toggle_visible());
        assert!(state.toggle_visible());
    }
}

//! Pointer state as seen by the kernel

/// Which pointer button an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints live cells
    Primary,
    /// Erases cells
    Secondary,
}

/// Pointer position normalized to the viewport plus two button flags
///
/// `x` grows to the right and `y` grows upwards, both nominally in [0, 1].
/// Positions outside the window are kept as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub x: f32,
    pub y: f32,
    pub primary: bool,
    pub secondary: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer position given in window pixels (origin top-left)
    pub fn pointer_moved(&mut self, px: f64, py: f64, width: u32, height: u32) {
        let width = width.max(1) as f64;
        let height = height.max(1) as f64;
        self.x = (px / width) as f32;
        self.y = (1.0 - py / height) as f32;
    }

    pub fn set_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.primary = pressed,
            PointerButton::Secondary => self.secondary = pressed,
        }
    }

    /// The `mouse` uniform: x, y, primary, secondary
    pub fn mouse(&self) -> [f32; 4] {
        [
            self.x,
            self.y,
            if self.primary { 1.0 } else { 0.0 },
            if self.secondary { 1.0 } else { 0.0 },
        ]
    }
}

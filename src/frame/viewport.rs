//! Window dimensions and the transforms derived from them

use cgmath::{Deg, Matrix4, SquareMatrix};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed camera looking at the origin from 34 units away
#[rustfmt::skip]
pub const VIEW_MATRIX: Matrix4<f32> = Matrix4::new(
    -0.754709, -0.277263,  0.594591, 0.0,
    -0.0,       0.906308,  0.422618, 0.0,
    -0.656059,  0.318954, -0.683999, 0.0,
    -0.000001, -0.000001, -34.0,     1.0,
);

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub projection: Matrix4<f32>,
    pub orthographic: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,
    pub view_orthographic: Matrix4<f32>,
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        let mut viewport = Self {
            width: width.max(1),
            height: height.max(1),
            projection: Matrix4::identity(),
            orthographic: Matrix4::identity(),
            view: VIEW_MATRIX,
            view_projection: Matrix4::identity(),
            view_orthographic: Matrix4::identity(),
        };
        viewport.update_matrices();
        viewport
    }

    /// Applies a new window size; zero sizes (minimized windows) are ignored
    ///
    /// Returns whether anything changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.update_matrices();
        log::debug!("Viewport resized to {}x{}", width, height);
        true
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn update_matrices(&mut self) {
        let (width, height) = (self.width as f32, self.height as f32);
        let perspective = cgmath::perspective(Deg(FOV_Y_DEGREES), self.aspect(), Z_NEAR, Z_FAR);
        self.projection = OPENGL_TO_WGPU_MATRIX * perspective;
        // Pixel space with the origin at the top-left corner
        self.orthographic =
            OPENGL_TO_WGPU_MATRIX * cgmath::ortho(0.0, width, height, 0.0, Z_NEAR, Z_FAR);
        self.view_projection = self.projection * self.view;
        self.view_orthographic = self.orthographic * self.view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    fn assert_close(a: Vector4<f32>, b: Vector4<f32>) {
        assert!((a - b).x.abs() < 1e-4, "{:?} != {:?}", a, b);
        assert!((a - b).y.abs() < 1e-4, "{:?} != {:?}", a, b);
        assert!((a - b).z.abs() < 1e-4, "{:?} != {:?}", a, b);
        assert!((a - b).w.abs() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn orthographic_maps_pixel_corners_to_ndc() {
        let viewport = ViewportState::new(800, 600);
        let top_left = viewport.orthographic * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let bottom_right = viewport.orthographic * Vector4::new(800.0, 600.0, -1.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-5 && (top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5 && (bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn resize_recomputes_matrices() {
        let mut viewport = ViewportState::new(800, 600);
        let before = viewport;
        assert!(viewport.resize(1024, 256));
        assert_eq!(viewport.dimensions(), (1024, 256));
        assert_eq!(viewport.aspect(), 4.0);
        assert_ne!(viewport.projection, before.projection);
        assert_ne!(viewport.view_orthographic, before.view_orthographic);
        assert_eq!(viewport.view, VIEW_MATRIX);

        let expected = viewport.projection * viewport.view;
        let probe = Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_close(viewport.view_projection * probe, expected * probe);
    }

    #[test]
    fn zero_and_unchanged_sizes_are_ignored() {
        let mut viewport = ViewportState::new(640, 480);
        let before = viewport;
        assert!(!viewport.resize(0, 480));
        assert!(!viewport.resize(640, 0));
        assert!(!viewport.resize(640, 480));
        assert_eq!(viewport, before);
    }

    #[test]
    fn view_places_origin_in_front_of_camera() {
        let eye_space = VIEW_MATRIX * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(eye_space.x.abs() < 1e-5 && eye_space.y.abs() < 1e-5);
        assert!((eye_space.z + 34.0).abs() < 1e-4);
    }
}

//! Viewport selection and layout.
//!
//! The window shows either one monitor at full size or all four in quadrants: the X, Y,
//! and Z side views across the top-left, top-right, and bottom-left, and the main camera
//! bottom-right.

use glam::{Mat4, Vec3};

/// One of the four views the viewer can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Monitor {
    /// Orthographic view looking down `-X`.
    X,
    /// Orthographic view looking down `-Y`.
    Y,
    /// Orthographic view looking down `-Z`.
    Z,
    /// The active camera.
    Main,
}

impl Monitor {
    pub const ALL: [Monitor; 4] = [Monitor::X, Monitor::Y, Monitor::Z, Monitor::Main];

    /// Where the side-view eye sits relative to the subject, and its up vector.
    fn axis_offset(self) -> Option<(Vec3, Vec3)> {
        match self {
            Monitor::X => Some((Vec3::X, Vec3::Y)),
            Monitor::Y => Some((Vec3::Y, Vec3::NEG_Z)),
            Monitor::Z => Some((Vec3::Z, Vec3::Y)),
            Monitor::Main => None,
        }
    }

    /// View matrix of a side view framing `subject` from `distance` away.
    ///
    /// Returns `None` for [`Monitor::Main`], which uses the camera's own view.
    pub fn axis_view(self, subject: Vec3, distance: f32) -> Option<Mat4> {
        self.axis_offset()
            .map(|(offset, up)| Mat4::look_at_rh(subject + offset * distance, subject, up))
    }

    /// Top-left corner of this monitor's quadrant, in halves of the window size.
    fn quadrant(self) -> (u32, u32) {
        match self {
            Monitor::X => (0, 0),
            Monitor::Y => (1, 0),
            Monitor::Z => (0, 1),
            Monitor::Main => (1, 1),
        }
    }
}

/// Which monitors are on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenMode {
    Single(Monitor),
    All,
}

impl Default for ScreenMode {
    fn default() -> Self {
        ScreenMode::Single(Monitor::Main)
    }
}

impl ScreenMode {
    /// Screen selected by the number keys `1..=5`.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(ScreenMode::Single(Monitor::X)),
            2 => Some(ScreenMode::Single(Monitor::Y)),
            3 => Some(ScreenMode::Single(Monitor::Z)),
            4 => Some(ScreenMode::Single(Monitor::Main)),
            5 => Some(ScreenMode::All),
            _ => None,
        }
    }

    /// Monitors to render this frame, in draw order.
    pub fn monitors(self) -> Vec<Monitor> {
        match self {
            ScreenMode::Single(monitor) => vec![monitor],
            ScreenMode::All => Monitor::ALL.to_vec(),
        }
    }

    /// Pixel rectangle of `monitor` in a `width × height` window.
    pub fn viewport(self, monitor: Monitor, width: u32, height: u32) -> ViewportRect {
        match self {
            ScreenMode::Single(_) => ViewportRect {
                x: 0,
                y: 0,
                width,
                height,
            },
            ScreenMode::All => {
                let (w, h) = (width / 2, height / 2);
                let (qx, qy) = monitor.quadrant();
                ViewportRect {
                    x: qx * w,
                    y: qy * h,
                    width: w,
                    height: h,
                }
            }
        }
    }
}

impl std::fmt::Display for ScreenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenMode::Single(Monitor::X) => write!(f, "screen 1 (X axis)"),
            ScreenMode::Single(Monitor::Y) => write!(f, "screen 2 (Y axis)"),
            ScreenMode::Single(Monitor::Z) => write!(f, "screen 3 (Z axis)"),
            ScreenMode::Single(Monitor::Main) => write!(f, "screen 4 (main camera)"),
            ScreenMode::All => write!(f, "screen 5 (all viewports)"),
        }
    }
}

/// Pixel rectangle with a top-left origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewportRect {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_mode_splits_window_into_quadrants() {
        let mode = ScreenMode::All;
        let rects: Vec<_> = mode
            .monitors()
            .into_iter()
            .map(|m| mode.viewport(m, 800, 600))
            .collect();
        assert_eq!(rects[0], ViewportRect { x: 0, y: 0, width: 400, height: 300 });
        assert_eq!(rects[1], ViewportRect { x: 400, y: 0, width: 400, height: 300 });
        assert_eq!(rects[2], ViewportRect { x: 0, y: 300, width: 400, height: 300 });
        assert_eq!(rects[3], ViewportRect { x: 400, y: 300, width: 400, height: 300 });
    }

    #[test]
    fn single_mode_fills_window() {
        let mode = ScreenMode::Single(Monitor::Y);
        assert_eq!(mode.monitors(), vec![Monitor::Y]);
        assert_eq!(
            mode.viewport(Monitor::Y, 1024, 768),
            ViewportRect { x: 0, y: 0, width: 1024, height: 768 }
        );
    }

    #[test]
    fn number_keys_select_screens() {
        assert_eq!(ScreenMode::from_number(4), Some(ScreenMode::default()));
        assert_eq!(ScreenMode::from_number(5), Some(ScreenMode::All));
        assert_eq!(ScreenMode::from_number(0), None);
        assert_eq!(ScreenMode::from_number(6), None);
    }

    #[test]
    fn axis_views_look_at_subject() {
        let subject = Vec3::new(2.0, -1.0, 4.0);
        for monitor in [Monitor::X, Monitor::Y, Monitor::Z] {
            let view = monitor.axis_view(subject, 5.0).unwrap();
            let p = view.transform_point3(subject);
            assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
        }
        assert!(Monitor::Main.axis_view(subject, 5.0).is_none());
    }

    #[test]
    fn top_view_keeps_negative_z_up() {
        let view = Monitor::Y.axis_view(Vec3::ZERO, 5.0).unwrap();
        let p = view.transform_point3(Vec3::new(0.0, 0.0, -1.0));
        assert!(p.y > 0.0);
    }
}

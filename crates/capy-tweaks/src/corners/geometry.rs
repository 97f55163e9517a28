//! Corner placement and cutout paths.
//!
//! Pure functions of the current monitor/panel geometry and radius; the
//! modules call them on every rebuild.

use crate::color::Color;
use crate::layout::{Monitor, PanelGeometry};
use crate::stage::{ActorId, DrawContext, Painter};
use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

/// Corner radius at scale 1, in logical pixels.
pub const CORNER_RADIUS: f64 = 12.0;

pub fn corner_radius(scale_factor: f64) -> f64 {
    CORNER_RADIUS * scale_factor
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ScreenCorner {
    pub const ALL: [ScreenCorner; 4] = [
        ScreenCorner::TopLeft,
        ScreenCorner::TopRight,
        ScreenCorner::BottomLeft,
        ScreenCorner::BottomRight,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Lowercase name used in the color setting keys.
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerKind {
    Screen(ScreenCorner),
    Panel(Side),
}

/// Axis-aligned box, `x1 <= x2`, `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Top-left of a screen corner actor, in stage coordinates.
pub fn screen_corner_origin(monitor: &Monitor, corner: ScreenCorner, radius: f64) -> (f64, f64) {
    let x = f64::from(monitor.x);
    let y = f64::from(monitor.y);
    let right = x + f64::from(monitor.width) - radius;
    let bottom = y + f64::from(monitor.height) - radius;

    match corner {
        ScreenCorner::TopLeft => (x, y),
        ScreenCorner::TopRight => (right, y),
        ScreenCorner::BottomLeft => (x, bottom),
        ScreenCorner::BottomRight => (right, bottom),
    }
}

/// Box of a panel corner, relative to the panel. Sits directly below it.
pub fn panel_corner_bounds(side: Side, panel: PanelGeometry, radius: f64) -> Bounds {
    let (x1, x2) = match side {
        Side::Left => (0.0, radius),
        Side::Right => (panel.width - radius, panel.width),
    };

    Bounds {
        x1,
        y1: panel.height,
        x2,
        y2: panel.height + radius,
    }
}

/// Fill the region of a `radius`-sized box outside the quarter circle that
/// faces `corner`.
pub fn fill_screen_corner(cx: &mut dyn DrawContext, corner: ScreenCorner, radius: f64, color: Color) {
    cx.set_source_color(color);

    match corner {
        ScreenCorner::TopLeft => {
            cx.arc(radius, radius, radius, PI, 3.0 * PI / 2.0);
            cx.line_to(0.0, 0.0);
        }
        ScreenCorner::TopRight => {
            cx.arc(0.0, radius, radius, 3.0 * PI / 2.0, 2.0 * PI);
            cx.line_to(radius, 0.0);
        }
        ScreenCorner::BottomLeft => {
            cx.arc(radius, 0.0, radius, PI / 2.0, PI);
            cx.line_to(0.0, radius);
        }
        ScreenCorner::BottomRight => {
            cx.arc(0.0, 0.0, radius, 0.0, PI / 2.0);
            cx.line_to(radius, radius);
        }
    }

    cx.close_path();
    cx.fill();
}

/// Fill the concave piece joining the panel's bottom edge to the screen side.
pub fn fill_panel_corner(cx: &mut dyn DrawContext, side: Side, radius: f64, color: Color) {
    cx.set_source_color(color);
    cx.move_to(0.0, 0.0);

    match side {
        Side::Left => cx.arc(radius, radius, radius, PI, 3.0 * PI / 2.0),
        Side::Right => cx.arc(0.0, radius, radius, 3.0 * PI / 2.0, 2.0 * PI),
    }
    cx.line_to(radius, 0.0);

    cx.close_path();
    cx.fill();
}

// === Painters ===

/// Paints a screen corner. The radius is the actor's width.
pub struct ScreenCornerPainter {
    pub corner: ScreenCorner,
    pub color: Color,
}

impl Painter for ScreenCornerPainter {
    fn paint(&self, cx: &mut dyn DrawContext, width: f64, _height: f64) {
        fill_screen_corner(cx, self.corner, width, self.color);
    }
}

/// Paints a panel corner with a color that can change between repaints.
pub struct PanelCornerPainter {
    pub side: Side,
    pub color: Rc<Cell<Color>>,
}

impl Painter for PanelCornerPainter {
    fn paint(&self, cx: &mut dyn DrawContext, width: f64, _height: f64) {
        fill_panel_corner(cx, self.side, width, self.color.get());
    }
}

/// A live screen corner actor and what it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerActor {
    pub kind: CornerKind,
    pub position: (f64, f64),
    pub radius: f64,
    /// Index of the monitor in the layout's list.
    pub monitor: usize,
    pub actor: ActorId,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawOp, RecordingContext};

    #[test]
    fn test_screen_corner_origins() {
        let monitor = Monitor::new(0, 0, 1920, 1080);
        let origin = |c| screen_corner_origin(&monitor, c, 12.0);

        assert_eq!(origin(ScreenCorner::TopLeft), (0.0, 0.0));
        assert_eq!(origin(ScreenCorner::TopRight), (1908.0, 0.0));
        assert_eq!(origin(ScreenCorner::BottomLeft), (0.0, 1068.0));
        assert_eq!(origin(ScreenCorner::BottomRight), (1908.0, 1068.0));
    }

    #[test]
    fn test_screen_corner_origin_offset_monitor() {
        let monitor = Monitor::new(1920, 200, 2560, 1440);
        assert_eq!(
            screen_corner_origin(&monitor, ScreenCorner::BottomRight, 24.0),
            (4456.0, 1616.0)
        );
    }

    #[test]
    fn test_panel_corner_bounds() {
        let panel = PanelGeometry {
            width: 1200.0,
            height: 32.0,
        };

        let left = panel_corner_bounds(Side::Left, panel, 12.0);
        assert_eq!((left.x1, left.x2, left.y1, left.y2), (0.0, 12.0, 32.0, 44.0));

        let right = panel_corner_bounds(Side::Right, panel, 12.0);
        assert_eq!(
            (right.x1, right.x2, right.y1, right.y2),
            (1188.0, 1200.0, 32.0, 44.0)
        );
        assert_eq!(right.width(), 12.0);
        assert_eq!(right.height(), 12.0);
    }

    #[test]
    fn test_radius_follows_scale() {
        assert_eq!(corner_radius(1.0), 12.0);
        assert_eq!(corner_radius(2.0), 24.0);
    }

    #[test]
    fn test_bottom_right_path() {
        let mut cx = RecordingContext::default();
        fill_screen_corner(&mut cx, ScreenCorner::BottomRight, 12.0, Color::BLACK);

        assert_eq!(
            cx.ops,
            vec![
                DrawOp::Color(Color::BLACK),
                DrawOp::Arc(0.0, 0.0, 12.0, 0.0, PI / 2.0),
                DrawOp::LineTo(12.0, 12.0),
                DrawOp::Close,
                DrawOp::Fill,
            ]
        );
    }

    #[test]
    fn test_panel_corner_paths_start_at_origin() {
        for side in [Side::Left, Side::Right] {
            let mut cx = RecordingContext::default();
            fill_panel_corner(&mut cx, side, 12.0, Color::WHITE);

            assert_eq!(cx.ops[1], DrawOp::MoveTo(0.0, 0.0));
            assert_eq!(cx.ops[3], DrawOp::LineTo(12.0, 0.0));
            assert_eq!(cx.ops.last(), Some(&DrawOp::Fill));
        }
    }
}

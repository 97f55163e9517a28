//! Painter backend on tiny-skia.
//!
//! Path operations are collected into a [`PathBuilder`]; arcs become cubic
//! segments of at most a quarter turn. `fill` uses the even-odd rule.

use capy_tweaks::Color;
use capy_tweaks::stage::DrawContext;
use image::{Rgba, RgbaImage};
use std::f64::consts::FRAC_PI_2;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

pub struct RasterContext<'a> {
    target: &'a mut Pixmap,
    color: Color,
    path: PathBuilder,
    has_point: bool,
}

impl<'a> RasterContext<'a> {
    pub fn new(target: &'a mut Pixmap) -> Self {
        Self {
            target,
            color: Color::BLACK,
            path: PathBuilder::new(),
            has_point: false,
        }
    }

    /// One cubic approximating the arc from `a0` to `a1` (at most 90°).
    fn arc_segment(&mut self, xc: f64, yc: f64, radius: f64, a0: f64, a1: f64) {
        let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan() * radius;
        let (sin0, cos0) = a0.sin_cos();
        let (sin1, cos1) = a1.sin_cos();

        let p1 = (xc + radius * cos0 - k * sin0, yc + radius * sin0 + k * cos0);
        let p2 = (xc + radius * cos1 + k * sin1, yc + radius * sin1 - k * cos1);
        let p3 = (xc + radius * cos1, yc + radius * sin1);
        self.path.cubic_to(
            p1.0 as f32,
            p1.1 as f32,
            p2.0 as f32,
            p2.1 as f32,
            p3.0 as f32,
            p3.1 as f32,
        );
    }
}

impl DrawContext for RasterContext<'_> {
    fn set_source_color(&mut self, color: Color) {
        self.color = color;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(x as f32, y as f32);
        self.has_point = true;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(x as f32, y as f32);
        self.has_point = true;
    }

    /// Clockwise (increasing angle) from `angle1` to `angle2`, joined to the
    /// current point by a line.
    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, mut angle2: f64) {
        while angle2 < angle1 {
            angle2 += 2.0 * std::f64::consts::PI;
        }

        let (start_x, start_y) = (xc + radius * angle1.cos(), yc + radius * angle1.sin());
        if self.has_point {
            self.line_to(start_x, start_y);
        } else {
            self.move_to(start_x, start_y);
        }

        let segments = ((angle2 - angle1) / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = (angle2 - angle1) / segments as f64;
        for i in 0..segments {
            let a0 = angle1 + step * i as f64;
            self.arc_segment(xc, yc, radius, a0, a0 + step);
        }
    }

    fn close_path(&mut self) {
        self.path.close();
        self.has_point = false;
    }

    fn fill(&mut self) {
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        self.has_point = false;
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        let [red, green, blue, alpha] = self.color.to_array();
        paint.set_color_rgba8(red, green, blue, alpha);
        paint.anti_alias = true;
        self.target.fill_path(
            &path,
            &paint,
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }
}

/// Copy a premultiplied pixmap into a straight-alpha image.
pub fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let px = pixels[(y * width + x) as usize].demultiply();
        Rgba([px.red(), px.green(), px.blue(), px.alpha()])
    })
}

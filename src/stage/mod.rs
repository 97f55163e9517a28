//! Software stage: a retained actor tree rendered with tiny-skia.
//!
//! Actors attached to the panel are offset by the panel origin. Each actor
//! keeps its own pixmap until it is resized or asks for a repaint; opacity
//! is applied while composing, so fades don't repaint.

pub mod raster;

use capy_tweaks::Monitor;
use capy_tweaks::animation::Transition;
use capy_tweaks::stage::{ActorId, Container, Easing, Painter, Property, Stage};
use image::RgbaImage;
use log::{debug, warn};
use raster::RasterContext;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Smallest box holding every monitor: `(x, y, width, height)`.
pub fn canvas_bounds(monitors: &[Monitor]) -> (i32, i32, u32, u32) {
    let Some(first) = monitors.first() else {
        return (0, 0, 1, 1);
    };
    let init = (first.x, first.y, first.x + first.width, first.y + first.height);
    let (x1, y1, x2, y2) = monitors.iter().fold(init, |(x1, y1, x2, y2), m| {
        (
            x1.min(m.x),
            y1.min(m.y),
            x2.max(m.x + m.width),
            y2.max(m.y + m.height),
        )
    });
    (x1, y1, (x2 - x1).max(1) as u32, (y2 - y1).max(1) as u32)
}

struct ActorNode {
    style_class: String,
    painter: Rc<dyn Painter>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    /// 0..=255
    opacity: f64,
    parent: Option<Container>,
    fade: Option<Transition>,
    raster: Option<Pixmap>,
}

impl ActorNode {
    /// The cached pixmap, painting it first if needed. `None` while the
    /// actor has no area.
    fn render(&mut self) -> Option<&Pixmap> {
        if self.raster.is_none() {
            let mut pixmap = Pixmap::new(self.width.ceil() as u32, self.height.ceil() as u32)?;
            self.painter
                .paint(&mut RasterContext::new(&mut pixmap), self.width, self.height);
            self.raster = Some(pixmap);
        }
        self.raster.as_ref()
    }
}

#[derive(Default)]
pub struct SoftwareStage {
    next_id: Cell<u64>,
    actors: RefCell<BTreeMap<ActorId, ActorNode>>,
    panel_origin: Cell<(f64, f64)>,
    changed: Cell<bool>,
}

impl SoftwareStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_panel_origin(&self, x: f64, y: f64) {
        if self.panel_origin.replace((x, y)) != (x, y) {
            self.changed.set(true);
        }
    }

    /// Advance running fades. Returns true while any is in flight.
    pub fn tick(&self, now: Instant) -> bool {
        let mut running = false;
        for node in self.actors.borrow_mut().values_mut() {
            let Some(fade) = node.fade else {
                continue;
            };
            node.opacity = fade.value_at(now);
            if fade.is_finished(now) {
                node.fade = None;
            } else {
                running = true;
            }
            self.changed.set(true);
        }
        running
    }

    /// Whether anything visible changed since the last call.
    pub fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }

    pub fn live_count(&self) -> usize {
        self.actors.borrow().len()
    }

    /// Compose every attached actor onto a transparent canvas whose top-left
    /// corner is at stage position `origin`.
    pub fn compose(&self, origin: (i32, i32), width: u32, height: u32) -> RgbaImage {
        let Some(mut canvas) = Pixmap::new(width, height) else {
            return RgbaImage::new(width, height);
        };
        let (panel_x, panel_y) = self.panel_origin.get();

        for node in self.actors.borrow_mut().values_mut() {
            let (dx, dy) = match node.parent {
                Some(Container::TopChrome) => (0.0, 0.0),
                Some(Container::Panel) => (panel_x, panel_y),
                None => continue,
            };
            let opacity = (node.opacity / 255.0) as f32;
            if opacity <= 0.0 {
                continue;
            }

            let x = (node.x + dx).round() as i32 - origin.0;
            let y = (node.y + dy).round() as i32 - origin.1;
            let Some(raster) = node.render() else {
                continue;
            };
            let paint = PixmapPaint {
                opacity,
                ..PixmapPaint::default()
            };
            canvas.draw_pixmap(x, y, raster.as_ref(), &paint, Transform::identity(), None);
        }

        raster::to_image(&canvas)
    }

    fn with_node(&self, actor: ActorId, f: impl FnOnce(&mut ActorNode)) {
        match self.actors.borrow_mut().get_mut(&actor) {
            Some(node) => {
                f(node);
                self.changed.set(true);
            }
            None => warn!("Operation on unknown actor {:?}", actor),
        }
    }
}

impl Stage for SoftwareStage {
    fn create_actor(&self, style_class: &str, painter: Rc<dyn Painter>) -> ActorId {
        let id = ActorId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.actors.borrow_mut().insert(
            id,
            ActorNode {
                style_class: style_class.to_string(),
                painter,
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
                opacity: 255.0,
                parent: None,
                fade: None,
                raster: None,
            },
        );
        id
    }

    fn set_position(&self, actor: ActorId, x: f64, y: f64) {
        self.with_node(actor, |node| {
            node.x = x;
            node.y = y;
        });
    }

    fn set_size(&self, actor: ActorId, width: f64, height: f64) {
        self.with_node(actor, |node| {
            if (node.width, node.height) != (width, height) {
                node.width = width;
                node.height = height;
                node.raster = None;
            }
        });
    }

    fn set_opacity(&self, actor: ActorId, opacity: u8) {
        self.with_node(actor, |node| {
            node.fade = None;
            node.opacity = f64::from(opacity);
        });
    }

    fn add_child(&self, parent: Container, actor: ActorId) {
        self.with_node(actor, |node| {
            if let Some(old) = node.parent.replace(parent) {
                warn!("{} moved from {:?} to {:?}", node.style_class, old, parent);
            }
        });
    }

    fn remove_child(&self, parent: Container, actor: ActorId) {
        self.with_node(actor, |node| {
            if node.parent == Some(parent) {
                node.parent = None;
            }
        });
    }

    fn queue_repaint(&self, actor: ActorId) {
        self.with_node(actor, |node| node.raster = None);
    }

    fn animate(
        &self,
        actor: ActorId,
        property: Property,
        target: f64,
        duration: Duration,
        easing: Easing,
    ) {
        match property {
            Property::Opacity => self.with_node(actor, |node| {
                let target = target.clamp(0.0, 255.0);
                node.fade = Some(Transition::new(
                    node.opacity,
                    target,
                    Instant::now(),
                    duration,
                    easing,
                ));
            }),
        }
    }

    fn remove_transition(&self, actor: ActorId, property: Property) {
        match property {
            Property::Opacity => self.with_node(actor, |node| node.fade = None),
        }
    }

    fn destroy(&self, actor: ActorId) {
        match self.actors.borrow_mut().remove(&actor) {
            Some(node) => {
                debug!("Destroyed {} {:?}", node.style_class, actor);
                self.changed.set(true);
            }
            None => warn!("Actor {:?} destroyed twice", actor),
        }
    }
}

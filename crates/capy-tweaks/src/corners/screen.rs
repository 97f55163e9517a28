//! Rounded screen corners: four black cutouts on every monitor.

use super::geometry::{
    CornerActor, CornerKind, ScreenCorner, ScreenCornerPainter, corner_radius,
    screen_corner_origin,
};
use crate::TweakContext;
use crate::color::Color;
use crate::layout::{LayoutEvent, LayoutSource};
use crate::registry::Module;
use crate::stage::{Container, Stage};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const STYLE_CLASS: &str = "screen-corner";
const SUBSCRIBER: &str = "screen-corners";

/// Corner actors currently on stage, owned by the module.
struct CornerSet {
    stage: Rc<dyn Stage>,
    layout: Rc<dyn LayoutSource>,
    corners: RefCell<Vec<CornerActor>>,
}

impl CornerSet {
    /// Destroy every corner, then create four per monitor.
    fn rebuild(&self) {
        if self.layout.starting_up() {
            debug!("Screen corners: still starting up, deferring build");
            return;
        }

        self.clear();

        let radius = corner_radius(self.layout.scale_factor());
        let monitors = self.layout.monitors();
        let mut corners = self.corners.borrow_mut();

        for (index, monitor) in monitors.iter().enumerate() {
            for corner in ScreenCorner::ALL {
                let (x, y) = screen_corner_origin(monitor, corner, radius);
                let painter = Rc::new(ScreenCornerPainter {
                    corner,
                    color: Color::BLACK,
                });

                let actor = self.stage.create_actor(STYLE_CLASS, painter);
                self.stage.set_size(actor, radius, radius);
                self.stage.set_position(actor, x, y);
                self.stage.add_child(Container::TopChrome, actor);
                self.stage.queue_repaint(actor);

                corners.push(CornerActor {
                    kind: CornerKind::Screen(corner),
                    position: (x, y),
                    radius,
                    monitor: index,
                    actor,
                    color: Color::BLACK,
                });
            }
        }

        info!(
            "Screen corners: built {} corner(s) on {} monitor(s), radius {}",
            corners.len(),
            monitors.len(),
            radius
        );
    }

    fn clear(&self) {
        let old = std::mem::take(&mut *self.corners.borrow_mut());
        if !old.is_empty() {
            debug!("Screen corners: destroying {} corner(s)", old.len());
        }
        for corner in old {
            self.stage.destroy(corner.actor);
        }
    }
}

pub struct ScreenCorners {
    ctx: TweakContext,
    set: Rc<CornerSet>,
}

impl ScreenCorners {
    pub fn new(ctx: TweakContext) -> Self {
        let set = Rc::new(CornerSet {
            stage: ctx.stage.clone(),
            layout: ctx.layout.clone(),
            corners: RefCell::new(Vec::new()),
        });
        Self { ctx, set }
    }

    /// Snapshot of the live corners.
    pub fn corners(&self) -> Vec<CornerActor> {
        self.set.corners.borrow().clone()
    }
}

impl Module for ScreenCorners {
    fn name(&self) -> &'static str {
        "ScreenCorners"
    }

    fn activate(&mut self) {
        for event in LayoutEvent::ALL {
            let weak: Weak<CornerSet> = Rc::downgrade(&self.set);
            self.ctx.bus.subscribe(event, SUBSCRIBER, move || {
                if let Some(set) = weak.upgrade() {
                    set.rebuild();
                }
            });
        }

        self.set.rebuild();
    }

    fn deactivate(&mut self) {
        self.ctx.bus.unsubscribe_all(SUBSCRIBER);
        self.set.clear();
    }
}

impl Drop for ScreenCorners {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Monitor;
    use crate::settings::MemorySettings;
    use crate::testing::{FakeLayout, FakeShell, FakeStage};

    struct Fixture {
        layout: Rc<FakeLayout>,
        stage: Rc<FakeStage>,
        module: ScreenCorners,
    }

    fn fixture(layout: FakeLayout) -> Fixture {
        let layout = Rc::new(layout);
        let stage = Rc::new(FakeStage::new());
        let ctx = TweakContext::new(
            Rc::new(MemorySettings::new()),
            layout.clone(),
            stage.clone(),
            Rc::new(FakeShell::new()),
        );
        Fixture {
            layout,
            stage,
            module: ScreenCorners::new(ctx),
        }
    }

    #[test]
    fn test_four_corners_per_monitor() {
        let mut f = fixture(FakeLayout::new());
        f.module.activate();
        assert_eq!(f.stage.live_count(), 4);

        f.layout.set_monitors(vec![
            Monitor::new(0, 0, 1920, 1080),
            Monitor::new(1920, 0, 1920, 1080),
        ]);
        f.layout.emit(LayoutEvent::MonitorsChanged);
        assert_eq!(f.stage.live_count(), 8);
        assert_eq!(f.stage.children_of(Container::TopChrome), 8);
        assert_eq!(f.stage.destroyed_count(), 4);
    }

    #[test]
    fn test_corner_positions() {
        let mut f = fixture(FakeLayout::new());
        f.module.activate();

        let corners = f.module.corners();
        let at = |c| {
            corners
                .iter()
                .find(|a| a.kind == CornerKind::Screen(c))
                .map(|a| a.position)
        };
        assert_eq!(at(ScreenCorner::TopLeft), Some((0.0, 0.0)));
        assert_eq!(at(ScreenCorner::BottomRight), Some((1908.0, 1068.0)));

        let br = corners
            .iter()
            .find(|a| a.kind == CornerKind::Screen(ScreenCorner::BottomRight))
            .map(|a| f.stage.actor(a.actor));
        let br = br.unwrap();
        assert_eq!((br.x, br.y, br.width, br.height), (1908.0, 1068.0, 12.0, 12.0));
        assert_eq!(br.style_class, STYLE_CLASS);
    }

    #[test]
    fn test_radius_uses_current_scale() {
        let mut f = fixture(FakeLayout::new());
        f.module.activate();
        f.layout.set_scale(2.0);
        f.layout.emit(LayoutEvent::WorkareasChanged);

        assert!(f.module.corners().iter().all(|c| c.radius == 24.0));
        let br = f
            .module
            .corners()
            .into_iter()
            .find(|a| a.kind == CornerKind::Screen(ScreenCorner::BottomRight))
            .unwrap();
        assert_eq!(br.position, (1896.0, 1056.0));
    }

    #[test]
    fn test_build_deferred_until_startup_complete() {
        let mut f = fixture(FakeLayout::starting());
        f.module.activate();
        assert_eq!(f.stage.live_count(), 0);

        f.layout.emit(LayoutEvent::MonitorsChanged);
        assert_eq!(f.stage.live_count(), 0);

        f.layout.finish_startup();
        assert_eq!(f.stage.live_count(), 4);
    }

    #[test]
    fn test_toggle_cycles_do_not_leak() {
        let mut f = fixture(FakeLayout::new());
        for _ in 0..5 {
            f.module.activate();
            f.module.deactivate();
        }

        assert_eq!(f.stage.live_count(), 0);
        for event in LayoutEvent::ALL {
            assert_eq!(f.layout.handler_count(event), 0);
        }

        f.module.activate();
        assert_eq!(f.stage.live_count(), 4);
        for event in LayoutEvent::ALL {
            assert_eq!(f.layout.handler_count(event), 1);
        }
    }

    #[test]
    fn test_deactivate_without_activate() {
        let mut f = fixture(FakeLayout::new());
        f.module.deactivate();
        assert_eq!(f.stage.destroyed_count(), 0);
    }

    #[test]
    fn test_painted_black() {
        let mut f = fixture(FakeLayout::new());
        f.module.activate();

        for corner in f.module.corners() {
            let ops = f.stage.paint(corner.actor);
            assert_eq!(ops.first(), Some(&crate::testing::DrawOp::Color(Color::BLACK)));
        }
    }
}

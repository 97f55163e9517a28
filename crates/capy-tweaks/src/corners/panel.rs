//! Panel corners: two concave pieces hanging below the panel ends.
//!
//! Unlike screen corners, each panel corner tracks its own host signals
//! (panel position/size and both color keys). The panel style signal is
//! connected once by the module and forwarded to both corners, which fade
//! out while the panel shows the overview style.

use super::geometry::{PanelCornerPainter, Side, corner_radius, panel_corner_bounds};
use crate::TweakContext;
use crate::animation::{ANIMATION_TIME, Easing};
use crate::color::Color;
use crate::layout::{LayoutEvent, LayoutSource, PanelProperty};
use crate::registry::Module;
use crate::settings::{SettingsStore, keys};
use crate::signal::HandlerId;
use crate::stage::{ActorId, Container, Property, Stage};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const STYLE_CLASS: &str = "panel-corner";
const SUBSCRIBER: &str = "panel-corners";

/// Pseudo-class the panel carries while the overview is shown.
const OVERVIEW_PSEUDO_CLASS: &str = "overview";

fn color_key(side: Side) -> &'static str {
    match side {
        Side::Left => keys::PANEL_CORNERS_LEFT_COLOR,
        Side::Right => keys::PANEL_CORNERS_RIGHT_COLOR,
    }
}

fn read_color(settings: &dyn SettingsStore, side: Side) -> Color {
    Color::from_setting(&settings.get_string(color_key(side)))
}

/// State shared between a corner handle and its signal callbacks.
struct CornerState {
    side: Side,
    actor: ActorId,
    radius: Cell<f64>,
    color: Rc<Cell<Color>>,
    stage: Rc<dyn Stage>,
    layout: Rc<dyn LayoutSource>,
}

impl CornerState {
    fn update_position(&self) {
        let bounds = panel_corner_bounds(
            self.side,
            self.layout.panel_geometry(),
            self.radius.get(),
        );
        self.stage.set_position(self.actor, bounds.x1, bounds.y1);
    }

    fn reload_color(&self, settings: &dyn SettingsStore) {
        let color = read_color(settings, self.side);
        if color != self.color.get() {
            debug!("Panel corner {}: color {:?}", self.side.name(), color);
            self.color.set(color);
        }
        self.stage.queue_repaint(self.actor);
    }

    /// Resize, reposition and fade toward the panel's current visual state.
    fn style_changed(&self) {
        let radius = corner_radius(self.layout.scale_factor());
        self.radius.set(radius);
        self.stage.set_size(self.actor, radius, radius);
        self.update_position();

        let in_overview = self
            .layout
            .panel_style_pseudo_class()
            .is_some_and(|class| class.contains(OVERVIEW_PSEUDO_CLASS));
        let target = if in_overview { 0.0 } else { 255.0 };

        self.stage.remove_transition(self.actor, Property::Opacity);
        self.stage.animate(
            self.actor,
            Property::Opacity,
            target,
            ANIMATION_TIME,
            Easing::EaseInOutQuad,
        );
        self.stage.queue_repaint(self.actor);
    }
}

enum Connection {
    Layout(HandlerId),
    Settings(HandlerId),
}

/// One live panel corner. Must be released with [`PanelCorner::teardown`].
pub struct PanelCorner {
    state: Rc<CornerState>,
    settings: Rc<dyn SettingsStore>,
    connections: Vec<Connection>,
    torn_down: bool,
}

impl PanelCorner {
    /// Create the actor (fully transparent) and connect its four signals.
    fn new(ctx: &TweakContext, side: Side) -> Self {
        let radius = corner_radius(ctx.layout.scale_factor());
        let color = Rc::new(Cell::new(read_color(ctx.settings.as_ref(), side)));
        let painter = Rc::new(PanelCornerPainter {
            side,
            color: color.clone(),
        });

        let actor = ctx.stage.create_actor(STYLE_CLASS, painter);
        ctx.stage.set_opacity(actor, 0);

        let state = Rc::new(CornerState {
            side,
            actor,
            radius: Cell::new(radius),
            color,
            stage: ctx.stage.clone(),
            layout: ctx.layout.clone(),
        });

        let mut connections = Vec::with_capacity(4);
        for property in [PanelProperty::Position, PanelProperty::Size] {
            let weak = Rc::downgrade(&state);
            let id = ctx.layout.connect_panel(
                property,
                Box::new(move || {
                    if let Some(state) = weak.upgrade() {
                        state.update_position();
                    }
                }),
            );
            connections.push(Connection::Layout(id));
        }

        for key in [keys::PANEL_CORNERS_LEFT_COLOR, keys::PANEL_CORNERS_RIGHT_COLOR] {
            let weak = Rc::downgrade(&state);
            let id = ctx.settings.connect_changed(
                key,
                Box::new(move |settings, _| {
                    if let Some(state) = weak.upgrade() {
                        state.reload_color(settings);
                    }
                }),
            );
            connections.push(Connection::Settings(id));
        }

        Self {
            state,
            settings: ctx.settings.clone(),
            connections,
            torn_down: false,
        }
    }

    pub fn side(&self) -> Side {
        self.state.side
    }

    pub fn actor(&self) -> ActorId {
        self.state.actor
    }

    pub fn color(&self) -> Color {
        self.state.color.get()
    }

    /// Disconnect the four signals and destroy the actor.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let layout = &self.state.layout;
        for connection in self.connections.drain(..) {
            match connection {
                Connection::Layout(id) => layout.disconnect(id),
                Connection::Settings(id) => self.settings.disconnect(id),
            }
        }

        self.state.stage.remove_child(Container::Panel, self.state.actor);
        self.state.stage.destroy(self.state.actor);
        self.torn_down = true;
    }
}

impl Drop for PanelCorner {
    fn drop(&mut self) {
        if !self.torn_down {
            warn!(
                "Panel corner {} dropped without teardown",
                self.state.side.name()
            );
            self.release();
        }
    }
}

/// The live corners, rebuilt together on layout changes.
struct CornerPair {
    ctx: TweakContext,
    corners: RefCell<Vec<PanelCorner>>,
}

impl CornerPair {
    fn rebuild(&self) {
        if self.ctx.layout.starting_up() {
            debug!("Panel corners: still starting up, deferring build");
            return;
        }

        self.clear();

        let mut corners = self.corners.borrow_mut();
        for side in [Side::Left, Side::Right] {
            let corner = PanelCorner::new(&self.ctx, side);
            self.ctx.stage.add_child(Container::Panel, corner.actor());
            corner.state.style_changed();
            corners.push(corner);
        }

        let panel = self.ctx.layout.panel_geometry();
        info!(
            "Panel corners: built for {}x{} panel",
            panel.width, panel.height
        );
    }

    fn style_changed(&self) {
        for corner in self.corners.borrow().iter() {
            corner.state.style_changed();
        }
    }

    fn clear(&self) {
        let old = std::mem::take(&mut *self.corners.borrow_mut());
        for corner in old {
            corner.teardown();
        }
    }
}

pub struct PanelCorners {
    pair: Rc<CornerPair>,
    style_signal: Option<HandlerId>,
}

impl PanelCorners {
    pub fn new(ctx: TweakContext) -> Self {
        Self {
            pair: Rc::new(CornerPair {
                ctx,
                corners: RefCell::new(Vec::new()),
            }),
            style_signal: None,
        }
    }

    /// Side, actor and color of each live corner.
    pub fn corners(&self) -> Vec<(Side, ActorId, Color)> {
        self.pair
            .corners
            .borrow()
            .iter()
            .map(|c| (c.side(), c.actor(), c.color()))
            .collect()
    }
}

impl Module for PanelCorners {
    fn name(&self) -> &'static str {
        "PanelCorners"
    }

    fn activate(&mut self) {
        if self.style_signal.is_some() {
            warn!("PanelCorners activated twice, ignoring");
            return;
        }

        let ctx = &self.pair.ctx;
        for event in LayoutEvent::ALL {
            let weak: Weak<CornerPair> = Rc::downgrade(&self.pair);
            ctx.bus.subscribe(event, SUBSCRIBER, move || {
                if let Some(pair) = weak.upgrade() {
                    pair.rebuild();
                }
            });
        }

        let weak = Rc::downgrade(&self.pair);
        self.style_signal = Some(ctx.layout.connect_panel(
            PanelProperty::Style,
            Box::new(move || {
                if let Some(pair) = weak.upgrade() {
                    pair.style_changed();
                }
            }),
        ));

        self.pair.rebuild();
    }

    fn deactivate(&mut self) {
        let ctx = &self.pair.ctx;
        ctx.bus.unsubscribe_all(SUBSCRIBER);
        if let Some(id) = self.style_signal.take() {
            ctx.layout.disconnect(id);
        }
        self.pair.clear();
    }
}

impl Drop for PanelCorners {
    fn drop(&mut self) {
        self.deactivate();
    }
}

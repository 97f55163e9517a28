//! Recording fakes for the host boundaries.

use crate::color::Color;
use crate::layout::{LayoutEvent, LayoutSource, Monitor, PanelGeometry, PanelProperty};
use crate::shell::{OverviewClick, ShellHost, WindowId};
use crate::signal::{HandlerId, HandlerIds, SignalTable};
use crate::stage::{ActorId, Container, DrawContext, Easing, Painter, Property, Stage};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

// === Layout ===

pub struct FakeLayout {
    monitors: RefCell<Vec<Monitor>>,
    panel: Cell<PanelGeometry>,
    scale: Cell<f64>,
    starting_up: Cell<bool>,
    pseudo_class: RefCell<Option<String>>,
    ids: HandlerIds,
    events: SignalTable<LayoutEvent, dyn Fn()>,
    panel_signals: SignalTable<PanelProperty, dyn Fn()>,
}

impl FakeLayout {
    /// One 1920x1080 monitor, 1920x32 panel, scale 1, startup finished.
    pub fn new() -> Self {
        Self {
            monitors: RefCell::new(vec![Monitor::new(0, 0, 1920, 1080)]),
            panel: Cell::new(PanelGeometry {
                width: 1920.0,
                height: 32.0,
            }),
            scale: Cell::new(1.0),
            starting_up: Cell::new(false),
            pseudo_class: RefCell::new(None),
            ids: HandlerIds::new(),
            events: SignalTable::new(),
            panel_signals: SignalTable::new(),
        }
    }

    pub fn starting() -> Self {
        let layout = Self::new();
        layout.starting_up.set(true);
        layout
    }

    pub fn set_monitors(&self, monitors: Vec<Monitor>) {
        *self.monitors.borrow_mut() = monitors;
    }

    pub fn set_panel(&self, width: f64, height: f64) {
        self.panel.set(PanelGeometry { width, height });
    }

    pub fn set_scale(&self, scale: f64) {
        self.scale.set(scale);
    }

    pub fn set_pseudo_class(&self, class: Option<&str>) {
        *self.pseudo_class.borrow_mut() = class.map(str::to_string);
    }

    pub fn finish_startup(&self) {
        self.starting_up.set(false);
        self.emit(LayoutEvent::StartupComplete);
    }

    pub fn emit(&self, event: LayoutEvent) {
        for handler in self.events.snapshot(&event) {
            handler();
        }
    }

    pub fn emit_panel(&self, property: PanelProperty) {
        for handler in self.panel_signals.snapshot(&property) {
            handler();
        }
    }

    pub fn handler_count(&self, event: LayoutEvent) -> usize {
        self.events.count(&event)
    }

    pub fn panel_handler_count(&self, property: PanelProperty) -> usize {
        self.panel_signals.count(&property)
    }
}

impl LayoutSource for FakeLayout {
    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.borrow().clone()
    }

    fn panel_geometry(&self) -> PanelGeometry {
        self.panel.get()
    }

    fn scale_factor(&self) -> f64 {
        self.scale.get()
    }

    fn starting_up(&self) -> bool {
        self.starting_up.get()
    }

    fn panel_style_pseudo_class(&self) -> Option<String> {
        self.pseudo_class.borrow().clone()
    }

    fn connect(&self, event: LayoutEvent, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.ids.next();
        self.events.insert(id, event, Rc::from(callback));
        id
    }

    fn connect_panel(&self, property: PanelProperty, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.ids.next();
        self.panel_signals.insert(id, property, Rc::from(callback));
        id
    }

    fn disconnect(&self, id: HandlerId) {
        if !self.events.disconnect(id) {
            self.panel_signals.disconnect(id);
        }
    }
}

// === Stage ===

#[derive(Clone)]
pub struct FakeActor {
    pub style_class: String,
    pub painter: Rc<dyn Painter>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: u8,
    pub parent: Option<Container>,
    pub repaints: usize,
    /// Last requested easing: (property, target, duration, curve).
    pub transition: Option<(Property, f64, Duration, Easing)>,
    pub removed_transitions: usize,
}

#[derive(Default)]
pub struct FakeStage {
    next_id: Cell<u64>,
    actors: RefCell<BTreeMap<ActorId, FakeActor>>,
    destroyed: Cell<usize>,
}

impl FakeStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.actors.borrow().len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.get()
    }

    pub fn actor(&self, id: ActorId) -> FakeActor {
        self.actors
            .borrow()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| panic!("actor {:?} is not alive", id))
    }

    pub fn with_class(&self, class: &str) -> Vec<(ActorId, FakeActor)> {
        self.actors
            .borrow()
            .iter()
            .filter(|(_, a)| a.style_class == class)
            .map(|(id, a)| (*id, a.clone()))
            .collect()
    }

    pub fn children_of(&self, container: Container) -> usize {
        self.actors
            .borrow()
            .values()
            .filter(|a| a.parent == Some(container))
            .count()
    }

    /// Run the painter of `id` into a recorder.
    pub fn paint(&self, id: ActorId) -> Vec<DrawOp> {
        let actor = self.actor(id);
        let mut recorder = RecordingContext::default();
        actor
            .painter
            .paint(&mut recorder, actor.width, actor.height);
        recorder.ops
    }

    fn with_actor(&self, id: ActorId, f: impl FnOnce(&mut FakeActor)) {
        let mut actors = self.actors.borrow_mut();
        let actor = actors
            .get_mut(&id)
            .unwrap_or_else(|| panic!("operation on destroyed actor {:?}", id));
        f(actor);
    }
}

impl Stage for FakeStage {
    fn create_actor(&self, style_class: &str, painter: Rc<dyn Painter>) -> ActorId {
        let id = ActorId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.actors.borrow_mut().insert(
            id,
            FakeActor {
                style_class: style_class.to_string(),
                painter,
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
                opacity: 255,
                parent: None,
                repaints: 0,
                transition: None,
                removed_transitions: 0,
            },
        );
        id
    }

    fn set_position(&self, actor: ActorId, x: f64, y: f64) {
        self.with_actor(actor, |a| {
            a.x = x;
            a.y = y;
        });
    }

    fn set_size(&self, actor: ActorId, width: f64, height: f64) {
        self.with_actor(actor, |a| {
            a.width = width;
            a.height = height;
        });
    }

    fn set_opacity(&self, actor: ActorId, opacity: u8) {
        self.with_actor(actor, |a| a.opacity = opacity);
    }

    fn add_child(&self, parent: Container, actor: ActorId) {
        self.with_actor(actor, |a| {
            assert!(a.parent.is_none(), "actor added twice");
            a.parent = Some(parent);
        });
    }

    fn remove_child(&self, parent: Container, actor: ActorId) {
        self.with_actor(actor, |a| {
            assert_eq!(a.parent, Some(parent), "removed from the wrong parent");
            a.parent = None;
        });
    }

    fn queue_repaint(&self, actor: ActorId) {
        self.with_actor(actor, |a| a.repaints += 1);
    }

    fn animate(
        &self,
        actor: ActorId,
        property: Property,
        target: f64,
        duration: Duration,
        easing: Easing,
    ) {
        self.with_actor(actor, |a| a.transition = Some((property, target, duration, easing)));
    }

    fn remove_transition(&self, actor: ActorId, _property: Property) {
        self.with_actor(actor, |a| {
            a.transition = None;
            a.removed_transitions += 1;
        });
    }

    fn destroy(&self, actor: ActorId) {
        if self.actors.borrow_mut().remove(&actor).is_none() {
            panic!("actor {:?} destroyed twice", actor);
        }
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

// === Drawing ===

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Color(Color),
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc(f64, f64, f64, f64, f64),
    Close,
    Fill,
}

#[derive(Default)]
pub struct RecordingContext {
    pub ops: Vec<DrawOp>,
}

impl DrawContext for RecordingContext {
    fn set_source_color(&mut self, color: Color) {
        self.ops.push(DrawOp::Color(color));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        self.ops.push(DrawOp::Arc(xc, yc, radius, angle1, angle2));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::Close);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }
}

// === Shell ===

pub struct FakeShell {
    pub overview_supported: Cell<bool>,
    pub favorites_supported: Cell<bool>,
    pub overview_visible: Cell<bool>,
    pub overview_toggles: Cell<usize>,
    pub activated: RefCell<Vec<WindowId>>,
    pub favorite_notifications: Cell<bool>,
    pub active_workspace: Cell<usize>,
    pub workspace_count: Cell<usize>,
    ids: HandlerIds,
    attention: SignalTable<(), dyn Fn(&WindowId)>,
    clicks: SignalTable<(), dyn Fn(&OverviewClick)>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self {
            overview_supported: Cell::new(true),
            favorites_supported: Cell::new(true),
            overview_visible: Cell::new(false),
            overview_toggles: Cell::new(0),
            activated: RefCell::new(Vec::new()),
            favorite_notifications: Cell::new(true),
            active_workspace: Cell::new(0),
            workspace_count: Cell::new(4),
            ids: HandlerIds::new(),
            attention: SignalTable::new(),
            clicks: SignalTable::new(),
        }
    }

    pub fn demand_attention(&self, window: &str) {
        let window = WindowId::new(window);
        for handler in self.attention.snapshot(&()) {
            handler(&window);
        }
    }

    pub fn click_overview(&self, click: OverviewClick) {
        for handler in self.clicks.snapshot(&()) {
            handler(&click);
        }
    }

    pub fn attention_handlers(&self) -> usize {
        self.attention.len()
    }

    pub fn click_handlers(&self) -> usize {
        self.clicks.len()
    }
}

impl ShellHost for FakeShell {
    fn has_overview(&self) -> bool {
        self.overview_supported.get()
    }

    fn has_favorite_notifications(&self) -> bool {
        self.favorites_supported.get()
    }

    fn overview_visible(&self) -> bool {
        self.overview_visible.get()
    }

    fn toggle_overview(&self) {
        self.overview_toggles.set(self.overview_toggles.get() + 1);
        self.overview_visible.set(!self.overview_visible.get());
    }

    fn activate_window(&self, window: &WindowId) {
        self.activated.borrow_mut().push(window.clone());
    }

    fn connect_window_demands_attention(&self, callback: Box<dyn Fn(&WindowId)>) -> HandlerId {
        let id = self.ids.next();
        self.attention.insert(id, (), Rc::from(callback));
        id
    }

    fn connect_overview_clicked(&self, callback: Box<dyn Fn(&OverviewClick)>) -> HandlerId {
        let id = self.ids.next();
        self.clicks.insert(id, (), Rc::from(callback));
        id
    }

    fn disconnect(&self, id: HandlerId) {
        if !self.attention.disconnect(id) {
            self.clicks.disconnect(id);
        }
    }

    fn set_favorite_notifications(&self, enabled: bool) {
        self.favorite_notifications.set(enabled);
    }

    fn active_workspace(&self) -> usize {
        self.active_workspace.get()
    }

    fn workspace_count(&self) -> usize {
        self.workspace_count.get()
    }

    fn switch_workspace(&self, index: usize) {
        self.active_workspace.set(index);
    }
}

//! Rendering boundary.
//!
//! Actors are host-owned render objects addressed by [`ActorId`]. Each one is
//! created with a [`Painter`] the host calls whenever the actor must redraw;
//! the painter issues path operations on the supplied [`DrawContext`].

pub use crate::animation::Easing;
use crate::color::Color;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

/// Parent containers an actor can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// Chrome layer above every window, in stage coordinates.
    TopChrome,
    /// The top panel; children use panel-relative coordinates.
    Panel,
}

/// Actor properties that can be eased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
}

impl Property {
    pub fn name(self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
        }
    }
}

/// Path-filling drawing context handed to painters (Cairo-style).
///
/// Angles are radians, measured clockwise from the positive x axis since the
/// y axis points down.
pub trait DrawContext {
    fn set_source_color(&mut self, color: Color);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Arc around `(xc, yc)` from `angle1` to `angle2`, increasing angle.
    /// Connected to the current point by a straight line, if there is one.
    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64);
    fn close_path(&mut self);
    /// Fill and clear the current path.
    fn fill(&mut self);
}

/// Repaint callback for an actor.
pub trait Painter {
    fn paint(&self, cx: &mut dyn DrawContext, width: f64, height: f64);
}

/// Actor tree owned by the host.
pub trait Stage {
    fn create_actor(&self, style_class: &str, painter: Rc<dyn Painter>) -> ActorId;

    fn set_position(&self, actor: ActorId, x: f64, y: f64);

    fn set_size(&self, actor: ActorId, width: f64, height: f64);

    /// Opacity in 0..=255.
    fn set_opacity(&self, actor: ActorId, opacity: u8);

    fn add_child(&self, parent: Container, actor: ActorId);

    fn remove_child(&self, parent: Container, actor: ActorId);

    /// Ask the host to call the actor's painter before the next frame.
    fn queue_repaint(&self, actor: ActorId);

    /// Start easing `property` to `target`. Replaces any in-flight transition
    /// on the same property.
    fn animate(
        &self,
        actor: ActorId,
        property: Property,
        target: f64,
        duration: Duration,
        easing: Easing,
    );

    fn remove_transition(&self, actor: ActorId, property: Property);

    /// Detach from any parent and release the actor.
    fn destroy(&self, actor: ActorId);
}

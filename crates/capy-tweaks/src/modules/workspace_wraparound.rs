//! Workspace navigation with a swappable neighbor strategy.
//!
//! The navigator asks its strategy for the neighbor of the active workspace.
//! The wraparound module installs [`WraparoundNeighbors`] while active and
//! puts [`ClampedNeighbors`] back when deactivated.

use crate::registry::Module;
use crate::shell::ShellHost;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Up and Left move toward index 0.
    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

/// Picks the workspace reached from `index` when moving in `direction`.
pub trait NeighborStrategy {
    fn name(&self) -> &'static str;

    /// `count` is at least 1 and `index < count`.
    fn neighbor(&self, index: usize, count: usize, direction: Direction) -> usize;
}

/// Stops at the first and last workspace.
pub struct ClampedNeighbors;

impl NeighborStrategy for ClampedNeighbors {
    fn name(&self) -> &'static str {
        "clamped"
    }

    fn neighbor(&self, index: usize, count: usize, direction: Direction) -> usize {
        if direction.is_backward() {
            index.saturating_sub(1)
        } else {
            (index + 1).min(count - 1)
        }
    }
}

/// Moves past either end to the other end.
pub struct WraparoundNeighbors;

impl NeighborStrategy for WraparoundNeighbors {
    fn name(&self) -> &'static str {
        "wraparound"
    }

    fn neighbor(&self, index: usize, count: usize, direction: Direction) -> usize {
        let last = count - 1;
        if direction.is_backward() {
            if index > 0 { index - 1 } else { last }
        } else if index < last {
            index + 1
        } else {
            0
        }
    }
}

pub struct WorkspaceNavigator {
    shell: Rc<dyn ShellHost>,
    strategy: RefCell<Rc<dyn NeighborStrategy>>,
}

impl WorkspaceNavigator {
    /// Navigator with the clamped strategy.
    pub fn new(shell: Rc<dyn ShellHost>) -> Self {
        Self {
            shell,
            strategy: RefCell::new(Rc::new(ClampedNeighbors)),
        }
    }

    pub fn set_strategy(&self, strategy: Rc<dyn NeighborStrategy>) {
        debug!("Workspace neighbor strategy: {}", strategy.name());
        *self.strategy.borrow_mut() = strategy;
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.borrow().name()
    }

    /// Neighbor of the active workspace, or `None` without workspaces.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        let count = self.shell.workspace_count();
        if count == 0 {
            return None;
        }
        let index = self.shell.active_workspace().min(count - 1);
        Some(self.strategy.borrow().neighbor(index, count, direction))
    }

    /// Switch to the neighbor. Returns the new index if it changed.
    pub fn navigate(&self, direction: Direction) -> Option<usize> {
        let target = self.neighbor(direction)?;
        if target == self.shell.active_workspace() {
            return None;
        }
        info!("Switching to workspace {} ({:?})", target, direction);
        self.shell.switch_workspace(target);
        Some(target)
    }
}

pub struct WorkspaceWraparound {
    navigator: Rc<WorkspaceNavigator>,
}

impl WorkspaceWraparound {
    pub fn new(navigator: Rc<WorkspaceNavigator>) -> Self {
        Self { navigator }
    }
}

impl Module for WorkspaceWraparound {
    fn name(&self) -> &'static str {
        "WorkspaceWraparound"
    }

    fn activate(&mut self) {
        self.navigator.set_strategy(Rc::new(WraparoundNeighbors));
    }

    fn deactivate(&mut self) {
        self.navigator.set_strategy(Rc::new(ClampedNeighbors));
    }
}

//! Silence the "pinned"/"unpinned" notifications for favorites.

use crate::registry::Module;
use crate::shell::ShellHost;
use std::rc::Rc;

pub struct FavoriteNotifications {
    shell: Rc<dyn ShellHost>,
    /// Set while notifications are silenced by this module.
    suppressed: bool,
}

impl FavoriteNotifications {
    pub fn new(shell: Rc<dyn ShellHost>) -> Self {
        Self {
            shell,
            suppressed: false,
        }
    }
}

impl Module for FavoriteNotifications {
    fn name(&self) -> &'static str {
        "FavoriteNotifications"
    }

    fn activate(&mut self) {
        self.shell.set_favorite_notifications(false);
        self.suppressed = true;
    }

    fn deactivate(&mut self) {
        // Only undo our own change.
        if self.suppressed {
            self.shell.set_favorite_notifications(true);
            self.suppressed = false;
        }
    }
}

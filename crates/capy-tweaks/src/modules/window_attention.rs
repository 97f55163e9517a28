//! Focus windows that demand attention instead of announcing them.

use crate::registry::Module;
use crate::shell::ShellHost;
use crate::signal::HandlerId;
use log::debug;
use std::rc::Rc;

pub struct WindowAttention {
    shell: Rc<dyn ShellHost>,
    signal: Option<HandlerId>,
}

impl WindowAttention {
    pub fn new(shell: Rc<dyn ShellHost>) -> Self {
        Self {
            shell,
            signal: None,
        }
    }
}

impl Module for WindowAttention {
    fn name(&self) -> &'static str {
        "WindowAttention"
    }

    fn activate(&mut self) {
        let shell = Rc::downgrade(&self.shell);
        self.signal = Some(self.shell.connect_window_demands_attention(Box::new(
            move |window| {
                let Some(shell) = shell.upgrade() else {
                    return;
                };
                if shell.overview_visible() {
                    debug!("Overview shown, leaving {} alone", window.0);
                    return;
                }
                debug!("Activating window {}", window.0);
                shell.activate_window(window);
            },
        )));
    }

    fn deactivate(&mut self) {
        if let Some(id) = self.signal.take() {
            self.shell.disconnect(id);
        }
    }
}

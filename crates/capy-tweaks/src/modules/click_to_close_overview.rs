//! Close the overview by clicking its background.

use crate::registry::Module;
use crate::shell::{BUTTON_PRIMARY, OverviewClick, ShellHost};
use crate::signal::HandlerId;
use log::debug;
use std::rc::Rc;

pub struct ClickToCloseOverview {
    shell: Rc<dyn ShellHost>,
    signal: Option<HandlerId>,
}

impl ClickToCloseOverview {
    pub fn new(shell: Rc<dyn ShellHost>) -> Self {
        Self {
            shell,
            signal: None,
        }
    }
}

/// Whether a background click should close the overview.
fn closes_overview(click: &OverviewClick) -> bool {
    click.button <= BUTTON_PRIMARY && !click.on_search_entry
}

impl Module for ClickToCloseOverview {
    fn name(&self) -> &'static str {
        "ClickToCloseOverview"
    }

    fn activate(&mut self) {
        let shell = Rc::downgrade(&self.shell);
        self.signal = Some(self.shell.connect_overview_clicked(Box::new(move |click| {
            if !closes_overview(click) {
                debug!("Ignoring overview click {:?}", click);
                return;
            }
            if let Some(shell) = shell.upgrade() {
                shell.toggle_overview();
            }
        })));
    }

    fn deactivate(&mut self) {
        if let Some(id) = self.signal.take() {
            self.shell.disconnect(id);
        }
    }
}

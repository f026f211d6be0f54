//! Terminal stand-in for the log window.

use std::io::{self, Write};
use std::sync::Arc;

use lamgr_core::{AdapterControl, HostError, WindowHost};

/// Shows the log view by printing the current snapshot to stderr.
pub struct TerminalLogView {
    control: Arc<dyn AdapterControl>,
}

impl TerminalLogView {
    pub fn new(control: Arc<dyn AdapterControl>) -> Self {
        Self { control }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let log = self.control.get_log();
        writeln!(out, "----- adapter log ({} lines) -----", log.len())?;
        for line in &log {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "----- end of adapter log -----")?;
        out.flush()
    }
}

impl WindowHost for TerminalLogView {
    fn show_log_view(&self) -> Result<(), HostError> {
        self.render(&mut io::stderr().lock())
            .map_err(|e| HostError::LogView(e.to_string()))
    }
}

//! GPIO output lines exposed through the Linux sysfs interface.
//!
//! A line is a `value` file under `/sys/class/gpio/gpioN/`; writing `1` or
//! `0` drives the pin. Lamps wired between the pin and the supply light on a
//! low pin, so lines can be declared active-low.

use crate::{HardwareError, Result, traits::OutputLine};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Output line backed by a sysfs GPIO value file.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::line::SysfsLine;
/// use rollcall_hardware::traits::OutputLine;
///
/// let mut positive = SysfsLine::open("/sys/class/gpio/gpio12/value", true).unwrap();
/// positive.set_active(true).unwrap(); // writes "0"
/// ```
#[derive(Debug, Clone)]
pub struct SysfsLine {
    path: PathBuf,
    active_low: bool,
}

impl SysfsLine {
    /// Open a line whose value file must already be exported.
    ///
    /// # Errors
    ///
    /// Returns an initialization error if the value file does not exist.
    pub fn open(path: impl AsRef<Path>, active_low: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(HardwareError::initialization_failed(format!(
                "GPIO value file {} not found (is the pin exported?)",
                path.display()
            )));
        }
        Ok(Self { path, active_low })
    }

    /// Path of the value file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputLine for SysfsLine {
    fn set_active(&mut self, active: bool) -> Result<()> {
        let level = active != self.active_low;
        trace!(line = %self.path.display(), level, "Driving output line");
        std::fs::write(&self.path, if level { "1" } else { "0" })?;
        Ok(())
    }
}

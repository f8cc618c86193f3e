use eyre::{Context, Result};
use log::{info, trace};

/// Something that can show a page to the user.
pub trait Launcher {
    fn launch(&mut self, url: &str) -> Result<()>;
}

/// Opens pages in the system web browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct Browser;

impl Launcher for Browser {
    fn launch(&mut self, url: &str) -> Result<()> {
        webbrowser::open(url).wrap_err_with(|| format!("Cannot open '{url}' in the web browser"))
    }
}

/// A page slot the user can switch on or off.
///
/// The `enabled` gate is read when a page is dispatched, not when the ISBN is entered.
pub struct Window<L: Launcher> {
    name: &'static str,
    launcher: L,
    enabled: bool,
    current: Option<String>,
}

impl<L: Launcher> Window<L> {
    pub const fn new(name: &'static str, launcher: L, enabled: bool) -> Self {
        Self {
            name,
            launcher,
            enabled,
            current: None,
        }
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// The page last opened in this window, if it is still open.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Shows `url` if the window is enabled, returning whether it was shown.
    pub fn open(&mut self, url: &str) -> Result<bool> {
        if !self.enabled {
            trace!("{} window is disabled - not opening {url}", self.name);
            return Ok(false);
        }

        if let Some(previous) = self.current() {
            trace!("{} window is showing {previous} - replacing it", self.name);
        }
        self.launcher.launch(url)?;
        info!("Opened {url} in the {} window", self.name);
        self.current = Some(url.to_owned());
        Ok(true)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.close();
        }
    }

    /// Flips the gate and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn close(&mut self) {
        if let Some(url) = self.current.take() {
            trace!("Closing the {} window showing {url}", self.name);
        }
    }
}

//! Opening the finished PDF with the host's default handler

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Operating system family, which decides the launch mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    MacOS,
    Windows,
    /// Linux, the BSDs and anything else with `xdg-open`
    Unix,
}

impl HostOs {
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        return HostOs::MacOS;

        #[cfg(target_os = "windows")]
        return HostOs::Windows;

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        HostOs::Unix
    }
}

/// Something that can show a file to the user
pub trait Viewer {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Launches the OS default application without waiting for it
#[derive(Debug, Clone, Copy)]
pub struct SystemViewer {
    os: HostOs,
}

impl SystemViewer {
    pub fn new(os: HostOs) -> Self {
        Self { os }
    }

    pub fn for_host() -> Self {
        Self::new(HostOs::detect())
    }

    pub fn command(&self, path: &Path) -> Command {
        match self.os {
            HostOs::MacOS => {
                let mut cmd = Command::new("open");
                cmd.arg(path);
                cmd
            }
            HostOs::Windows => {
                // The empty argument is the window title consumed by `start`
                let mut cmd = Command::new("cmd");
                cmd.args(["/C", "start", ""]).arg(path);
                cmd
            }
            HostOs::Unix => {
                let mut cmd = Command::new("xdg-open");
                cmd.arg(path);
                cmd
            }
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        self.command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

/// Open `path`, logging instead of failing when the viewer cannot start
pub fn preview(viewer: &dyn Viewer, path: &Path) -> bool {
    match viewer.open(path) {
        Ok(()) => {
            log::debug!("opened {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("could not open {}: {}", path.display(), e);
            false
        }
    }
}

use anyhow::{Result, anyhow};
use log::info;
#[cfg(target_os = "linux")]
use {
    anyhow::Context,
    log::warn,
    std::{
        os::unix::process::CommandExt,
        path::{Path, PathBuf},
        process::{Command, Stdio},
    },
};

use crate::ssh::ssh_command_for;

/// Something that accepts plain text, normally the OS clipboard.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

impl ClipboardSink for arboard::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        arboard::Clipboard::set_text(self, text.to_owned())
            .map_err(|e| anyhow!("clipboard set: {}", e))
    }
}

pub fn system_clipboard() -> Result<arboard::Clipboard> {
    arboard::Clipboard::new().map_err(|e| anyhow!("clipboard init: {}", e))
}

/// Format the ssh command for a selected display line and put it on the
/// clipboard. Returns the command that was written.
pub fn copy_command(sink: &mut dyn ClipboardSink, display: &str) -> Result<String> {
    let command = ssh_command_for(display);
    sink.set_text(&command)?;
    info!("copied '{}' to clipboard", command);
    Ok(command)
}

/// Hidden flag that turns the binary into a clipboard owner.
pub const SERVE_FLAG: &str = "--serve-clipboard";

/// Hands the text to a detached copy of this binary, which keeps owning the
/// X11/Wayland selection after we exit.
#[cfg(target_os = "linux")]
pub struct DetachedClipboard {
    exe: PathBuf,
}

#[cfg(target_os = "linux")]
impl DetachedClipboard {
    pub fn new() -> Result<Self> {
        let exe = std::env::current_exe().context("locating own executable")?;
        Ok(Self { exe })
    }
}

#[cfg(target_os = "linux")]
impl ClipboardSink for DetachedClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let child = serve_command(&self.exe, text)
            .spawn()
            .context("spawning clipboard owner")?;
        info!("clipboard owner running as pid {}", child.id());
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn serve_command(exe: &Path, text: &str) -> Command {
    let mut cmd = Command::new(exe);
    cmd.arg(SERVE_FLAG)
        .arg(text)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        // own process group: ^C in the shell must not take the selection down
        .process_group(0);
    cmd
}

/// Copy the command for `display` the way the platform needs. On Linux the
/// selection is served by a detached child; the in-process clipboard is the
/// fallback when the child cannot be started.
pub fn copy_to_system(clipboard: &mut arboard::Clipboard, display: &str) -> Result<String> {
    #[cfg(target_os = "linux")]
    {
        match DetachedClipboard::new().and_then(|mut d| copy_command(&mut d, display)) {
            Ok(command) => return Ok(command),
            Err(e) => warn!("serving clipboard in-process: {:#}", e),
        }
    }
    copy_command(clipboard, display)
}

/// Entry point of the detached child: own the selection until another
/// program replaces it.
#[cfg(target_os = "linux")]
pub fn serve_until_replaced(text: &str) -> Result<()> {
    use arboard::SetExtLinux;

    let mut clipboard = system_clipboard()?;
    clipboard
        .set()
        .wait()
        .text(text.to_owned())
        .map_err(|e| anyhow!("clipboard set: {}", e))?;
    info!("clipboard replaced, owner exiting");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn serve_until_replaced(text: &str) -> Result<()> {
    ClipboardSink::set_text(&mut system_clipboard()?, text)
}

pub fn copied_message(command: &str) -> String {
    format!("'{}' copied to clipboard", command)
}

//! External mount/unmount commands.
//! Success is judged by the process exit status only.

use std::fmt;
use std::io;
use std::process::Command;

use crate::config::ShareSettings;

/// A program plus its arguments, built without going through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for a in &self.args {
            write!(f, " {a}")?;
        }
        Ok(())
    }
}

/// Executes external commands.
pub trait CommandRunner {
    /// `Ok(true)` when the command exited successfully.
    fn run(&self, cmd: &CommandLine) -> io::Result<bool>;
}

/// Runs commands with `std::process::Command`, inheriting stdio so that
/// credential prompts from the mount utility reach the operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine) -> io::Result<bool> {
        Command::new(&cmd.program)
            .args(&cmd.args)
            .status()
            .map(|s| s.success())
    }
}

/// Connect/disconnect capability for one mount.
pub trait Mount {
    /// Command that attaches the share, `None` when nothing has to run.
    fn connect_command(&self) -> Option<CommandLine>;
    /// Command that detaches the share, `None` when nothing has to run.
    fn disconnect_command(&self) -> Option<CommandLine>;
}

const NET_EXE: &str = "C:/Windows/System32/net.exe";

/// `net use <drive> <share>` / `net use /d <drive>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowsShare(pub ShareSettings);

impl Mount for WindowsShare {
    fn connect_command(&self) -> Option<CommandLine> {
        Some(CommandLine::new(NET_EXE, ["use", &self.0.drive, &self.0.share]))
    }

    fn disconnect_command(&self) -> Option<CommandLine> {
        Some(CommandLine::new(NET_EXE, ["use", "/d", &self.0.drive]))
    }
}

/// `mount -t nfs <drive> <share>` / `umount <drive>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfsMount(pub ShareSettings);

impl Mount for NfsMount {
    fn connect_command(&self) -> Option<CommandLine> {
        Some(CommandLine::new("mount", ["-t", "nfs", &self.0.drive, &self.0.share]))
    }

    fn disconnect_command(&self) -> Option<CommandLine> {
        Some(CommandLine::new("umount", [self.0.drive.as_str()]))
    }
}

/// Nothing to mount; both operations succeed trivially.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMount;

impl Mount for NoMount {
    fn connect_command(&self) -> Option<CommandLine> {
        None
    }

    fn disconnect_command(&self) -> Option<CommandLine> {
        None
    }
}

/// Which mount utility family to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountFlavor {
    Windows,
    Nfs,
}

impl MountFlavor {
    /// Flavor matching the host OS.
    pub fn host() -> Self {
        if cfg!(windows) { MountFlavor::Windows } else { MountFlavor::Nfs }
    }

    pub fn mount_for(self, share: Option<&ShareSettings>) -> Box<dyn Mount> {
        match (self, share) {
            (_, None) => Box::new(NoMount),
            (MountFlavor::Windows, Some(s)) => Box::new(WindowsShare(s.clone())),
            (MountFlavor::Nfs, Some(s)) => Box::new(NfsMount(s.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ShareSettings {
        ShareSettings {
            drive: "Z:".into(),
            share: r"\\nas\archive".into(),
        }
    }

    #[test]
    fn windows_commands() {
        let m = WindowsShare(settings());
        assert_eq!(
            m.connect_command().unwrap().to_string(),
            r"C:/Windows/System32/net.exe use Z: \\nas\archive"
        );
        assert_eq!(
            m.disconnect_command().unwrap().to_string(),
            "C:/Windows/System32/net.exe use /d Z:"
        );
    }

    #[test]
    fn nfs_commands() {
        let m = NfsMount(ShareSettings {
            drive: "nas:/export".into(),
            share: "/mnt/archive".into(),
        });
        assert_eq!(
            m.connect_command().unwrap().args,
            vec!["-t", "nfs", "nas:/export", "/mnt/archive"]
        );
        assert_eq!(m.disconnect_command().unwrap().to_string(), "umount nas:/export");
    }

    #[test]
    fn unconfigured_role_gets_no_mount() {
        let m = MountFlavor::Nfs.mount_for(None);
        assert!(m.connect_command().is_none());
        assert!(m.disconnect_command().is_none());
    }
}

//! Share connector: mounts the source and/or target network share around a run.
//!
//! Each role is connectable on its own. When both roles are configured with the
//! same drive and share they collapse into one slot, so a single shared mount is
//! connected once and disconnected once.

mod command;

pub use command::{
    CommandLine, CommandRunner, Mount, MountFlavor, NfsMount, NoMount, SystemRunner, WindowsShare,
};

use std::fmt;
use tracing::{debug, error, info, warn};

use crate::config::{Settings, ShareSettings};
use crate::errors::MoveFilesError;

/// Which side of the move a share belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareRole {
    Source,
    Target,
}

impl ShareRole {
    pub const ALL: [ShareRole; 2] = [ShareRole::Source, ShareRole::Target];
}

impl fmt::Display for ShareRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShareRole::Source => "source",
            ShareRole::Target => "target",
        })
    }
}

struct Slot {
    roles: Vec<ShareRole>,
    mount: Box<dyn Mount>,
    connected: bool,
}

/// Connection state for every configured share role.
pub struct Shares {
    runner: Box<dyn CommandRunner>,
    slots: Vec<Slot>,
}

impl fmt::Debug for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shares")
            .field("slots", &self.slots.iter().map(|s| (&s.roles, s.connected)).collect::<Vec<_>>())
            .finish()
    }
}

impl Shares {
    /// No shares configured; every call is a successful no-op.
    pub fn none() -> Self {
        Self {
            runner: Box::new(SystemRunner),
            slots: Vec::new(),
        }
    }

    /// Shares for `settings` using the host's mount utility.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_runner(settings, MountFlavor::host(), Box::new(SystemRunner))
    }

    pub fn with_runner(
        settings: &Settings,
        flavor: MountFlavor,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let mut seen: Vec<&ShareSettings> = Vec::new();
        let configured = [
            (ShareRole::Source, settings.source_share.as_ref()),
            (ShareRole::Target, settings.target_share.as_ref()),
        ];
        for (role, share) in configured {
            let Some(share) = share else { continue };
            if let Some(idx) = seen.iter().position(|s| *s == share) {
                debug!(%role, drive = %share.drive, "sharing mount with another role");
                slots[idx].roles.push(role);
                continue;
            }
            seen.push(share);
            slots.push(Slot {
                roles: vec![role],
                mount: flavor.mount_for(Some(share)),
                connected: false,
            });
        }
        Self { runner, slots }
    }

    pub fn is_connected(&self, role: ShareRole) -> bool {
        self.slots
            .iter()
            .any(|s| s.connected && s.roles.contains(&role))
    }

    /// Attach the share for `role`. Unconfigured or already connected roles succeed without running anything.
    pub fn connect(&mut self, role: ShareRole) -> Result<(), MoveFilesError> {
        let runner = &self.runner;
        let Some(slot) = self.slots.iter_mut().find(|s| s.roles.contains(&role)) else {
            debug!(%role, "no connection needed");
            return Ok(());
        };
        if slot.connected {
            return Ok(());
        }
        let Some(cmd) = slot.mount.connect_command() else {
            slot.connected = true;
            return Ok(());
        };
        info!(%role, command = %cmd, "Connecting share");
        match runner.run(&cmd) {
            Ok(true) => {
                slot.connected = true;
                Ok(())
            }
            Ok(false) => {
                error!(%role, command = %cmd, "connect command failed");
                Err(MoveFilesError::ConnectFailed {
                    role,
                    detail: format!("'{cmd}' exited with failure"),
                })
            }
            Err(e) => {
                error!(%role, command = %cmd, error = %e, "connect command could not start");
                Err(MoveFilesError::ConnectFailed {
                    role,
                    detail: format!("'{cmd}': {e}"),
                })
            }
        }
    }

    /// Detach the share for `role`. Roles that are not connected succeed without running anything.
    pub fn disconnect(&mut self, role: ShareRole) -> Result<(), MoveFilesError> {
        let runner: &dyn CommandRunner = &*self.runner;
        let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.connected && s.roles.contains(&role))
        else {
            return Ok(());
        };
        let Some(cmd) = slot.mount.disconnect_command() else {
            slot.connected = false;
            return Ok(());
        };
        info!(%role, command = %cmd, "Disconnecting share");
        let detail = match runner.run(&cmd) {
            Ok(true) => {
                slot.connected = false;
                return Ok(());
            }
            Ok(false) => format!("'{cmd}' exited with failure"),
            Err(e) => format!("'{cmd}': {e}"),
        };
        warn!(%role, %detail, "disconnect failed; disconnect it manually");
        Err(MoveFilesError::DisconnectFailed { role, detail })
    }

    /// Connect every configured role, source first. On failure, roles connected
    /// so far are disconnected again before the error is returned.
    pub fn connect_all(&mut self) -> Result<(), MoveFilesError> {
        for role in ShareRole::ALL {
            if let Err(e) = self.connect(role) {
                let _ = self.disconnect_all();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Disconnect every connected role; failures are returned as warnings, never fatal.
    pub fn disconnect_all(&mut self) -> Vec<MoveFilesError> {
        let connected: Vec<ShareRole> = self
            .slots
            .iter()
            .filter(|s| s.connected)
            .map(|s| s.roles[0])
            .collect();
        connected
            .into_iter()
            .filter_map(|role| self.disconnect(role).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
        fail_program: Option<&'static str>,
    }

    impl CommandRunner for Recorder {
        fn run(&self, cmd: &CommandLine) -> io::Result<bool> {
            self.calls.borrow_mut().push(cmd.to_string());
            Ok(self.fail_program != Some(cmd.program.as_str()))
        }
    }

    fn share(drive: &str) -> Option<ShareSettings> {
        Some(ShareSettings {
            drive: drive.into(),
            share: "/mnt/x".into(),
        })
    }

    #[test]
    fn roles_connect_and_disconnect_independently() {
        let rec = Recorder::default();
        let settings = Settings {
            source_share: share("a:/src"),
            target_share: share("b:/trg"),
            ..Settings::new("/s", "/t")
        };
        let mut shares = Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(rec.clone()));
        shares.connect_all().unwrap();
        assert!(shares.is_connected(ShareRole::Source) && shares.is_connected(ShareRole::Target));
        assert!(shares.disconnect_all().is_empty());
        assert_eq!(
            *rec.calls.borrow(),
            vec![
                "mount -t nfs a:/src /mnt/x",
                "mount -t nfs b:/trg /mnt/x",
                "umount a:/src",
                "umount b:/trg",
            ]
        );
    }

    #[test]
    fn identical_shares_collapse_into_one_mount() {
        let rec = Recorder::default();
        let settings = Settings {
            source_share: share("a:/both"),
            target_share: share("a:/both"),
            ..Settings::new("/s", "/t")
        };
        let mut shares = Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(rec.clone()));
        shares.connect_all().unwrap();
        shares.disconnect_all();
        assert_eq!(*rec.calls.borrow(), vec!["mount -t nfs a:/both /mnt/x", "umount a:/both"]);
    }

    #[test]
    fn unconfigured_roles_are_noops() {
        let rec = Recorder::default();
        let mut shares =
            Shares::with_runner(&Settings::new("/s", "/t"), MountFlavor::Windows, Box::new(rec.clone()));
        assert!(shares.connect(ShareRole::Source).is_ok());
        assert!(shares.disconnect(ShareRole::Target).is_ok());
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn failed_connect_rolls_back_earlier_roles() {
        let rec = Recorder::default();
        let settings = Settings {
            source_share: share("a:/src"),
            target_share: share("b:/trg"),
            ..Settings::new("/s", "/t")
        };
        struct FailSecond(Recorder);
        impl CommandRunner for FailSecond {
            fn run(&self, cmd: &CommandLine) -> io::Result<bool> {
                let ok = self.0.run(cmd)?;
                Ok(ok && !cmd.to_string().contains("b:/trg"))
            }
        }
        let mut shares =
            Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(FailSecond(rec.clone())));
        let err = shares.connect_all().unwrap_err();
        assert!(matches!(err, MoveFilesError::ConnectFailed { role: ShareRole::Target, .. }));
        assert!(!shares.is_connected(ShareRole::Source));
        assert_eq!(rec.calls.borrow().last().map(String::as_str), Some("umount a:/src"));
    }

    #[test]
    fn disconnect_failure_is_reported_and_role_stays_connected() {
        let rec = Recorder {
            fail_program: Some("umount"),
            ..Recorder::default()
        };
        let settings = Settings {
            target_share: share("b:/trg"),
            ..Settings::new("/s", "/t")
        };
        let mut shares = Shares::with_runner(&settings, MountFlavor::Nfs, Box::new(rec));
        shares.connect(ShareRole::Target).unwrap();
        let failures = shares.disconnect_all();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("disconnect it manually"));
        assert!(shares.is_connected(ShareRole::Target));
    }
}

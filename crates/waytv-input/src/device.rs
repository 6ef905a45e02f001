//! Input device discovery and exclusive access
//!
//! Devices are evdev nodes (`/dev/input/event*`). Each one is grabbed with
//! `EVIOCGRAB` so keypad presses do not also reach the desktop. A refused
//! grab is not fatal: the device is polled anyway, sharing its events.
//!
//! Descriptors are non-blocking so a ready device can be drained until the
//! kernel has nothing more to give.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::InputError;
use crate::event::{RawInputEvent, EVENT_SIZE};

/// Default directory scanned for device nodes
pub const DEFAULT_INPUT_DIR: &str = "/dev/input";

/// `_IOW('E', 0x90, int)`
const EVIOCGRAB: libc::c_ulong = 0x4004_4590;

/// List `event*` nodes in `dir`, ordered by event number
pub fn discover_devices(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let entries = fs::read_dir(dir).map_err(|e| InputError::EnumerationFailed {
        dir: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut devices: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("event"))
        })
        .collect();
    devices.sort_by_key(|path| (event_number(path), path.clone()));

    info!("Found {} input device(s) in {}", devices.len(), dir.display());
    Ok(devices)
}

fn event_number(path: &Path) -> u32 {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("event"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// What one read from a device produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete record
    Event(RawInputEvent),
    /// Fewer bytes than a record
    Incomplete(usize),
    /// Nothing buffered right now
    Pending,
    /// End of input: the device went away
    Closed,
}

/// An open, possibly grabbed, input device
#[derive(Debug)]
pub struct InputDevice {
    path: PathBuf,
    file: File,
    grabbed: bool,
}

impl InputDevice {
    /// Open a device node and try to grab it
    ///
    /// Tries read-only first, then read-write.
    pub fn open(path: &Path) -> Result<Self, InputError> {
        let open = |write: bool| {
            OpenOptions::new()
                .read(true)
                .write(write)
                .custom_flags(libc::O_NONBLOCK)
                .open(path)
        };
        let file = open(false)
            .or_else(|_| open(true))
            .map_err(|e| InputError::OpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_file(path, file))
    }

    /// Wrap an already open descriptor and try to grab it
    pub fn from_file(path: impl Into<PathBuf>, file: File) -> Self {
        let path = path.into();
        let grabbed = match set_grab(file.as_raw_fd(), true) {
            Ok(()) => {
                info!("Grabbed {}", path.display());
                true
            }
            Err(e) => {
                let err = InputError::DeviceGrabFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                };
                warn!("{}; polling without exclusive access", err);
                false
            }
        };
        Self::from_file_with_grab(path, file, grabbed)
    }

    /// Wrap a descriptor whose grab outcome is already settled
    ///
    /// No `EVIOCGRAB` is issued; `grabbed` decides whether the grab is
    /// released on drop.
    pub fn from_file_with_grab(path: impl Into<PathBuf>, file: File, grabbed: bool) -> Self {
        let path = path.into();
        if let Err(e) = set_nonblocking(file.as_raw_fd()) {
            warn!("Cannot make {} non-blocking: {}", path.display(), e);
        }
        Self {
            path,
            file,
            grabbed,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the device is held exclusively
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Read at most one record
    pub fn read_event(&mut self) -> io::Result<ReadOutcome> {
        let mut buf = [0u8; EVENT_SIZE];
        loop {
            return match self.file.read(&mut buf) {
                Ok(0) => Ok(ReadOutcome::Closed),
                Ok(n) => Ok(RawInputEvent::from_bytes(&buf[..n])
                    .map_or(ReadOutcome::Incomplete(n), ReadOutcome::Event)),
                Err(e) if e.raw_os_error() == Some(libc::ENODEV) => Ok(ReadOutcome::Closed),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(ReadOutcome::Pending),
                Err(e) => Err(e),
            };
        }
    }
}

impl AsRawFd for InputDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl Drop for InputDevice {
    fn drop(&mut self) {
        if !self.grabbed {
            return;
        }
        match set_grab(self.file.as_raw_fd(), false) {
            Ok(()) => debug!("Released {}", self.path.display()),
            Err(e) => warn!("Failed to release {}: {}", self.path.display(), e),
        }
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: F_GETFL/F_SETFL only touch the flags of an open descriptor
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn set_grab(fd: RawFd, grab: bool) -> io::Result<()> {
    let arg: libc::c_int = grab.into();
    // SAFETY: EVIOCGRAB takes an int by value and `fd` is owned by a live File
    let ret = unsafe { libc::ioctl(fd, EVIOCGRAB as _, arg) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_number_ordering() {
        assert_eq!(event_number(Path::new("/dev/input/event12")), 12);
        assert_eq!(event_number(Path::new("/dev/input/event")), u32::MAX);
        assert_eq!(event_number(Path::new("/dev/input/eventX")), u32::MAX);
    }

    #[test]
    fn test_open_missing_node() {
        let err = InputDevice::open(Path::new("/nonexistent/event0")).unwrap_err();
        assert!(matches!(err, InputError::OpenFailed { .. }));
    }

    #[test]
    fn test_regular_file_is_not_grabbed() {
        // Anything that is not an evdev node refuses EVIOCGRAB
        let device = InputDevice::open(Path::new("/proc/self/status")).unwrap();
        assert!(!device.is_grabbed());
    }

    #[test]
    fn test_settled_grab_is_recorded_without_ioctl() {
        let file = File::open("/proc/self/status").unwrap();
        let device = InputDevice::from_file_with_grab("fake/event0", file, false);
        assert!(!device.is_grabbed());
        assert_eq!(device.path(), Path::new("fake/event0"));
    }

    #[test]
    fn test_empty_socket_reads_pending() {
        use std::os::fd::OwnedFd;
        use std::os::unix::net::UnixStream;

        let (ours, _theirs) = UnixStream::pair().unwrap();
        let mut device = InputDevice::from_file("fake/event0", File::from(OwnedFd::from(ours)));
        assert_eq!(device.read_event().unwrap(), ReadOutcome::Pending);
    }
}

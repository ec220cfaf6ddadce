// OS abstraction seams for the drain path.
// Thin libc wrappers translating return codes into io::Result.

use std::fmt::Debug;
use std::io;
use std::os::fd::RawFd;

/// Write-side syscalls used by the non-blocking writer.
pub trait Unistd: Send + Debug {
    /// Issue a single `write(2)` on `fd`.
    ///
    /// # Returns
    /// Number of bytes accepted by the kernel, which may be less than `buf.len()`.
    fn write(&self, fd: RawFd, buf: &[u8]) -> io::Result<usize>;
}

/// File-control syscalls used when a backend takes over a descriptor.
pub trait Fcntl: Send + Debug {
    /// `fcntl(fd, F_GETFL)`
    fn get_status_flags(&self, fd: RawFd) -> io::Result<libc::c_int>;

    /// `fcntl(fd, F_SETFL, flags)`
    fn set_status_flags(&self, fd: RawFd, flags: libc::c_int) -> io::Result<()>;

    /// `fcntl(fd, F_GETFD)`
    fn get_descriptor_flags(&self, fd: RawFd) -> io::Result<libc::c_int>;

    /// `fcntl(fd, F_SETFD, flags)`
    fn set_descriptor_flags(&self, fd: RawFd, flags: libc::c_int) -> io::Result<()>;
}

/// Production [`Unistd`] backed by libc.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcUnistd;

impl Unistd for LibcUnistd {
    fn write(&self, fd: RawFd, buf: &[u8]) -> io::Result<usize> {
        let written = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if written < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(written as usize)
    }
}

/// Production [`Fcntl`] backed by libc.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcFcntl;

impl LibcFcntl {
    fn check(ret: libc::c_int) -> io::Result<libc::c_int> {
        if ret == -1 {
            Err(io::Error::last_os_error())
        } else {
            Ok(ret)
        }
    }
}

impl Fcntl for LibcFcntl {
    fn get_status_flags(&self, fd: RawFd) -> io::Result<libc::c_int> {
        Self::check(unsafe { libc::fcntl(fd, libc::F_GETFL) })
    }

    fn set_status_flags(&self, fd: RawFd, flags: libc::c_int) -> io::Result<()> {
        Self::check(unsafe { libc::fcntl(fd, libc::F_SETFL, flags) }).map(|_| ())
    }

    fn get_descriptor_flags(&self, fd: RawFd) -> io::Result<libc::c_int> {
        Self::check(unsafe { libc::fcntl(fd, libc::F_GETFD) })
    }

    fn set_descriptor_flags(&self, fd: RawFd, flags: libc::c_int) -> io::Result<()> {
        Self::check(unsafe { libc::fcntl(fd, libc::F_SETFD, flags) }).map(|_| ())
    }
}

/// Switch `fd` to non-blocking mode and mark it close-on-exec.
///
/// Best effort: if a flag query fails, the matching update is skipped.
pub fn setup_non_blocking_file(fcntl: &dyn Fcntl, fd: RawFd) {
    match fcntl.get_status_flags(fd) {
        Ok(flags) => {
            if let Err(e) = fcntl.set_status_flags(fd, flags | libc::O_NONBLOCK) {
                tracing::warn!(fd, error = %e, "failed to set O_NONBLOCK");
            }
        }
        Err(e) => tracing::warn!(fd, error = %e, "status flag query failed, leaving descriptor blocking"),
    }

    match fcntl.get_descriptor_flags(fd) {
        Ok(flags) => {
            if let Err(e) = fcntl.set_descriptor_flags(fd, flags | libc::FD_CLOEXEC) {
                tracing::warn!(fd, error = %e, "failed to set FD_CLOEXEC");
            }
        }
        Err(e) => tracing::warn!(fd, error = %e, "descriptor flag query failed, skipping FD_CLOEXEC"),
    }
}

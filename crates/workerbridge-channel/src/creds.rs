//! Peer credentials for connected bridge streams.

use std::os::fd::AsRawFd;

/// Get the credentials of the connected peer (Linux only).
///
/// Returns `(uid, gid, pid)` via `SO_PEERCRED`, or `None` if unavailable.
#[cfg(target_os = "linux")]
pub fn peer_credentials(stream: &impl AsRawFd) -> Option<(u32, u32, u32)> {
    let fd = stream.as_raw_fd();

    let mut cred = libc::ucred {
        pid: 0,
        uid: 0,
        gid: 0,
    };
    let mut len = std::mem::size_of::<libc::ucred>() as libc::socklen_t;

    // SAFETY: `cred` and `len` are valid writable pointers for the provided sizes,
    // and `fd` is an open Unix socket descriptor owned by this process.
    let rc = unsafe {
        libc::getsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_PEERCRED,
            (&mut cred as *mut libc::ucred).cast::<libc::c_void>(),
            &mut len,
        )
    };

    if rc == 0 && len as usize == std::mem::size_of::<libc::ucred>() {
        Some((cred.uid, cred.gid, cred.pid as u32))
    } else {
        None
    }
}

/// Get the credentials of the connected peer.
///
/// Returns `None` on platforms that do not expose peer credentials.
#[cfg(not(target_os = "linux"))]
pub fn peer_credentials(stream: &impl AsRawFd) -> Option<(u32, u32, u32)> {
    let _ = stream;
    None
}

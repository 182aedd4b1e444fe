//! The external relay process.
//!
//! The relay is an opaque program that bridges a loopback TCP socket to
//! the real server transport. It is started with three positional
//! arguments: `<server address> <server port> <local port>`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use crate::TransportError;

/// Returns the first path in `search_paths` that names an existing file.
///
/// # Errors
/// [`TransportError::RelayNotFound`] listing every path that was checked.
pub fn locate_relay(search_paths: &[PathBuf]) -> Result<PathBuf, TransportError> {
    for path in search_paths {
        if path.is_file() {
            let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            tracing::debug!(path = %resolved.display(), "relay binary located");
            return Ok(resolved);
        }
    }
    Err(TransportError::RelayNotFound {
        searched: search_paths.to_vec(),
    })
}

/// A running relay child process.
///
/// The child is killed when this handle is dropped, so a session that goes
/// away without an explicit [`kill`](Self::kill) never leaks the relay.
#[derive(Debug)]
pub struct RelayProcess {
    child: Child,
    path: PathBuf,
}

impl RelayProcess {
    /// Starts the relay binary at `binary`.
    ///
    /// The working directory is the binary's own directory, matching how
    /// the relay expects to find its sidecar files.
    pub fn spawn(
        binary: &Path,
        server_address: &str,
        server_port: u16,
        local_port: u16,
    ) -> Result<Self, TransportError> {
        let mut cmd = Command::new(binary);
        cmd.arg(server_address)
            .arg(server_port.to_string())
            .arg(local_port.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = binary.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|source| TransportError::RelaySpawn {
            path: binary.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %binary.display(),
            pid = ?child.id(),
            server_address,
            server_port,
            local_port,
            "relay started"
        );

        Ok(Self {
            child,
            path: binary.to_path_buf(),
        })
    }

    /// Checks, without blocking, whether the relay has already exited.
    pub fn exit_status(&mut self) -> Result<Option<ExitStatus>, TransportError> {
        self.child
            .try_wait()
            .map_err(|e| TransportError::RelayExited(e.to_string()))
    }

    /// Requests termination of the relay. Safe to call more than once.
    pub fn kill(&mut self) {
        match self.child.start_kill() {
            Ok(()) => tracing::info!(path = %self.path.display(), "relay stopped"),
            // Already reaped: nothing left to stop.
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => tracing::warn!(error = %e, "failed to stop relay"),
        }
    }

    /// OS process id, if the child is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Path the relay was started from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_relay_reports_every_searched_path() {
        let paths = vec![
            PathBuf::from("/definitely/not/here/relay"),
            PathBuf::from("/nor/here/relay"),
        ];
        match locate_relay(&paths) {
            Err(TransportError::RelayNotFound { searched }) => assert_eq!(searched, paths),
            other => panic!("expected RelayNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_locate_relay_picks_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("relay-b");
        std::fs::write(&second, b"").unwrap();
        let paths = vec![dir.path().join("relay-a"), second.clone()];

        let found = locate_relay(&paths).unwrap();
        assert_eq!(found.file_name(), second.file_name());
    }

    #[test]
    fn test_locate_relay_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![dir.path().to_path_buf()];
        assert!(locate_relay(&paths).is_err());
    }
}

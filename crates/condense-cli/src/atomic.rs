use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Replace `path` with `contents` via a hidden sibling file and a rename.
///
/// With `owner_only` set, the file is restricted to mode 0600 before it
/// becomes visible under `path`.
pub fn write_atomic(path: &Path, contents: &[u8], owner_only: bool) -> io::Result<()> {
    let staging = staging_path(path)?;
    fs::write(&staging, contents)?;
    if owner_only {
        restrict_to_owner(&staging)?;
    }
    fs::rename(&staging, path)
}

/// True when group or other users have any access to `path`. Always false off unix.
pub fn readable_by_others(path: &Path) -> io::Result<bool> {
    #[cfg(unix)]
    {
        let mode = fs::metadata(path)?.permissions().mode();
        Ok(mode & 0o077 != 0)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(false)
    }
}

fn staging_path(path: &Path) -> io::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{} has no file name", path.display())))?;
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok(dir.join(format!(".{}.tmp", name.to_string_lossy())))
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}

//! Capability-scoped file helpers for key material and object bodies.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::error::{InfraError, InfraResult};

/// Permission bits applied to private key files.
pub const PRIVATE_KEY_MODE: u32 = 0o400;

fn split(path: &Utf8Path) -> InfraResult<(&Utf8Path, &str)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| InfraError::Io {
        path: path.to_string(),
        message: String::from("path is missing a filename"),
    })?;
    Ok((parent, file_name))
}

fn open_parent(parent: &Utf8Path, create: bool) -> InfraResult<Dir> {
    if create {
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| InfraError::io(parent.as_str(), &err))?;
    }
    Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| InfraError::io(parent.as_str(), &err))
}

/// Reads a whole file.
///
/// # Errors
///
/// Returns [`InfraError::NotFound`] when the file does not exist and
/// [`InfraError::Io`] for any other failure.
pub fn read(path: &Utf8Path) -> InfraResult<Vec<u8>> {
    let (parent, file_name) = split(path)?;
    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(InfraError::not_found(format!("file {path}")));
        }
        Err(err) => return Err(InfraError::io(parent.as_str(), &err)),
    };
    dir.read(file_name).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            InfraError::not_found(format!("file {path}"))
        } else {
            InfraError::io(path.as_str(), &err)
        }
    })
}

/// Writes `contents`, creating missing parent directories.
///
/// # Errors
///
/// Returns [`InfraError::Io`] when a directory or the file cannot be written.
pub fn write_creating_parents(path: &Utf8Path, contents: &[u8]) -> InfraResult<()> {
    let (parent, file_name) = split(path)?;
    let dir = open_parent(parent, true)?;
    dir.write(file_name, contents)
        .map_err(|err| InfraError::io(path.as_str(), &err))
}

/// Replaces any file at `path` with `contents` readable by the owner only.
///
/// # Errors
///
/// Returns [`InfraError::Io`] when the old file cannot be removed or the new
/// one cannot be written.
pub fn write_private(path: &Utf8Path, contents: &[u8]) -> InfraResult<Utf8PathBuf> {
    let (parent, file_name) = split(path)?;
    let dir = open_parent(parent, true)?;
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(InfraError::io(path.as_str(), &err)),
    }
    dir.write(file_name, contents)
        .map_err(|err| InfraError::io(path.as_str(), &err))?;
    restrict(&dir, file_name).map_err(|err| InfraError::io(path.as_str(), &err))?;
    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn restrict(dir: &Dir, file_name: &str) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions =
        cap_std::fs::Permissions::from_std(std::fs::Permissions::from_mode(PRIVATE_KEY_MODE));
    dir.set_permissions(file_name, permissions)
}

#[cfg(not(unix))]
fn restrict(dir: &Dir, file_name: &str) -> io::Result<()> {
    let mut permissions = dir.metadata(file_name)?.permissions();
    permissions.set_readonly(true);
    dir.set_permissions(file_name, permissions)
}

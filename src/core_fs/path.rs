use crate::core_network::error::FtpError;
use log::warn;
use std::io::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Joins a client-supplied relative name onto `root`, refusing anything that is
/// not a plain relative path.
fn join_relative(root: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains('\0') {
        return None;
    }

    let mut path = root.to_path_buf();
    let mut has_name = false;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                has_name = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    has_name.then_some(path)
}

/// Resolves an existing regular file under the canonical `root` for reading.
///
/// Missing files, directories and names that leave the root all come back as
/// `FileNotFound`.
pub async fn resolve_existing(root: &Path, name: &str) -> Result<PathBuf, FtpError> {
    let not_found = || FtpError::FileNotFound(name.to_string());

    let joined = join_relative(root, name).ok_or_else(|| {
        warn!("Refusing file name outside the server root: {:?}", name);
        not_found()
    })?;

    let resolved = fs::canonicalize(&joined).await.map_err(|_| not_found())?;
    if !resolved.starts_with(root) {
        warn!("Path is outside of the allowed area: {:?}", resolved);
        return Err(not_found());
    }

    match fs::metadata(&resolved).await {
        Ok(meta) if meta.is_file() => Ok(resolved),
        _ => Err(not_found()),
    }
}

/// Resolves the destination of an upload under the canonical `root`.
///
/// The parent directory must exist inside the root. An existing entry at the
/// target (a symlink for instance) must also resolve inside the root.
pub async fn resolve_for_create(root: &Path, name: &str) -> Result<PathBuf, FtpError> {
    let outside = || {
        warn!("Refusing upload outside the server root: {:?}", name);
        FtpError::FileCreateFailure(
            name.to_string(),
            Error::new(ErrorKind::PermissionDenied, "path escapes the server root"),
        )
    };

    let joined = join_relative(root, name).ok_or_else(outside)?;
    let (parent, file_name) = match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(file_name)) => (parent, file_name),
        _ => return Err(outside()),
    };

    let parent = fs::canonicalize(parent)
        .await
        .map_err(|e| FtpError::FileCreateFailure(name.to_string(), e))?;
    if !parent.starts_with(root) {
        return Err(outside());
    }

    let target = parent.join(file_name);
    if fs::symlink_metadata(&target).await.is_ok() {
        match fs::canonicalize(&target).await {
            Ok(existing) if existing.starts_with(root) => Ok(existing),
            Ok(_) => Err(outside()),
            // Dangling symlink: creating through it would land anywhere.
            Err(_) => Err(outside()),
        }
    } else {
        Ok(target)
    }
}

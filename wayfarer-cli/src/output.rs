//! JSON output to the terminal or to a file.
//!
//! Files are written through `cap-std` directory handles opened with
//! ambient authority.

use std::io::{self, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::info;
use serde::Serialize;

use crate::CliError;

/// Serialise `value` as pretty JSON into `path`, or `writer` when no path is
/// given.
pub(crate) fn emit_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    path: Option<&Utf8Path>,
    value: &T,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    payload.push('\n');
    match path {
        Some(target) => {
            write_file(target, payload.as_bytes()).map_err(|source| CliError::WriteOutputFile {
                path: target.to_path_buf(),
                source,
            })?;
            info!("wrote {} bytes to {target}", payload.len());
            Ok(())
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}

/// Create or replace the file at `path`, creating missing parent directories.
pub(crate) fn write_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, file_name) = open_dir_and_file(path)?;
    dir.write(file_name.as_str(), contents)
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("output path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    let base_dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    base_dir.create_dir_all(&relative)
}

/// Split `parent` into an ambient base directory and a relative suffix.
fn split_base(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    match parent.as_std_path().components().next() {
        Some(Component::RootDir) => {
            let relative = parent
                .strip_prefix("/")
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?;
            Ok((Utf8PathBuf::from("/"), relative.to_path_buf()))
        }
        Some(Component::Prefix(_)) => {
            let mut components = parent.components();
            let prefix = components
                .next()
                .ok_or_else(|| io::Error::other("missing path prefix"))?;
            let mut base = Utf8PathBuf::from(prefix.as_str());
            if let Some(root) = components.clone().next()
                && root.as_str() == std::path::MAIN_SEPARATOR_STR
            {
                base.push(root.as_str());
                components.next();
            }
            Ok((base, components.as_path().to_path_buf()))
        }
        _ => Ok((Utf8PathBuf::from("."), parent.to_path_buf())),
    }
}

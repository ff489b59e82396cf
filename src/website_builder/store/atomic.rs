use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;
use uuid::Uuid;

/// Replace `path` with `contents` via a sibling temp file and a rename.
///
/// Readers see either the old file or the new one, never a prefix.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let tmp_path = dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));

    if let Err(e) = fs::write(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

/// Copy bytes, permissions and access/modification times from `src` to `dst`.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;

    let meta = fs::metadata(src)?;
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // Read-only sources produce read-only copies; unix can still set times
    // through a read handle
    let handle = File::options()
        .write(true)
        .open(dst)
        .or_else(|_| File::open(dst))?;
    handle.set_times(times)?;
    Ok(())
}

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Copy contents and permissions, then carry over access and modification times.
///
/// No temp-file staging: an interrupted copy can leave a partial file at `dest`.
pub fn copy_with_times(src: &Path, dest: &Path) -> io::Result<u64> {
    let bytes = fs::copy(src, dest)?;
    let meta = fs::metadata(src)?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dest, atime, mtime)?;
    Ok(bytes)
}

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Read buffer size for content hashing
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hash a file's content as hex-encoded BLAKE3, streaming in fixed-size reads
pub fn content_hash(path: &Path) -> io::Result<String> {
	let mut file = fs::File::open(path)?;
	let mut hasher = blake3::Hasher::new();
	let mut buf = vec![0u8; HASH_BUFFER_SIZE];
	loop {
		let n = match file.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		};
		hasher.update(&buf[..n]);
	}
	Ok(hex::encode(hasher.finalize().as_bytes()))
}

/// Modification time in nanoseconds since the Unix epoch (0 for pre-epoch times)
pub fn mtime_ns(meta: &fs::Metadata) -> io::Result<u64> {
	let modified = meta.modified()?;
	Ok(modified.duration_since(UNIX_EPOCH).map(|d| d.as_nanos() as u64).unwrap_or(0))
}

/// Current Unix time in seconds
pub fn now_secs() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Final path component as an owned string, lossily converted
pub fn file_name_of(path: &Path) -> Option<String> {
	path.file_name().map(|n| n.to_string_lossy().into_owned())
}


// vim: ts=4

//! Download of remote packs.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::progress::ProgressSink;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const CHUNK_SIZE: usize = 64 * 1024;

/// Downloads `url` to `destination`, overwriting it if present.
///
/// The body is streamed into a temporary file next to `destination` and moved
/// into place only after the last byte arrived, so a failed download never
/// leaves a truncated archive behind. Returns the number of bytes written.
pub fn download_file(url: &str, destination: &Path, progress: &dyn ProgressSink) -> Result<u64> {
    let download_err = |source| InstallError::Download { url: url.to_string(), source };

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        // Packs can be large; only the connect phase is bounded.
        .timeout(None)
        .build()
        .map_err(download_err)?;

    info!(url, "downloading pack");
    let mut response = client.get(url).send().map_err(download_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::HttpStatus { url: url.to_string(), status: status.as_u16() });
    }

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| InstallError::write(dir, e))?;
    let tmp_path = tmp.path().to_path_buf();

    progress.start(response.content_length());
    let copied = copy_body(&mut response, tmp.as_file_mut(), url, &tmp_path, progress);
    progress.finish();
    let written = copied?;

    tmp.as_file_mut()
        .flush()
        .map_err(|e| InstallError::write(destination, e))?;
    tmp.persist(destination)
        .map_err(|e| InstallError::write(destination, e.error))?;

    debug!(bytes = written, path = %destination.display(), "download complete");
    Ok(written)
}

fn copy_body<R: Read, W: Write>(
    body: &mut R,
    out: &mut W,
    url: &str,
    out_path: &Path,
    progress: &dyn ProgressSink,
) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(InstallError::io(url, e)),
        };
        out.write_all(&buf[..n]).map_err(|e| InstallError::write(out_path, e))?;
        total += n as u64;
        progress.advance(n as u64);
    }
}

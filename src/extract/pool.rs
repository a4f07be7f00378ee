//! Fixed-size writer pool for the materialization phase.
//!
//! Tasks travel over a bounded `crossbeam` channel that is closed once the
//! producer has queued everything; each worker drains it and exits. Every
//! worker owns its own archive handle, so no entry stream is ever shared. The
//! only state shared between workers is the pair of atomic counters and the
//! progress sink.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, warn};
use zip::ZipArchive;

use super::{open_archive, ExtractionTask};
use crate::error::{InstallError, Result};
use crate::progress::ProgressSink;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// What the pool reports back once every worker has finished.
pub(super) struct PoolOutcome {
    pub files_written: usize,
    pub bytes_written: u64,
    /// Per-task failures in completion order.
    pub errors: Vec<InstallError>,
}

/// Runs `tasks` on `workers` threads and blocks until all of them are done.
/// A failing task never stops the others.
pub(super) fn run(
    archive_path: &Path,
    tasks: Vec<ExtractionTask>,
    workers: usize,
    progress: &dyn ProgressSink,
) -> PoolOutcome {
    let files_written = AtomicUsize::new(0);
    let bytes_written = AtomicU64::new(0);
    let (error_sender, error_receiver) = unbounded::<InstallError>();

    let workers = workers.min(tasks.len()).max(1);
    debug!(workers, tasks = tasks.len(), "spawning extraction workers");

    thread::scope(|s| {
        let (task_sender, task_receiver) = bounded::<ExtractionTask>(workers);

        for _ in 0..workers {
            let task_receiver = task_receiver.clone();
            let error_sender = error_sender.clone();
            let files_written = &files_written;
            let bytes_written = &bytes_written;
            s.spawn(move || {
                worker_loop(archive_path, task_receiver, error_sender, files_written, bytes_written, progress)
            });
        }
        drop(task_receiver);

        for task in tasks {
            // Only fails when every worker is gone, which cannot happen while
            // tasks remain because workers never exit early.
            if task_sender.send(task).is_err() {
                break;
            }
        }
        // Closing the channel lets workers exit once the queue is drained.
        drop(task_sender);
    });
    drop(error_sender);

    PoolOutcome {
        files_written: files_written.into_inner(),
        bytes_written: bytes_written.into_inner(),
        errors: error_receiver.try_iter().collect(),
    }
}

fn worker_loop(
    archive_path: &Path,
    tasks: Receiver<ExtractionTask>,
    errors: Sender<InstallError>,
    files_written: &AtomicUsize,
    bytes_written: &AtomicU64,
    progress: &dyn ProgressSink,
) {
    // Opened on first use. An open failure is reported against the task that
    // needed it and retried for the next one.
    let mut archive: Option<ZipArchive<BufReader<File>>> = None;

    for task in tasks {
        let result = match archive.as_mut() {
            Some(archive) => materialize(archive, &task),
            None => open_archive(archive_path).and_then(|opened| materialize(archive.insert(opened), &task)),
        };
        match result {
            Ok(written) => {
                files_written.fetch_add(1, Ordering::Relaxed);
                bytes_written.fetch_add(written, Ordering::Relaxed);
                progress.advance(written);
            }
            Err(e) => {
                warn!(entry = %task.entry, error = %e, "failed to extract entry");
                // The receiver outlives the scope, so this cannot fail.
                let _ = errors.send(e);
            }
        }
    }
}

/// Writes one task through the worker's own archive handle.
fn materialize(archive: &mut ZipArchive<BufReader<File>>, task: &ExtractionTask) -> Result<u64> {
    let mut entry = archive
        .by_index(task.index)
        .map_err(|e| InstallError::read(&task.entry, e.into()))?;

    let file = File::create(&task.destination).map_err(|e| InstallError::write(&task.destination, e))?;
    let mut out = BufWriter::new(file);
    let written = copy_entry(&mut entry, &mut out, task)?;
    out.flush().map_err(|e| InstallError::write(&task.destination, e))?;

    debug!(entry = %task.entry, bytes = written, "extracted");
    Ok(written)
}

/// `io::copy` without merging read and write failures, so each side maps to
/// its own error kind.
fn copy_entry<R: Read, W: Write>(reader: &mut R, writer: &mut W, task: &ExtractionTask) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(InstallError::read(&task.entry, e)),
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| InstallError::write(&task.destination, e))?;
        total += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"))
        }
    }

    fn task() -> ExtractionTask {
        ExtractionTask {
            index: 0,
            entry: "modpack/mods/a.jar".into(),
            destination: PathBuf::from("/out/mods/a.jar"),
            size: 0,
        }
    }

    #[test]
    fn copy_counts_bytes() {
        let mut out = Vec::new();
        let data = vec![7u8; COPY_BUFFER_SIZE * 2 + 5];
        let n = copy_entry(&mut Cursor::new(&data), &mut out, &task()).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn read_failure_is_an_entry_error() {
        let err = copy_entry(&mut FailingReader, &mut Vec::new(), &task()).unwrap_err();
        assert!(matches!(err, InstallError::EntryRead { ref entry, .. } if entry == "modpack/mods/a.jar"));
    }

    #[test]
    fn missing_archive_fails_every_task_without_hanging() {
        let tasks: Vec<_> = (0..6)
            .map(|i| ExtractionTask { index: i, ..task() })
            .collect();
        let outcome = run(Path::new("/nonexistent/pack.zip"), tasks, 4, &crate::progress::NoProgress);
        assert_eq!(outcome.files_written, 0);
        assert_eq!(outcome.errors.len(), 6);
        assert!(outcome.errors.iter().all(|e| matches!(e, InstallError::ArchiveOpen { .. })));
    }
}

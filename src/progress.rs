//! Progress reporting for downloads and extraction.
//!
//! Producers only ever hand over incremental byte counts. A sink decides what to
//! do with them: count them ([`ByteCounter`]), draw a bar ([`BarProgress`]), or
//! drop them ([`NoProgress`]). Sinks are shared by all extraction workers, so
//! they must be `Send + Sync` and must not lose concurrent updates.

use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

/// Receiver of incremental byte counts.
pub trait ProgressSink: Send + Sync {
    /// Announces the expected total. `None` when unknown (e.g. chunked HTTP).
    fn start(&self, _total: Option<u64>) {}

    /// Adds `bytes` to the amount processed so far.
    fn advance(&self, bytes: u64);

    /// Called once the operation is over, successful or not.
    fn finish(&self) {}
}

/// Discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self, _bytes: u64) {}
}

/// Lock-free byte accumulator.
#[derive(Debug, Default)]
pub struct ByteCounter {
    total: AtomicU64,
    processed: AtomicU64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }
}

impl ProgressSink for ByteCounter {
    fn start(&self, total: Option<u64>) {
        self.total.store(total.unwrap_or(0), Ordering::Relaxed);
    }

    fn advance(&self, bytes: u64) {
        self.processed.fetch_add(bytes, Ordering::Relaxed);
    }
}

const BAR_TEMPLATE: &str =
    "{msg} {spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{msg} {spinner:.blue} [{elapsed_precise}] {bytes} ({bytes_per_sec})";
const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";
const BAR_CHARS: &str = "█▓▒░  ";

/// Terminal progress bar backed by `indicatif`.
///
/// `ProgressBar` is internally reference counted and safe to update from many
/// threads at once.
pub struct BarProgress {
    bar: ProgressBar,
    label: String,
}

impl BarProgress {
    /// Creates a hidden bar; it becomes visible on [`ProgressSink::start`].
    pub fn new(label: impl Into<String>) -> Self {
        Self { bar: ProgressBar::hidden(), label: label.into() }
    }

    fn style(template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars(TICK)
            .progress_chars(BAR_CHARS)
    }
}

impl ProgressSink for BarProgress {
    fn start(&self, total: Option<u64>) {
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        match total {
            Some(len) => {
                self.bar.set_length(len);
                self.bar.set_style(Self::style(BAR_TEMPLATE));
            }
            None => self.bar.set_style(Self::style(SPINNER_TEMPLATE)),
        }
        self.bar.set_message(self.label.clone());
        self.bar.set_position(0);
        self.bar.reset_elapsed();
    }

    fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

//! Pixel scheduling shared by render workers.
//!
//! Workers pull coordinates from an exhaustible cursor and report each
//! finished pixel. The cursor and the progress counter live behind two
//! separate locks so handing out pixels never waits on progress bookkeeping.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// A pixel coordinate handed to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub row: u32,
    pub col: u32,
}

/// A progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Pixels finished so far
    pub done: u64,
    /// Pixels in the image
    pub total: u64,
    /// Completion in tenths of a percent
    pub per_mille: u32,
}

impl Progress {
    /// Completion as a percentage.
    pub fn percent(&self) -> f32 {
        self.per_mille as f32 / 10.0
    }

    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

#[derive(Debug, Default)]
struct Cursor {
    row: u32,
    col: u32,
}

#[derive(Debug, Default)]
struct ProgressState {
    done: u64,
    last_reported: Option<u32>,
}

/// Hands out every pixel of a `rows × cols` image exactly once and tracks
/// how many have been finished.
#[derive(Debug)]
pub struct PixelManager {
    rows: u32,
    cols: u32,
    /// Reporting step in per mille; 0 disables reporting
    interval: u32,
    cursor: Mutex<Cursor>,
    progress: Mutex<ProgressState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A worker that panicked never leaves either state half-updated
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PixelManager {
    /// Create a manager for `rows × cols` pixels, reporting progress every
    /// `interval_percent` percent.
    pub fn new(rows: u32, cols: u32, interval_percent: u32) -> Self {
        Self {
            rows,
            cols,
            interval: interval_percent.min(100) * 10,
            cursor: Mutex::new(Cursor::default()),
            progress: Mutex::new(ProgressState::default()),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of pixels managed.
    pub fn total(&self) -> u64 {
        self.rows as u64 * self.cols as u64
    }

    /// Take the next untaken pixel in row-major order.
    ///
    /// Returns `None` once every pixel has been handed out.
    pub fn next_pixel(&self) -> Option<Pixel> {
        if self.cols == 0 {
            return None;
        }

        let mut cursor = lock(&self.cursor);
        if cursor.row >= self.rows {
            return None;
        }

        let pixel = Pixel {
            row: cursor.row,
            col: cursor.col,
        };

        cursor.col += 1;
        if cursor.col >= self.cols {
            cursor.col = 0;
            cursor.row += 1;
        }

        Some(pixel)
    }

    /// Record one finished pixel.
    ///
    /// Returns a report when progress advanced by at least the interval
    /// since the last one, and always once on completion. No percentage is
    /// reported twice.
    pub fn pixel_done(&self) -> Option<Progress> {
        let total = self.total();
        let mut state = lock(&self.progress);

        if state.done >= total {
            return None;
        }
        state.done += 1;

        if self.interval == 0 {
            return None;
        }

        let per_mille = (state.done * 1000 / total) as u32;
        let due = match state.last_reported {
            Some(last) => per_mille >= last + self.interval || (state.done == total && last < 1000),
            None => per_mille >= self.interval || state.done == total,
        };
        if !due {
            return None;
        }

        state.last_reported = Some(per_mille);
        let progress = Progress {
            done: state.done,
            total,
            per_mille,
        };
        log::info!("Render progress: {:.1}%", progress.percent());

        Some(progress)
    }

    /// Pixels finished so far.
    pub fn done(&self) -> u64 {
        lock(&self.progress).done
    }
}

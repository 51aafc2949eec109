//! Rotation worker that periodically changes the desktop wallpaper.
//!
//! Every cycle the worker takes a fresh settings snapshot, lists the
//! configured directory, picks one image according to the [`ImageOrder`],
//! checks that it decodes, and hands it to the [`DesktopEnvironment`]. Every
//! failure only skips the current cycle; the worker then sleeps for the
//! configured interval and tries again.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::images;
use crate::config::{ImageOrder, Settings, SettingsSource};
use crate::platform::DesktopEnvironment;
use crate::platform::thread::spawn_named_thread;

/// Result of a single rotation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The wallpaper was changed to this image.
    Applied(PathBuf),
    /// The directory is unset, missing or unreadable.
    MissingDirectory,
    /// The directory holds no image with a supported extension.
    NoImages,
    /// The selected image failed to decode.
    InvalidImage(PathBuf),
    /// The desktop refused the selected image.
    ApplyFailed(PathBuf),
}

impl CycleOutcome {
    /// Returns whether the wallpaper was changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }
}

/// Orders candidates for the given mode.
///
/// Ascending and descending sort by file name. Random leaves the listing
/// order untouched.
pub fn sort_candidates(candidates: &mut [PathBuf], order: ImageOrder) {
    match order {
        ImageOrder::Random => {}
        ImageOrder::Ascending => candidates.sort_by(|a, b| compare_file_names(a, b)),
        ImageOrder::Descending => candidates.sort_by(|a, b| compare_file_names(b, a)),
    }
}

fn compare_file_names(a: &Path, b: &Path) -> Ordering { a.file_name().cmp(&b.file_name()) }

/// Picks the next wallpaper from `candidates`.
///
/// No position is remembered between cycles: ascending always returns the
/// lexicographically first file name and descending the last.
pub fn select_image<'a, R>(
    candidates: &'a [PathBuf],
    order: ImageOrder,
    rng: &mut R,
) -> Option<&'a PathBuf>
where
    R: Rng + ?Sized,
{
    match order {
        ImageOrder::Random => candidates.choose(rng),
        ImageOrder::Ascending => candidates.iter().min_by(|a, b| compare_file_names(a, b)),
        ImageOrder::Descending => candidates.iter().max_by(|a, b| compare_file_names(a, b)),
    }
}

/// Lists the supported images of the configured directory in selection order.
///
/// # Errors
///
/// Returns an error if the directory is unset or cannot be read.
pub fn list_candidates(settings: &Settings) -> io::Result<Vec<PathBuf>> {
    let Some(dir) = settings.directory_path() else {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no wallpaper directory set"));
    };

    let mut candidates = images::list_images_in_directory(&dir)?;
    let order = match settings.order {
        // Listing order is arbitrary, show random mode sorted
        ImageOrder::Random => ImageOrder::Ascending,
        other => other,
    };
    sort_candidates(&mut candidates, order);
    Ok(candidates)
}

/// Changes the wallpaper once: picks an image, checks that it decodes and
/// applies it. Uses the thread-local RNG.
pub fn apply_next(desktop: &dyn DesktopEnvironment, settings: &Settings) -> CycleOutcome {
    apply_next_with(desktop, settings, &mut rand::rng())
}

/// Changes the wallpaper once, drawing random picks from `rng`.
///
/// The desktop is called at most once.
pub fn apply_next_with<R>(
    desktop: &dyn DesktopEnvironment,
    settings: &Settings,
    rng: &mut R,
) -> CycleOutcome
where
    R: Rng + ?Sized,
{
    let Some(dir) = settings.directory_path().filter(|dir| dir.is_dir()) else {
        tracing::info!(directory = %settings.directory, "invalid or no directory set, waiting");
        return CycleOutcome::MissingDirectory;
    };

    let candidates = match images::list_images_in_directory(&dir) {
        Ok(candidates) => candidates,
        Err(err) => {
            tracing::warn!(directory = %dir.display(), error = %err, "failed to read wallpaper directory");
            return CycleOutcome::MissingDirectory;
        }
    };

    let Some(selected) = select_image(&candidates, settings.order, rng).cloned() else {
        tracing::info!(directory = %dir.display(), "no images found in the directory, waiting");
        return CycleOutcome::NoImages;
    };

    if let Err(err) = images::validate_image(&selected) {
        tracing::warn!(error = %err, "skipping invalid image");
        return CycleOutcome::InvalidImage(selected);
    }

    match desktop.set_wallpaper(&selected, settings.display_mode) {
        Ok(()) => {
            tracing::info!(
                path = %selected.display(),
                display_mode = %settings.display_mode,
                "wallpaper set"
            );
            CycleOutcome::Applied(selected)
        }
        Err(err) => {
            tracing::warn!(path = %selected.display(), error = %err, "failed to set wallpaper");
            CycleOutcome::ApplyFailed(selected)
        }
    }
}

/// Stop flag the worker can sleep on.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    fn stop(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }

    fn is_stopped(&self) -> bool { *self.stopped.lock() }

    /// Sleeps for `timeout` or until stopped. Returns `true` if stopped.
    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }
}

/// Background wallpaper rotation.
pub struct RotationWorker {
    settings: Arc<dyn SettingsSource>,
    desktop: Arc<dyn DesktopEnvironment>,
    stop: Arc<StopSignal>,
}

impl RotationWorker {
    /// Creates a worker reading settings from `settings` and applying
    /// wallpapers through `desktop`.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsSource>, desktop: Arc<dyn DesktopEnvironment>) -> Self {
        Self { settings, desktop, stop: Arc::new(StopSignal::default()) }
    }

    /// Runs one select/validate/apply pass with the thread-local RNG.
    pub fn run_cycle(&self, settings: &Settings) -> CycleOutcome {
        apply_next(self.desktop.as_ref(), settings)
    }

    /// Runs one select/validate/apply pass.
    pub fn run_cycle_with<R>(&self, settings: &Settings, rng: &mut R) -> CycleOutcome
    where R: Rng + ?Sized {
        apply_next_with(self.desktop.as_ref(), settings, rng)
    }

    /// Runs cycles on the current thread until stopped, sleeping the
    /// snapshot's interval in between.
    ///
    /// Only a [`RotationHandle`] can stop the loop, so called directly this
    /// runs until the process exits.
    pub fn run(&self) {
        tracing::info!("rotation worker started");

        while !self.stop.is_stopped() {
            let settings = self.settings.snapshot();
            self.run_cycle(&settings);

            if self.stop.wait(settings.interval_duration()) {
                break;
            }
        }

        tracing::info!("rotation worker stopped");
    }

    /// Starts the worker on its own thread. The first cycle runs immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(self) -> io::Result<RotationHandle> {
        let stop = Arc::clone(&self.stop);
        let thread = spawn_named_thread("rotation", move || self.run())?;
        Ok(RotationHandle { stop, thread: Some(thread) })
    }
}

/// Handle to a running [`RotationWorker`].
///
/// Dropping the handle stops the worker and waits for it to exit.
pub struct RotationHandle {
    stop: Arc<StopSignal>,
    thread: Option<JoinHandle<()>>,
}

impl RotationHandle {
    /// Returns whether the worker thread is still running.
    #[must_use]
    pub fn is_running(&self) -> bool { self.thread.as_ref().is_some_and(|t| !t.is_finished()) }

    /// Stops the worker and waits for it to exit.
    ///
    /// Returns after any in-flight cycle completes; no wallpaper is set after that.
    pub fn stop(mut self) { self.shutdown(); }

    fn shutdown(&mut self) {
        self.stop.stop();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!("rotation worker panicked");
        }
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) { self.shutdown(); }
}

//! Background prefetch worker and cursor-based reader API.

mod ring;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::domain::errors::{DownloaderError, PrefetcherError};
use ring::{Ring, StoreOutcome};

/// How long the worker waits on the condvar between polls once it has
/// satisfied `prefetch_n`. Bounded so a shutdown request is always noticed
/// promptly instead of relying solely on a wakeup (`SPEC_FULL.md` §5).
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(200);

type DownloaderFn<T> = Box<dyn FnMut() -> Result<T, DownloaderError> + Send>;

/// Keeps a bounded ring "ahead" of a reader cursor by running a downloader
/// on a dedicated worker thread.
///
/// Generic over the image type `T` so the concurrency core can be exercised
/// in tests with a lightweight mock, while production code instantiates it
/// with [`crate::domain::entities::Image`].
pub struct Prefetcher<T> {
    ring: Arc<Mutex<Option<Ring<T>>>>,
    condvar: Arc<Condvar>,
    shutdown: Arc<AtomicBool>,
    started: AtomicBool,
    worker: Mutex<Option<JoinHandle<()>>>,
    downloader_fn: Mutex<Option<DownloaderFn<T>>>,
}

impl<T: Clone + Send + 'static> Prefetcher<T> {
    /// Allocates the prefetcher's synchronization primitives. Does not
    /// allocate the ring or spawn the worker — that happens in [`Self::start`].
    ///
    /// # Errors
    /// Never fails in this implementation (the primitives used here cannot
    /// fail to construct); the `Result` return is kept to match the
    /// original contract, which allows for OS-primitive initialization
    /// failure.
    pub fn create(
        downloader_fn: impl FnMut() -> Result<T, DownloaderError> + Send + 'static,
    ) -> Result<Self, PrefetcherError> {
        Ok(Self {
            ring: Arc::new(Mutex::new(None)),
            condvar: Arc::new(Condvar::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
            started: AtomicBool::new(false),
            worker: Mutex::new(None),
            downloader_fn: Mutex::new(Some(Box::new(downloader_fn))),
        })
    }

    /// Allocates the ring and spawns the worker thread.
    ///
    /// `prefetch_n` is silently clamped to `cache_size` if it overshoots
    /// (I5), not to `cache_size - 1` — I3's ceiling means that target can
    /// never actually be satisfied, so the worker parks on the condvar once
    /// it has filled the ring to `cache_size - 1` rather than retrying the
    /// downloader forever. This matches the clamp's literal definition
    /// rather than pre-lowering it to the true achievable ceiling. Calling
    /// `start` a second time is a programming error.
    ///
    /// # Panics
    /// Panics if `cache_size` or `prefetch_n` is zero, or if `start` has
    /// already been called on this instance (`ContractViolation`, §7).
    ///
    /// # Errors
    /// Returns [`PrefetcherError::ResourceExhaustion`] if the worker thread
    /// cannot be spawned.
    pub fn start(&self, cache_size: usize, prefetch_n: usize) -> Result<(), PrefetcherError> {
        assert!(cache_size >= 1, "cache_size must be at least 1");
        assert!(prefetch_n >= 1, "prefetch_n must be at least 1");
        assert!(
            !self.started.swap(true, Ordering::SeqCst),
            "Prefetcher::start called twice"
        );

        let prefetch_n = if prefetch_n > cache_size {
            warn!(cache_size, prefetch_n, "prefetch_n exceeds cache_size; clamping");
            cache_size
        } else {
            prefetch_n
        };

        *self.ring.lock().unwrap() = Some(Ring::new(cache_size));

        let downloader_fn = self
            .downloader_fn
            .lock()
            .unwrap()
            .take()
            .expect("start should only be called once, after create");

        let ring = Arc::clone(&self.ring);
        let condvar = Arc::clone(&self.condvar);
        let shutdown = Arc::clone(&self.shutdown);

        let handle = thread::Builder::new()
            .name("prefetch-worker".into())
            .spawn(move || worker_loop(&ring, &condvar, &shutdown, downloader_fn, prefetch_n))
            .map_err(|e| PrefetcherError::ResourceExhaustion(e.to_string()))?;

        *self.worker.lock().unwrap() = Some(handle);
        Ok(())
    }

    /// `(W - R) mod cache_size`. Returns 0 if the prefetcher has not been
    /// started.
    pub fn count_available(&self) -> usize {
        let ring = self.ring.lock().unwrap();
        ring.as_ref().map_or(0, Ring::count_available)
    }

    /// Reader-side forward step (`SPEC_FULL.md` §4.2). Always wakes the
    /// worker so it can re-evaluate its prefetch target, even when the
    /// cursor did not move.
    pub fn jump_next(&self) -> Option<T> {
        let result = {
            let mut ring = self.ring.lock().unwrap();
            ring.as_mut().and_then(Ring::jump_next)
        };
        self.condvar.notify_all();
        result
    }

    /// Reader-side backward step (`SPEC_FULL.md` §4.2). Never wakes the
    /// worker: backward motion cannot create new work.
    pub fn jump_prev(&self) -> Option<T> {
        let mut ring = self.ring.lock().unwrap();
        ring.as_mut().and_then(Ring::jump_prev)
    }

    /// Blocks until at least one image is available or `timeout` elapses,
    /// then positions the cursor on it. Replaces the busy-spin the original
    /// design used at startup (`SPEC_FULL.md` §9).
    pub fn wait_for_first(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut ring = self.ring.lock().unwrap();

        loop {
            if ring.as_ref().is_some_and(|r| r.count_available() > 0) {
                break;
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            let (guard, _timed_out) = self.condvar.wait_timeout(ring, remaining).unwrap();
            ring = guard;
        }

        let result = ring.as_mut().and_then(Ring::jump_next);
        drop(ring);
        self.condvar.notify_all();
        result
    }
}

impl<T> Drop for Prefetcher<T> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
        // The ring (and every image slot it still owns) is dropped here,
        // after the worker has joined and can no longer touch it.
    }
}

impl<T> std::fmt::Debug for Prefetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefetcher")
            .field("started", &self.started.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

fn worker_loop<T: Clone + Send + 'static>(
    ring: &Mutex<Option<Ring<T>>>,
    condvar: &Condvar,
    shutdown: &AtomicBool,
    mut downloader_fn: DownloaderFn<T>,
    prefetch_n: usize,
) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return;
        }

        let have = {
            let guard = ring.lock().unwrap();
            guard.as_ref().map_or(0, Ring::count_available)
        };

        if have < prefetch_n {
            match downloader_fn() {
                Ok(image) => {
                    let outcome = {
                        let mut guard = ring.lock().unwrap();
                        guard
                            .as_mut()
                            .expect("ring is initialized before the worker starts")
                            .store(image)
                    };
                    match outcome {
                        StoreOutcome::Stored(evicted) => {
                            condvar.notify_all();
                            drop(evicted);
                            continue;
                        }
                        StoreOutcome::Full => {
                            // Reached the I3 ceiling (cache_size - 1); fall
                            // through to the wait below instead of retrying
                            // immediately, since nothing will change until
                            // the reader moves.
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "downloader call failed; will retry");
                    continue;
                }
            }
        }

        let guard = ring.lock().unwrap();
        let (guard, _timed_out) = condvar.wait_timeout(guard, WORKER_POLL_INTERVAL).unwrap();
        drop(guard);
    }
}

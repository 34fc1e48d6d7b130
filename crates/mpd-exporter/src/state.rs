//! Shared application state and allocator setup.

#[cfg(not(target_env = "msvc"))]
use std::ptr::null_mut;
use std::sync::Arc;

use prometheus_client::registry::Registry;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Returns the memory of a finished scrape to the OS.
///
/// A scrape holds every song record of the library at once and frees them
/// together, so resident memory would otherwise stay at the size of the last
/// listing between scrapes.
#[cfg(not(target_env = "msvc"))]
pub(crate) fn release_memory_to_os() {
    // 4096 = MALLCTL_ARENAS_ALL; the scrape may have run on any blocking-pool thread.
    let purge = c"arena.4096.purge";
    unsafe {
        tikv_jemalloc_sys::mallctl(purge.as_ptr(), null_mut(), null_mut(), null_mut(), 0);
    }
}

#[cfg(target_env = "msvc")]
pub(crate) fn release_memory_to_os() {}

/// State handed to every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Registry holding the MPD collector. Encoding it runs one scrape.
    pub(crate) registry: Arc<Registry>,
    /// Path the metrics are served under, linked from the landing page.
    pub(crate) metrics_path: Arc<str>,
}

//! Shared application state and global allocator.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use prometheus::Registry;

/// State handed to every request handler.
///
/// `Registry` is internally reference-counted; cloning shares the same
/// collectors.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Registry,
}

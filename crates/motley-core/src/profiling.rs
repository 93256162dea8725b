//! Profiling utilities based on the `puffin` crate.
//!
//! The dispatcher's create/bind/replace paths are wrapped in
//! [`profile_function!`] scopes. Scopes are free until profiling is switched
//! on with [`init_profiling`].

use std::sync::OnceLock;

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Default address of the puffin HTTP server.
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8585";

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Collect scopes in-process only (inspect with [`GlobalProfiler`]).
    InProcess,
    /// Send profiling data to puffin_viewer via HTTP.
    PuffinHttp,
}

static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

/// Initialize profiling with the specified backend.
///
/// # Example
/// ```no_run
/// use motley_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
pub fn init_profiling(backend: ProfilingBackend) {
    puffin::set_scopes_on(true);

    match backend {
        ProfilingBackend::InProcess => {
            tracing::debug!("Puffin scopes enabled (in-process)");
        }
        ProfilingBackend::PuffinHttp => {
            if PROFILING_SERVER.get().is_some() {
                return;
            }
            match puffin_http::Server::new(DEFAULT_SERVER_ADDR) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{DEFAULT_SERVER_ADDR}");
                    // Keep the server alive for the rest of the process
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
    }
}

/// Mark the end of one host layout pass.
///
/// Call this once per layout/scroll pass so scopes are grouped by pass.
#[inline]
pub fn new_pass() {
    puffin::GlobalProfiler::lock().new_frame();
}

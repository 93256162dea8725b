//! Profiling scopes, compiled out without the `profiling` feature.

#[cfg(feature = "profiling")]
pub(crate) use motley_core::profiling::profile_function;

#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

#[cfg(not(feature = "profiling"))]
pub(crate) use profile_function;

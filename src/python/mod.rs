//! Python bindings via PyO3
//!
//! This module provides the Python interface for rapid_wordcluster.

pub mod json;
pub mod native;

use pyo3::prelude::*;

/// Register all Python classes and functions
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    // Native interface
    m.add_class::<native::PyClusterConfig>()?;
    m.add_class::<native::PyClusterReport>()?;
    m.add_function(wrap_pyfunction!(native::cluster_sentences, m)?)?;
    m.add_function(wrap_pyfunction!(native::cluster_file, m)?)?;

    // JSON interface
    m.add_function(wrap_pyfunction!(json::cluster_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(json::validate_config_json, m)?)?;

    Ok(())
}

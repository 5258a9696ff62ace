//! Cross-crate integration tests for Rango. See the `tests/` directory.

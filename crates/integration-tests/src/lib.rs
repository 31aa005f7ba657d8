//! Cross-crate scenario tests for Clutch Takes live under `tests/`.
//! This crate intentionally exports nothing.

//! Shared utilities for tipscan binaries.

pub mod bootstrap;

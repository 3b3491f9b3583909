//! Unit tests for yardmap.

mod containment_tests;
mod settings_watcher_tests;

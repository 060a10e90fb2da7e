//! Unit tests for the task module.

mod support;
mod sweeper_tests;

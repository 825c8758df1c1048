//! Small helpers shared by the per-module `from_env` constructors.
//!
//! Malformed optional values fall back to the default rather than failing startup.

use std::env;
use std::time::Duration;

pub(crate) fn string_or(var_name: &str, default: String) -> String {
    env::var(var_name).unwrap_or(default)
}

pub(crate) fn optional_string(var_name: &str) -> Option<String> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn usize_or(var_name: &str, default: usize) -> usize {
    env::var(var_name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn f32_or(var_name: &str, default: f32) -> f32 {
    env::var(var_name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn secs_or(var_name: &str, default: Duration) -> Duration {
    env::var(var_name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

//! Reusable building blocks for collectors

pub mod parsing_utils;

pub use parsing_utils::{parse_f64_field, parse_i64_field};

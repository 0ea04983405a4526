//! Utility functions shared by the resolvers.
//!
//! This module provides:
//! - Deadline-bounded race and fallback combinators
//! - HTML escaping

pub mod settle;

pub use settle::{first_ok, with_deadline, TimeoutError};

/// Escapes text for safe inclusion in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

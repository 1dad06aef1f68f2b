//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `placehub_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("placehub_core ping={}", placehub_core::ping());
    println!("placehub_core version={}", placehub_core::core_version());
}

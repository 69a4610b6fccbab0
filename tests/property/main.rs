//! Property-based and exhaustive round-trip tests.
//!
//! Run with: `cargo test --test property`

mod fold_oracle;
mod fold_roundtrip;

//! Format decoding modules.
//!
//! Each format follows a layered structure:
//! - `layout`: byte sizes and enumeration codes (source of truth)
//! - `reader`: error-checked big-endian field access
//! - `parser`: record decoding (no direct byte handling)
//! - `error`: explicit, actionable errors
//!
//! Decoders never open files; sources and the analysis layer handle I/O
//! and aggregation.

pub mod pgs;

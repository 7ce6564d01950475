//! Presentation Graphics Stream (SUP) decoding.
//!
//! A SUP stream is a flat sequence of segments, each a 13-byte header
//! (`"PG"` magic, two timestamps, type tag, body size) followed by its body.
//! Only presentation composition segments are decoded: their fixed prefix
//! and the sprite records that follow it. Every other body is skipped using
//! the declared size.
//!
//! All fields are big-endian and unaligned. Byte sizes and enumeration codes
//! live in `layout`, field primitives in `reader`, record decoding in
//! `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::PgsError;
pub use parser::{
    Composition, CompositionState, PaletteUpdate, SegmentHeader, SegmentType, Sprite, SpriteFlag,
    read_composition, read_segment_header, read_sprite,
};
pub use reader::SupReader;

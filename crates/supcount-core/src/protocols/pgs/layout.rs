pub const MAGIC: &[u8; 2] = b"PG";

pub const SEGMENT_HEADER_LEN: u64 = 13;
pub const COMPOSITION_PREFIX_LEN: u64 = 11;
pub const SPRITE_RECORD_LEN: u64 = 16;

pub const SEGMENT_PDS: u8 = 0x14;
pub const SEGMENT_ODS: u8 = 0x15;
pub const SEGMENT_PCS: u8 = 0x16;
pub const SEGMENT_WDS: u8 = 0x17;
pub const SEGMENT_END: u8 = 0x80;

pub const STATE_NORMAL: u8 = 0x00;
pub const STATE_ACQUISITION_POINT: u8 = 0x40;
pub const STATE_EPOCH_START: u8 = 0x80;

pub const PALETTE_UPDATE_NO: u8 = 0x00;
pub const PALETTE_UPDATE_YES: u8 = 0x80;

pub const SPRITE_FLAG_NORMAL: u8 = 0x00;
pub const SPRITE_FLAG_FORCED: u8 = 0x40;

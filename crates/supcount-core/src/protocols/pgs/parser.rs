use std::io::{BufRead, Seek};

use super::error::PgsError;
use super::layout;
use super::reader::SupReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    Pds,
    Ods,
    Pcs,
    Wds,
    End,
    Unknown(u8),
}

impl From<u8> for SegmentType {
    fn from(value: u8) -> Self {
        match value {
            layout::SEGMENT_PDS => SegmentType::Pds,
            layout::SEGMENT_ODS => SegmentType::Ods,
            layout::SEGMENT_PCS => SegmentType::Pcs,
            layout::SEGMENT_WDS => SegmentType::Wds,
            layout::SEGMENT_END => SegmentType::End,
            other => SegmentType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    Normal,
    AcquisitionPoint,
    EpochStart,
    Unknown(u8),
}

impl From<u8> for CompositionState {
    fn from(value: u8) -> Self {
        match value {
            layout::STATE_NORMAL => CompositionState::Normal,
            layout::STATE_ACQUISITION_POINT => CompositionState::AcquisitionPoint,
            layout::STATE_EPOCH_START => CompositionState::EpochStart,
            other => CompositionState::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteUpdate {
    No,
    Yes,
    Unknown(u8),
}

impl From<u8> for PaletteUpdate {
    fn from(value: u8) -> Self {
        match value {
            layout::PALETTE_UPDATE_NO => PaletteUpdate::No,
            layout::PALETTE_UPDATE_YES => PaletteUpdate::Yes,
            other => PaletteUpdate::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteFlag {
    Normal,
    Forced,
    Unknown(u8),
}

impl From<u8> for SpriteFlag {
    fn from(value: u8) -> Self {
        match value {
            layout::SPRITE_FLAG_NORMAL => SpriteFlag::Normal,
            layout::SPRITE_FLAG_FORCED => SpriteFlag::Forced,
            other => SpriteFlag::Unknown(other),
        }
    }
}

/// Framing header preceding every segment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    pub timestamp: u32,
    pub segment_type: SegmentType,
    pub body_size: u16,
}

/// Fixed prefix of a presentation composition segment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub width: u16,
    pub height: u16,
    pub composition_id: u16,
    pub state: CompositionState,
    pub palette_update: PaletteUpdate,
    pub palette_id: u8,
    pub sprite_count: u8,
}

/// One composition object referenced by a PCS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub object_id: u16,
    pub window_id: u8,
    pub flag: SpriteFlag,
    pub target_h: u16,
    pub target_v: u16,
    pub source_h: u16,
    pub source_v: u16,
    pub width: u16,
    pub height: u16,
}

impl Sprite {
    pub fn is_forced(&self) -> bool {
        self.flag == SpriteFlag::Forced
    }
}

/// Decode a segment header, leaving the reader at the first body byte.
pub fn read_segment_header<R: BufRead + Seek>(
    reader: &mut SupReader<R>,
) -> Result<SegmentHeader, PgsError> {
    reader.expect(layout::MAGIC)?;
    let timestamp = reader.read_u32_be()?;
    // Decoding timestamp, unused.
    reader.read_u32_be()?;
    let segment_type = SegmentType::from(reader.read_u8()?);
    let body_size = reader.read_u16_be()?;
    Ok(SegmentHeader {
        timestamp,
        segment_type,
        body_size,
    })
}

/// Decode the fixed PCS prefix. `sprite_count` sprite records follow it.
pub fn read_composition<R: BufRead + Seek>(
    reader: &mut SupReader<R>,
) -> Result<Composition, PgsError> {
    let width = reader.read_u16_be()?;
    let height = reader.read_u16_be()?;
    // Reserved.
    reader.read_u8()?;
    let composition_id = reader.read_u16_be()?;
    let state = CompositionState::from(reader.read_u8()?);
    let palette_update = PaletteUpdate::from(reader.read_u8()?);
    let palette_id = reader.read_u8()?;
    let sprite_count = reader.read_u8()?;
    Ok(Composition {
        width,
        height,
        composition_id,
        state,
        palette_update,
        palette_id,
        sprite_count,
    })
}

pub fn read_sprite<R: BufRead + Seek>(reader: &mut SupReader<R>) -> Result<Sprite, PgsError> {
    Ok(Sprite {
        object_id: reader.read_u16_be()?,
        window_id: reader.read_u8()?,
        flag: SpriteFlag::from(reader.read_u8()?),
        target_h: reader.read_u16_be()?,
        target_v: reader.read_u16_be()?,
        source_h: reader.read_u16_be()?,
        source_v: reader.read_u16_be()?,
        width: reader.read_u16_be()?,
        height: reader.read_u16_be()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: Vec<u8>) -> SupReader<Cursor<Vec<u8>>> {
        SupReader::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn parse_segment_header() {
        let mut bytes = b"PG".to_vec();
        bytes.extend_from_slice(&0x0001_5f90u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.push(layout::SEGMENT_PCS);
        bytes.extend_from_slice(&0x0013u16.to_be_bytes());
        bytes.push(0xee);

        let mut reader = reader(bytes);
        let header = read_segment_header(&mut reader).unwrap();
        assert_eq!(header.timestamp, 90_000);
        assert_eq!(header.segment_type, SegmentType::Pcs);
        assert_eq!(header.body_size, 0x13);
        assert_eq!(reader.position(), layout::SEGMENT_HEADER_LEN);
    }

    #[test]
    fn parse_segment_header_keeps_unknown_type() {
        let mut bytes = b"PG".to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.push(0x42);
        bytes.extend_from_slice(&[0x00, 0x00]);

        let header = read_segment_header(&mut reader(bytes)).unwrap();
        assert_eq!(header.segment_type, SegmentType::Unknown(0x42));
        assert_eq!(header.body_size, 0);
    }

    #[test]
    fn parse_segment_header_bad_magic() {
        let mut bytes = b"XG".to_vec();
        bytes.extend_from_slice(&[0u8; 11]);
        let err = read_segment_header(&mut reader(bytes)).unwrap_err();
        assert!(matches!(
            err,
            PgsError::Malformed {
                expected: b'P',
                actual: b'X',
                offset: 0
            }
        ));
    }

    #[test]
    fn parse_segment_header_short() {
        let bytes = b"PG\x00\x00\x00\x00\x00".to_vec();
        let err = read_segment_header(&mut reader(bytes)).unwrap_err();
        assert!(matches!(err, PgsError::Truncated { offset: 6, .. }));
    }

    #[test]
    fn parse_composition() {
        let bytes = vec![
            0x07, 0x80, // width 1920
            0x04, 0x38, // height 1080
            0x10, // reserved
            0x00, 0x05, // composition id
            0x80, // epoch start
            0x00, // no palette update
            0x02, // palette id
            0x03, // sprite count
        ];
        let mut reader = reader(bytes);
        let composition = read_composition(&mut reader).unwrap();
        assert_eq!(composition.width, 1920);
        assert_eq!(composition.height, 1080);
        assert_eq!(composition.composition_id, 5);
        assert_eq!(composition.state, CompositionState::EpochStart);
        assert_eq!(composition.palette_update, PaletteUpdate::No);
        assert_eq!(composition.palette_id, 2);
        assert_eq!(composition.sprite_count, 3);
        assert_eq!(reader.position(), layout::COMPOSITION_PREFIX_LEN);
    }

    #[test]
    fn parse_composition_preserves_unknown_flags() {
        let bytes = vec![0, 0, 0, 0, 0, 0, 0, 0x41, 0x7f, 0, 0];
        let composition = read_composition(&mut reader(bytes)).unwrap();
        assert_eq!(composition.state, CompositionState::Unknown(0x41));
        assert_eq!(composition.palette_update, PaletteUpdate::Unknown(0x7f));
        assert_eq!(composition.sprite_count, 0);
    }

    #[test]
    fn parse_sprite() {
        let bytes = vec![
            0x00, 0x01, // object id
            0x02, // window id
            0x40, // forced
            0x00, 0x10, 0x00, 0x20, // target
            0x00, 0x30, 0x00, 0x40, // source
            0x01, 0x00, 0x00, 0x80, // size
        ];
        let mut reader = reader(bytes);
        let sprite = read_sprite(&mut reader).unwrap();
        assert_eq!(sprite.object_id, 1);
        assert_eq!(sprite.window_id, 2);
        assert_eq!(sprite.flag, SpriteFlag::Forced);
        assert!(sprite.is_forced());
        assert_eq!((sprite.target_h, sprite.target_v), (0x10, 0x20));
        assert_eq!((sprite.source_h, sprite.source_v), (0x30, 0x40));
        assert_eq!((sprite.width, sprite.height), (0x100, 0x80));
        assert_eq!(reader.position(), layout::SPRITE_RECORD_LEN);
    }

    #[test]
    fn sprite_with_extra_flag_bits_is_not_forced() {
        let mut bytes = vec![0u8; layout::SPRITE_RECORD_LEN as usize];
        bytes[3] = 0xc0;
        let sprite = read_sprite(&mut reader(bytes)).unwrap();
        assert_eq!(sprite.flag, SpriteFlag::Unknown(0xc0));
        assert!(!sprite.is_forced());
    }

    #[test]
    fn parse_sprite_short() {
        let bytes = vec![0u8; layout::SPRITE_RECORD_LEN as usize - 1];
        let err = read_sprite(&mut reader(bytes)).unwrap_err();
        assert!(matches!(err, PgsError::Truncated { offset: 14, needed: 2 }));
    }
}

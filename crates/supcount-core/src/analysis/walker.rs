use std::io::{BufRead, Seek};

use tracing::{debug, info, trace, warn};

use crate::StreamSummary;
use crate::protocols::pgs::{
    PgsError, SegmentType, SupReader, read_composition, read_segment_header, read_sprite,
};

/// Walk every segment of a SUP stream and count forced composition objects.
///
/// Non-PCS bodies are never interpreted. After each segment the reader is
/// moved to `body_start + body_size`, whatever the body decoding consumed,
/// so a PCS whose records disagree with its declared size cannot
/// desynchronise the next header.
pub fn count_forced<R: BufRead + Seek>(
    reader: &mut SupReader<R>,
) -> Result<StreamSummary, PgsError> {
    let mut summary = StreamSummary::default();

    while reader.has_more()? {
        let segment_offset = reader.position();
        let header = read_segment_header(reader)?;
        let body_start = reader.position();
        let body_size = u64::from(header.body_size);
        summary.segments += 1;
        debug!(
            offset = segment_offset,
            segment_type = ?header.segment_type,
            body_size,
            "segment"
        );

        if header.segment_type == SegmentType::Pcs {
            add_composition(reader, &mut summary)?;
            let consumed = reader.position() - body_start;
            if consumed != body_size {
                warn!(
                    offset = segment_offset,
                    body_size, consumed, "PCS records disagree with declared body size"
                );
            }
        }

        skip_body(reader, body_start, body_size)?;
    }

    info!(
        forced = summary.forced_objects,
        total = summary.total_objects,
        segments = summary.segments,
        "stream complete"
    );
    Ok(summary)
}

fn add_composition<R: BufRead + Seek>(
    reader: &mut SupReader<R>,
    summary: &mut StreamSummary,
) -> Result<(), PgsError> {
    let composition = read_composition(reader)?;
    debug!(
        composition_id = composition.composition_id,
        state = ?composition.state,
        sprites = composition.sprite_count,
        "composition"
    );
    summary.compositions += 1;
    summary.total_objects += u64::from(composition.sprite_count);
    for _ in 0..composition.sprite_count {
        let sprite = read_sprite(reader)?;
        trace!(object_id = sprite.object_id, flag = ?sprite.flag, "sprite");
        if sprite.is_forced() {
            summary.forced_objects += 1;
        }
    }
    Ok(())
}

/// Position the reader just past the body, failing when the stream ends
/// before the declared body does.
fn skip_body<R: BufRead + Seek>(
    reader: &mut SupReader<R>,
    body_start: u64,
    body_size: u64,
) -> Result<(), PgsError> {
    let next_offset = body_start + body_size;
    if body_size == 0 {
        return reader.seek(next_offset);
    }
    reader.seek(next_offset - 1)?;
    match reader.read_u8() {
        Ok(_) => Ok(()),
        Err(PgsError::Truncated { .. }) => Err(PgsError::Truncated {
            offset: body_start,
            needed: body_size as usize,
        }),
        Err(err) => Err(err),
    }
}

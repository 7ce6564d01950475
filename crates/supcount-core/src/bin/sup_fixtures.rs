use std::fs;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 2] = b"PG";
const SEGMENT_PDS: u8 = 0x14;
const SEGMENT_ODS: u8 = 0x15;
const SEGMENT_PCS: u8 = 0x16;
const SEGMENT_WDS: u8 = 0x17;
const SEGMENT_END: u8 = 0x80;
const SEGMENT_UNKNOWN: u8 = 0x42;

const STATE_NORMAL: u8 = 0x00;
const STATE_EPOCH_START: u8 = 0x80;
const PALETTE_UPDATE_NO: u8 = 0x00;
const FLAG_NORMAL: u8 = 0x00;
const FLAG_FORCED: u8 = 0x40;
const FLAG_CROPPED: u8 = 0x80;

const FRAME_WIDTH: u16 = 1920;
const FRAME_HEIGHT: u16 = 1080;
const PTS_PER_SECOND: u32 = 90_000;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_stream(root.join("forced_mixed").join("input.sup"), &forced_mixed())?;
    write_stream(root.join("no_pcs").join("input.sup"), &no_pcs())?;
    write_stream(root.join("padded_pcs").join("input.sup"), &padded_pcs())?;
    write_stream(
        root.join("unknown_segment").join("input.sup"),
        &unknown_segment(),
    )?;
    Ok(())
}

struct Segment {
    pts: u32,
    segment_type: u8,
    body: Vec<u8>,
}

impl Segment {
    fn new(pts: u32, segment_type: u8, body: Vec<u8>) -> Self {
        Self {
            pts,
            segment_type,
            body,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.pts.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.push(self.segment_type);
        out.extend_from_slice(&(self.body.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.body);
    }
}

/// One PCS with a forced and a normal sprite (45-byte body, two trailing
/// padding bytes), the usual WDS/PDS/ODS/END set, then a clearing PCS.
fn forced_mixed() -> Vec<Segment> {
    vec![
        Segment::new(
            PTS_PER_SECOND,
            SEGMENT_PCS,
            pcs_body(0, STATE_EPOCH_START, &[FLAG_FORCED, FLAG_NORMAL], 2),
        ),
        Segment::new(PTS_PER_SECOND, SEGMENT_WDS, vec![0u8; 10]),
        Segment::new(PTS_PER_SECOND, SEGMENT_PDS, vec![0u8; 7]),
        Segment::new(PTS_PER_SECOND, SEGMENT_ODS, vec![0xffu8; 20]),
        Segment::new(PTS_PER_SECOND, SEGMENT_END, Vec::new()),
        Segment::new(3 * PTS_PER_SECOND, SEGMENT_PCS, pcs_body(1, STATE_NORMAL, &[], 0)),
        Segment::new(3 * PTS_PER_SECOND, SEGMENT_WDS, vec![0u8; 10]),
        Segment::new(3 * PTS_PER_SECOND, SEGMENT_END, Vec::new()),
    ]
}

fn no_pcs() -> Vec<Segment> {
    vec![
        Segment::new(0, SEGMENT_WDS, vec![0u8; 10]),
        Segment::new(0, SEGMENT_PDS, vec![0u8; 7]),
        Segment::new(0, SEGMENT_ODS, vec![0u8; 20]),
        Segment::new(0, SEGMENT_END, Vec::new()),
    ]
}

/// PCS body whose trailing bytes look like another segment header.
fn padded_pcs() -> Vec<Segment> {
    let mut body = pcs_body(0, STATE_EPOCH_START, &[FLAG_FORCED], 0);
    Segment::new(0, SEGMENT_PCS, pcs_body(1, STATE_NORMAL, &[FLAG_FORCED], 0)).encode(&mut body);
    vec![
        Segment::new(0, SEGMENT_PCS, body),
        Segment::new(0, SEGMENT_END, Vec::new()),
    ]
}

fn unknown_segment() -> Vec<Segment> {
    vec![
        Segment::new(0, SEGMENT_UNKNOWN, b"PG\x00\x00\x00".to_vec()),
        Segment::new(
            0,
            SEGMENT_PCS,
            pcs_body(0, STATE_EPOCH_START, &[FLAG_FORCED, FLAG_FORCED, FLAG_CROPPED], 0),
        ),
        Segment::new(0, SEGMENT_END, Vec::new()),
    ]
}

fn pcs_body(composition_id: u16, state: u8, flags: &[u8], padding: usize) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&FRAME_WIDTH.to_be_bytes());
    body.extend_from_slice(&FRAME_HEIGHT.to_be_bytes());
    body.push(0x10);
    body.extend_from_slice(&composition_id.to_be_bytes());
    body.push(state);
    body.push(PALETTE_UPDATE_NO);
    body.push(0x00);
    body.push(flags.len() as u8);
    for (idx, flag) in flags.iter().copied().enumerate() {
        body.extend_from_slice(&(idx as u16).to_be_bytes());
        body.push(0x00);
        body.push(flag);
        for value in [64u16, 900, 0, 0, 640, 120] {
            body.extend_from_slice(&value.to_be_bytes());
        }
    }
    body.extend(std::iter::repeat_n(0u8, padding));
    body
}

fn write_stream(path: PathBuf, segments: &[Segment]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    let mut output = Vec::new();
    for segment in segments {
        segment.encode(&mut output);
    }
    write_file(&path, &output)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.4.7

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Malformed modified UTF-8 sequence at byte {offset}")]
pub struct DecodeError {
    pub offset: usize,
}

/// Decodes modified UTF-8 into UTF-16 code units.
///
/// Supplementary characters arrive as two three-byte surrogate halves and
/// leave as a high/low surrogate pair. Lone surrogates are passed through
/// as single units.
pub fn decode(bytes: &[u8]) -> Result<Vec<u16>, DecodeError> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let lead = bytes[i];
        let (code_point, width) = if lead & 0x80 == 0 {
            (lead as u32, 1)
        } else if lead & 0xe0 == 0xc0 {
            let b = continuation(bytes, i, 1)?;
            (((lead & 0x1f) as u32) << 6 | (b & 0x3f) as u32, 2)
        } else if lead & 0xf0 == 0xe0 {
            match surrogate_pair(&bytes[i..]) {
                Some(code_point) => (code_point, 6),
                None => {
                    let b = continuation(bytes, i, 1)?;
                    let c = continuation(bytes, i, 2)?;
                    (
                        ((lead & 0x0f) as u32) << 12
                            | ((b & 0x3f) as u32) << 6
                            | (c & 0x3f) as u32,
                        3,
                    )
                }
            }
        } else {
            return Err(DecodeError { offset: i });
        };

        push_code_point(&mut units, code_point);
        i += width;
    }

    Ok(units)
}

/// Decodes into a `String`, replacing unpaired surrogates with U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> Result<String, DecodeError> {
    Ok(String::from_utf16_lossy(&decode(bytes)?))
}

/// Compares the decoded text with `expected` unit by unit.
pub fn matches(bytes: &[u8], expected: &str) -> Result<bool, DecodeError> {
    Ok(decode(bytes)?.into_iter().eq(expected.encode_utf16()))
}

fn continuation(bytes: &[u8], lead: usize, n: usize) -> Result<u8, DecodeError> {
    match bytes.get(lead + n) {
        Some(&b) if b & 0xc0 == 0x80 => Ok(b),
        _ => Err(DecodeError { offset: lead }),
    }
}

fn surrogate_pair(bytes: &[u8]) -> Option<u32> {
    match *bytes {
        [0xed, v, w, 0xed, y, z, ..]
            if v >> 4 == 0x0a && w >> 6 == 0x02 && y >> 4 == 0x0b && z >> 6 == 0x02 =>
        {
            Some(
                0x10000
                    + (((v & 0x0f) as u32) << 16)
                    + (((w & 0x3f) as u32) << 10)
                    + (((y & 0x0f) as u32) << 6)
                    + (z & 0x3f) as u32,
            )
        }
        _ => None,
    }
}

fn push_code_point(units: &mut Vec<u16>, code_point: u32) {
    if code_point > 0xffff {
        let offset = code_point - 0x10000;
        units.push((0xd800 + (offset >> 10)) as u16);
        units.push((0xdc00 + (offset & 0x3ff)) as u16);
    } else {
        units.push(code_point as u16);
    }
}

//! Line to frame parsing.
//!
//! Validation is positional and stops at the first violation:
//!
//! ```text
//! byte 0   kind      'L' | 'M'          else UnknownKind
//! byte 1   separator ','                else MissingSeparator
//! byte 2.. payload   L: one raw byte    else MissingPayload
//!                    M: signed decimal  (permissive, never fails)
//! ```

use crate::{
    Frame, FrameKind,
    errors::{ParseError, Result},
};

/// Parse one line (without terminator) into a [`Frame`].
///
/// # Errors
///
/// - `ParseError::Empty` if the line has no bytes
/// - `ParseError::UnknownKind` if the first byte is not `L` or `M`
/// - `ParseError::MissingSeparator` if the second byte is not `,`
/// - `ParseError::MissingPayload` if an `L` line has no third byte
pub fn parse(line: &[u8]) -> Result<Frame> {
    let (&tag, rest) = line.split_first().ok_or(ParseError::Empty)?;
    let kind = FrameKind::from_tag(tag).ok_or(ParseError::UnknownKind { kind: tag })?;

    let payload = match rest.split_first() {
        Some((b',', payload)) => payload,
        _ => return Err(ParseError::MissingSeparator),
    };

    match kind {
        FrameKind::Load => {
            let &byte = payload.first().ok_or(ParseError::MissingPayload)?;
            Ok(Frame::Load(byte))
        },
        FrameKind::Map => Ok(Frame::Map(parse_rotation(payload))),
    }
}

/// Permissive signed decimal conversion used for MAP payloads.
///
/// Leading whitespace (space, `\t`, `\n`, `\v`, `\f`, `\r`) is skipped, one
/// optional `+`/`-` sign is accepted, then the longest run of digits is
/// converted. Anything after the digits is ignored and input without digits
/// converts to `0`. Values beyond the `i64` range saturate.
pub fn parse_rotation(digits: &[u8]) -> i64 {
    let mut rest = digits;
    while let Some((first, tail)) = rest.split_first()
        && is_space(*first)
    {
        rest = tail;
    }

    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        },
        Some(b'+') => {
            rest = &rest[1..];
            false
        },
        _ => false,
    };

    // i64::MIN has one more unit of magnitude than i64::MAX
    let limit = i128::from(i64::MAX) + 1;
    let mut magnitude: i128 = 0;
    for digit in rest.iter().take_while(|b| b.is_ascii_digit()) {
        magnitude = (magnitude * 10 + i128::from(digit - b'0')).min(limit);
    }

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// C `isspace` set: ASCII whitespace plus vertical tab.
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B
}

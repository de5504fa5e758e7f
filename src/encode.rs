//! Query encoder: builds a 512-byte query datagram for a hostname, one
//! A/IN question.

use crate::error::ResolveError;
use crate::header;

/// Datagrams never exceed this size.
pub const MAX_DATAGRAM: usize = 512;

/// Octets left for the question after the 12-byte header.
const QUESTION_BUDGET: usize = 500;

/// Encodes a single A/IN question for `hostname` into `buf`, returning the
/// number of octets written (header + question). The header's flag bits are
/// all zero (QR=0, OPCODE=0, RD=0 -- these are LAN/pool resolvers already
/// configured to recurse for every client, so the query doesn't need to
/// ask for it); the transaction ID is left as zero, filled in per-server
/// by the dispatcher.
///
/// Rejects before truncating: a label whose length doesn't fit in one
/// octet is caught while `label.len()` is still a `usize`, not after it has
/// been narrowed to `u8`.
pub fn encode_query(hostname: &str, buf: &mut [u8; MAX_DATAGRAM]) -> Result<usize, ResolveError> {
    header::write_query_header(buf);

    let mut pos = header::HEADER_LEN;
    let question_start = pos;
    let name = hostname.trim_end_matches('.');

    for label in name.split('.') {
        if label.len() > 255 {
            return Err(ResolveError::EncodeOverflow);
        }
        write_label(buf, &mut pos, label)?;
    }
    *buf.get_mut(pos).ok_or(ResolveError::EncodeOverflow)? = 0; // root label
    pos += 1;

    if pos - question_start > QUESTION_BUDGET {
        return Err(ResolveError::EncodeOverflow);
    }

    write_u16(buf, &mut pos, 1)?; // QTYPE = A
    write_u16(buf, &mut pos, 1)?; // QCLASS = IN

    Ok(pos)
}

fn write_label(buf: &mut [u8], pos: &mut usize, label: &str) -> Result<(), ResolveError> {
    let bytes = label.as_bytes();
    let end = *pos + 1 + bytes.len();
    let slot = buf.get_mut(*pos..end).ok_or(ResolveError::EncodeOverflow)?;
    slot[0] = bytes.len() as u8;
    slot[1..].copy_from_slice(bytes);
    *pos = end;
    Ok(())
}

fn write_u16(buf: &mut [u8], pos: &mut usize, value: u16) -> Result<(), ResolveError> {
    let end = *pos + 2;
    buf.get_mut(*pos..end)
        .ok_or(ResolveError::EncodeOverflow)?
        .copy_from_slice(&value.to_be_bytes());
    *pos = end;
    Ok(())
}

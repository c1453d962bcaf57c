//! Wire framing shared by the map and set codecs.
//!
//! All integers are little-endian. The format is fixed and sequential, so
//! there is no schema, no framing magic, and no reflection: a header of
//! explicit counts and cursors, the raw arena bytes up to each cursor,
//! then the spill entries as length-prefixed strings.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::arena::ByteArena;
use crate::error::Error;
use crate::hash::HashSpace;

/// Cap on the bytes pre-allocated from untrusted length fields. Reads
/// still consume the full declared length; this only bounds the initial
/// allocation when the declared length is garbage.
const PREALLOC_CAP: usize = 1 << 20;

const MAX_ARENA_BYTES: u64 = 1 << 32;

pub(crate) fn write_hash_space<W: Write>(w: &mut W, space: HashSpace) -> Result<(), Error> {
    let flag = match space {
        HashSpace::Full => 0u8,
        HashSpace::Narrow => 1u8,
    };
    w.write_u8(flag)?;
    Ok(())
}

pub(crate) fn read_hash_space<R: Read>(r: &mut R) -> Result<HashSpace, Error> {
    match r.read_u8()? {
        0 => Ok(HashSpace::Full),
        1 => Ok(HashSpace::Narrow),
        other => Err(Error::Corrupt(format!("invalid hash-space flag {other}"))),
    }
}

pub(crate) fn write_count<W: Write>(w: &mut W, count: usize) -> Result<(), Error> {
    w.write_u64::<LittleEndian>(count as u64)?;
    Ok(())
}

pub(crate) fn read_count<R: Read>(r: &mut R, what: &str) -> Result<usize, Error> {
    let n = r.read_u64::<LittleEndian>()?;
    usize::try_from(n).map_err(|_| Error::Corrupt(format!("{what} count {n} out of range")))
}

/// Persist an arena's write cursor. Cursors for every arena precede the
/// arena byte blocks in the format.
pub(crate) fn write_cursor<W: Write>(w: &mut W, arena: &ByteArena) -> Result<(), Error> {
    w.write_u64::<LittleEndian>(arena.cursor() as u64)?;
    Ok(())
}

pub(crate) fn read_cursor<R: Read>(r: &mut R) -> Result<usize, Error> {
    let cursor = r.read_u64::<LittleEndian>()?;
    if cursor > MAX_ARENA_BYTES {
        return Err(Error::Corrupt(format!("arena cursor {cursor} out of range")));
    }
    Ok(cursor as usize)
}

/// Persist an arena's bytes from offset 0 to its cursor. Allocated tail
/// capacity is never written.
pub(crate) fn write_arena_bytes<W: Write>(w: &mut W, arena: &ByteArena) -> Result<(), Error> {
    w.write_all(arena.bytes())?;
    Ok(())
}

/// Read exactly `len` raw arena bytes back. Entry structure is validated
/// by the caller's rebuild scan.
pub(crate) fn read_arena_bytes<R: Read>(r: &mut R, len: usize) -> Result<ByteArena, Error> {
    let mut buf = vec![0u8; len.min(PREALLOC_CAP)];
    r.read_exact(&mut buf)?;
    if len > PREALLOC_CAP {
        let mut rest = Vec::new();
        r.take((len - PREALLOC_CAP) as u64).read_to_end(&mut rest)?;
        if rest.len() != len - PREALLOC_CAP {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        buf.extend_from_slice(&rest);
    }
    Ok(ByteArena::from_raw(buf))
}

/// Length-prefixed string: `u32` byte length, then UTF-8 bytes.
pub(crate) fn write_str<W: Write>(w: &mut W, s: &str) -> Result<(), Error> {
    let len = u32::try_from(s.len()).expect("spilled string length fits u32");
    w.write_u32::<LittleEndian>(len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub(crate) fn read_str<R: Read>(r: &mut R) -> Result<String, Error> {
    let len = r.read_u32::<LittleEndian>()? as usize;
    let mut bytes = vec![0u8; len.min(PREALLOC_CAP)];
    r.read_exact(&mut bytes)?;
    if len > PREALLOC_CAP {
        let mut rest = Vec::new();
        r.take((len - PREALLOC_CAP) as u64).read_to_end(&mut rest)?;
        if rest.len() != len - PREALLOC_CAP {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        bytes.extend_from_slice(&rest);
    }
    String::from_utf8(bytes)
        .map_err(|e| Error::Corrupt(format!("spilled string is not valid UTF-8: {e}")))
}

/// Advance `pos` past dead bytes (tombstone residue reads as zero) and
/// return the next live entry's offset and length, or `None` once the
/// scan reaches the cursor. Dead runs are at least one byte, so the scan
/// always advances. Errors when a live entry has no terminator before
/// the cursor.
pub(crate) fn next_live_entry(bytes: &[u8], pos: &mut usize) -> Result<Option<(u32, usize)>, Error> {
    while *pos < bytes.len() && bytes[*pos] == 0 {
        *pos += 1;
    }
    if *pos >= bytes.len() {
        return Ok(None);
    }
    let start = *pos;
    let len = bytes[start..]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::Corrupt(format!("unterminated arena entry at offset {start}")))?;
    *pos = start + len + 1;
    Ok(Some((start as u32, len)))
}

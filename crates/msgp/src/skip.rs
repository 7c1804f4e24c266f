//! Value boundary detection over byte slices.
//!
//! Walks values iteratively with a pending-object counter, so nesting depth
//! never touches the call stack.

use crate::header::size_of;
use crate::Error;

/// Length in bytes of the first complete value in `b`.
pub fn measure(b: &[u8]) -> Result<usize, Error> {
    let mut offset = 0usize;
    let mut pending: u64 = 1;
    while pending > 0 {
        let size = size_of(&b[offset..])?;
        offset = offset
            .checked_add(size.bytes)
            .filter(|&end| end <= b.len())
            .ok_or(Error::UnexpectedEof)?;
        pending = pending - 1 + size.objects;
    }
    Ok(offset)
}

/// Splits `b` into the first complete value and everything after it.
pub fn split_next(b: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let n = measure(b)?;
    Ok(b.split_at(n))
}

/// Returns `b` with its first value removed.
pub fn skip(b: &[u8]) -> Result<&[u8], Error> {
    split_next(b).map(|(_, rest)| rest)
}

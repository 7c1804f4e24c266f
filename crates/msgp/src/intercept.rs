//! Field interception: lifts a raw value into a single-entry map.
//!
//! Lets a decoder hand the next value to a struct whose only field is named
//! `field` without knowing the value's type.

use tracing::trace;

use crate::constants::STR_PREFIX_SIZE;
use crate::{skip, Encoder, Error, Reader};

fn wrapper(field: &str, span_len: usize) -> Encoder {
    let mut en = Encoder::with_capacity(1 + STR_PREFIX_SIZE + field.len() + span_len);
    en.write_map_header(1);
    en.write_str(field);
    en
}

/// Returns `{field: <next value>}` and the bytes after the value.
///
/// The value's bytes are copied verbatim.
pub fn intercept_field<'a>(field: &str, b: &'a [u8]) -> Result<(Vec<u8>, &'a [u8]), Error> {
    let (span, rest) = skip::split_next(b)?;
    let mut en = wrapper(field, span.len());
    en.write_raw(span);
    trace!(field, span_len = span.len(), "intercepted field");
    Ok((en.into_vec(), rest))
}

impl Reader<'_> {
    /// Consumes the next value and returns `{field: <value>}`.
    pub fn intercept_field(&mut self, field: &str) -> Result<Vec<u8>, Error> {
        let mut out = wrapper(field, 0).into_vec();
        let header_len = out.len();
        self.append_next_value(&mut out)?;
        trace!(field, span_len = out.len() - header_len, "intercepted field");
        Ok(out)
    }
}

//! Any envelopes: polymorphic values tagged with their registered type id.
//!
//! An envelope is a single MessagePack binary whose payload is a big-endian
//! `u16` type id followed by the value's own encoding. Type id 0 marks an
//! absent value. Because the envelope is an ordinary binary, readers that do
//! not know the type can still skip it.

use tracing::trace;

use crate::constants::BIN_PREFIX_SIZE;
use crate::decoder::read_bin_bytes;
use crate::encoder::checked_len;
use crate::registry::NIL_TYPE_ID;
use crate::{Context, Encoder, Error, Message, Reader, Writer};

/// An optional polymorphic value, as stored in an Any field.
pub type AnyValue = Option<Box<dyn Message>>;

/// Bytes used by the type id inside an envelope.
pub const ANY_ID_SIZE: usize = 2;

/// Upper bound of the envelope overhead around a value.
pub const ANY_HEADER_SIZE: usize = BIN_PREFIX_SIZE + ANY_ID_SIZE;

impl Context {
    /// Appends the envelope of `value` to `en`.
    ///
    /// `self` is the [current](Context::current) context while `value`
    /// encodes, so nested Any fields use the same registry.
    pub fn marshal_any(&self, value: Option<&dyn Message>, en: &mut Encoder) -> Result<(), Error> {
        let Some(value) = value else {
            en.write_bin(&NIL_TYPE_ID.to_be_bytes());
            return Ok(());
        };
        let id = self.registry().identify(value)?;

        let mut scratch = self.scratch().acquire();
        let mut staged = Encoder::from_vec(scratch.take());
        staged.write_raw(&id.to_be_bytes());
        let result = {
            let _active = self.enter();
            value.marshal_msg(&mut staged)
        };
        scratch.restore(staged.into_vec());
        result?;

        en.write_bin_header(checked_len(scratch.len())?);
        en.write_raw(&scratch);
        Ok(())
    }

    /// Writes the envelope of `value` to a stream writer.
    pub fn encode_any(&self, value: Option<&dyn Message>, en: &mut Writer<'_>) -> Result<(), Error> {
        self.marshal_any(value, en)
    }

    /// Decodes an envelope from the front of `bts` and returns the value and
    /// the remainder.
    ///
    /// Bytes after the value inside the envelope are ignored.
    pub fn unmarshal_any<'b>(&self, bts: &'b [u8]) -> Result<(AnyValue, &'b [u8]), Error> {
        let (blob, rest) = read_bin_bytes(bts)?;
        Ok((self.open(blob)?, rest))
    }

    /// Reads an envelope from a stream reader.
    pub fn decode_any(&self, dc: &mut Reader<'_>) -> Result<AnyValue, Error> {
        let mut scratch = self.scratch().acquire();
        dc.read_bin_into(&mut scratch)?;
        self.open(&scratch)
    }

    /// Upper bound on the encoded size of the envelope of `value`.
    pub fn any_size(&self, value: Option<&dyn Message>) -> usize {
        ANY_HEADER_SIZE + value.map_or(0, |v| v.msg_size())
    }

    fn open(&self, blob: &[u8]) -> Result<AnyValue, Error> {
        if blob.len() < ANY_ID_SIZE {
            return Ok(None);
        }
        let id = u16::from_be_bytes([blob[0], blob[1]]);
        if id == NIL_TYPE_ID {
            return Ok(None);
        }
        let mut value = self.registry().resolve(id)?;
        {
            let _active = self.enter();
            value.unmarshal_msg(&blob[ANY_ID_SIZE..])?;
        }
        trace!(id, type_name = value.type_name(), "decoded any envelope");
        Ok(Some(value))
    }
}

/// Registers `T` under `id` in the global context.
///
/// # Panics
///
/// See [`Registry::register`](crate::Registry::register).
pub fn register_any<T: Message + Default>(id: u16) {
    Context::global().register::<T>(id);
}

/// [`Context::marshal_any`] on the [current](Context::current) context.
pub fn marshal_any(value: Option<&dyn Message>, en: &mut Encoder) -> Result<(), Error> {
    Context::current().marshal_any(value, en)
}

/// [`Context::encode_any`] on the [current](Context::current) context.
pub fn encode_any(value: Option<&dyn Message>, en: &mut Writer<'_>) -> Result<(), Error> {
    Context::current().encode_any(value, en)
}

/// [`Context::unmarshal_any`] on the [current](Context::current) context.
pub fn unmarshal_any(bts: &[u8]) -> Result<(AnyValue, &[u8]), Error> {
    Context::current().unmarshal_any(bts)
}

/// [`Context::decode_any`] on the [current](Context::current) context.
pub fn decode_any(dc: &mut Reader<'_>) -> Result<AnyValue, Error> {
    Context::current().decode_any(dc)
}

/// [`Context::any_size`] on the [current](Context::current) context.
pub fn any_size(value: Option<&dyn Message>) -> usize {
    Context::current().any_size(value)
}

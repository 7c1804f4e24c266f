//! The [`Message`] capability and whole-message helpers.

use std::any::Any;
use std::fmt;
use std::io::{Read, Write};

use crate::{Encoder, Error, Reader, Writer};

/// A type that can encode and decode itself as MessagePack.
///
/// Implementations usually come from a code generator. Every type stored in
/// an Any field implements this trait and is registered under a type id.
pub trait Message: Any + Send + Sync {
    /// Appends the encoded form of `self` to `en`.
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error>;

    /// Decodes `self` from the front of `bts` and returns the remainder.
    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error>;

    /// Writes the encoded form of `self` to a stream writer.
    fn encode_msg(&self, en: &mut Writer<'_>) -> Result<(), Error> {
        self.marshal_msg(en)
    }

    /// Reads `self` from a stream reader.
    fn decode_msg(&mut self, dc: &mut Reader<'_>) -> Result<(), Error> {
        let raw = dc.next_value()?;
        self.unmarshal_msg(&raw)?;
        Ok(())
    }

    /// Upper bound on the encoded size of `self`.
    fn msg_size(&self) -> usize;

    /// Name used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Message {
    pub fn is<T: Message>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Message>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }

    /// Converts the box into a concrete type, handing it back unchanged on
    /// a type mismatch.
    pub fn downcast<T: Message>(self: Box<Self>) -> Result<Box<T>, Box<dyn Message>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type id checked above"),
        }
    }
}

impl fmt::Debug for dyn Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message").field(&self.type_name()).finish()
    }
}

/// Encodes `msg` into a fresh buffer.
pub fn marshal<M: Message + ?Sized>(msg: &M) -> Result<Vec<u8>, Error> {
    let mut en = Encoder::with_capacity(msg.msg_size());
    msg.marshal_msg(&mut en)?;
    Ok(en.into_vec())
}

/// Decodes `msg` from `bts` and returns the unread remainder.
pub fn unmarshal<'b, M: Message + ?Sized>(msg: &mut M, bts: &'b [u8]) -> Result<&'b [u8], Error> {
    msg.unmarshal_msg(bts)
}

/// Writes `msg` to `w` and flushes it.
pub fn encode<M: Message + ?Sized>(w: impl Write, msg: &M) -> Result<(), Error> {
    let mut en = Writer::new(w);
    msg.encode_msg(&mut en)?;
    en.flush()
}

/// Reads one `msg` from `r`.
///
/// The reader buffers ahead, so bytes after the message may be consumed from
/// `r`. Keep a [`Reader`] around to decode several messages from one stream.
pub fn decode<M: Message + ?Sized>(r: impl Read, msg: &mut M) -> Result<(), Error> {
    let mut dc = Reader::new(r);
    msg.decode_msg(&mut dc)
}

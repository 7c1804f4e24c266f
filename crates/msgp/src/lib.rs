//! MessagePack runtime.
//!
//! - [`Encoder`] / [`Decoder`]: append-style encoding and zero-copy decoding
//!   over byte slices.
//! - [`Reader`] / [`Writer`]: the same over `std::io` streams.
//! - [`skip`]: iterative value-boundary detection, safe for any nesting depth.
//! - [`Message`] and [`Registry`]: self-describing types addressed by a
//!   16-bit type id.
//! - Any envelopes ([`marshal_any`], [`unmarshal_any`], ...): polymorphic
//!   values that unaware readers can still skip.
//! - [`intercept_field`]: wraps the next value as a single-entry map.
//!
//! # Example
//!
//! ```
//! use msgp::{Context, Decoder, Encoder, Error, Message};
//!
//! #[derive(Debug, Default)]
//! struct Ping {
//!     seq: u64,
//! }
//!
//! impl Message for Ping {
//!     fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
//!         en.write_uint(self.seq);
//!         Ok(())
//!     }
//!
//!     fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
//!         let mut dc = Decoder::new(bts);
//!         self.seq = dc.read_uint()?;
//!         Ok(dc.remaining())
//!     }
//!
//!     fn msg_size(&self) -> usize {
//!         msgp::UINT_SIZE
//!     }
//! }
//!
//! let ctx = Context::default();
//! ctx.register::<Ping>(7);
//!
//! let mut en = Encoder::new();
//! ctx.marshal_any(Some(&Ping { seq: 42 }), &mut en).unwrap();
//!
//! let (value, rest) = ctx.unmarshal_any(en.as_slice()).unwrap();
//! assert!(rest.is_empty());
//! assert_eq!(value.unwrap().downcast_ref::<Ping>().unwrap().seq, 42);
//! ```

pub mod any;
pub mod config;
pub mod constants;
pub mod context;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod intercept;
pub mod message;
pub mod registry;
pub mod scratch;
pub mod skip;
pub mod stream;
pub mod value;

pub use any::{
    any_size, decode_any, encode_any, marshal_any, register_any, unmarshal_any, AnyValue,
    ANY_HEADER_SIZE,
};
pub use config::Config;
pub use constants::{
    WireType, ARRAY_HEADER_SIZE, BIN_PREFIX_SIZE, BOOL_SIZE, F32_SIZE, F64_SIZE, INT_SIZE,
    MAP_HEADER_SIZE, NIL_SIZE, STR_PREFIX_SIZE, UINT_SIZE,
};
pub use context::{ActiveContext, Context};
pub use decoder::{
    read_array_header_bytes, read_bin_bytes, read_bool_bytes, read_f64_bytes, read_int_bytes,
    read_map_header_bytes, read_map_key_bytes, read_nil_bytes, read_str_bytes, read_uint_bytes,
    read_value_bytes, Decoder,
};
pub use encoder::Encoder;
pub use error::Error;
pub use intercept::intercept_field;
pub use message::{decode, encode, marshal, unmarshal, Message};
pub use registry::{Registry, NIL_TYPE_ID};
pub use scratch::{Scratch, ScratchPool};
pub use stream::{Reader, Writer};
pub use value::Value;

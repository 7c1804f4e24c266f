//! Message types shaped like generated code, shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{self, Read};

use msgp::skip;
use msgp::{
    any_size, decode_any, intercept_field, marshal_any, read_array_header_bytes,
    read_map_header_bytes, read_map_key_bytes, read_str_bytes, register_any, unmarshal_any,
    AnyValue, Encoder, Error, Message, Reader, Value, ARRAY_HEADER_SIZE, MAP_HEADER_SIZE,
    STR_PREFIX_SIZE,
};
use proptest::prelude::*;

/// Type id `GridView` is registered under in the global context.
pub const GRID_VIEW_ID: u16 = b'g' as u16;

/// Registers every fixture type in the global context. Idempotent.
pub fn init() {
    register_any::<GridView>(GRID_VIEW_ID);
}

/// Hands out one byte per `read` call.
pub struct Trickle<'a>(pub &'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.0[0];
        self.0 = &self.0[1..];
        Ok(1)
    }
}

fn str_size(s: &str) -> usize {
    STR_PREFIX_SIZE + s.len()
}

fn strs_size(items: &[String]) -> usize {
    ARRAY_HEADER_SIZE + items.iter().map(|s| str_size(s)).sum::<usize>()
}

fn write_strs(en: &mut Encoder, items: &[String]) {
    en.write_array_header(items.len() as u32);
    for s in items {
        en.write_str(s);
    }
}

fn read_strs(bts: &[u8]) -> Result<(Vec<String>, &[u8]), Error> {
    let (n, mut bts) = read_array_header_bytes(bts)?;
    let mut items = Vec::with_capacity(n as usize);
    for _ in 0..n {
        let (s, rest) = read_str_bytes(bts)?;
        items.push(s.to_owned());
        bts = rest;
    }
    Ok((items, bts))
}

fn decode_strs(dc: &mut Reader<'_>) -> Result<Vec<String>, Error> {
    let n = dc.read_array_header()?;
    (0..n).map(|_| dc.read_string()).collect()
}

fn field_name(key: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(key).map_err(|_| Error::InvalidUtf8)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GridView {
    pub test_field: String,
}

impl Message for GridView {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(1);
        en.write_str("TestField");
        en.write_str(&self.test_field);
        Ok(())
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"TestField" => {
                    let (s, rest) = read_str_bytes(rest)?;
                    self.test_field = s.to_owned();
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn decode_msg(&mut self, dc: &mut Reader<'_>) -> Result<(), Error> {
        let n = dc.read_map_header()?;
        for _ in 0..n {
            match dc.read_map_key()?.as_str() {
                "TestField" => self.test_field = dc.read_string()?,
                _ => dc.skip()?,
            }
        }
        Ok(())
    }

    fn msg_size(&self) -> usize {
        1 + str_size("TestField") + str_size(&self.test_field)
    }
}

/// Writer-side struct with flat fields.
#[derive(Debug, Default)]
pub struct E1 {
    pub a: String,
    pub b: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub j: AnyValue,
}

impl Message for E1 {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(5);
        en.write_str("A");
        en.write_str(&self.a);
        en.write_str("B");
        en.write_str(&self.b);
        en.write_str("H1");
        write_strs(en, &self.h1);
        en.write_str("H2");
        write_strs(en, &self.h2);
        en.write_str("J");
        marshal_any(self.j.as_deref(), en)
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"A" | b"B" => {
                    let (s, rest) = read_str_bytes(rest)?;
                    if key == b"A" {
                        self.a = s.to_owned();
                    } else {
                        self.b = s.to_owned();
                    }
                    rest
                }
                b"H1" => {
                    let (items, rest) = read_strs(rest)?;
                    self.h1 = items;
                    rest
                }
                b"H2" => {
                    let (items, rest) = read_strs(rest)?;
                    self.h2 = items;
                    rest
                }
                b"J" => {
                    let (value, rest) = unmarshal_any(rest)?;
                    self.j = value;
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn decode_msg(&mut self, dc: &mut Reader<'_>) -> Result<(), Error> {
        let n = dc.read_map_header()?;
        for _ in 0..n {
            match dc.read_map_key()?.as_str() {
                "A" => self.a = dc.read_string()?,
                "B" => self.b = dc.read_string()?,
                "H1" => self.h1 = decode_strs(dc)?,
                "H2" => self.h2 = decode_strs(dc)?,
                "J" => self.j = decode_any(dc)?,
                _ => dc.skip()?,
            }
        }
        Ok(())
    }

    fn msg_size(&self) -> usize {
        MAP_HEADER_SIZE
            + str_size("A")
            + str_size(&self.a)
            + str_size("B")
            + str_size(&self.b)
            + str_size("H1")
            + strs_size(&self.h1)
            + str_size("H2")
            + strs_size(&self.h2)
            + str_size("J")
            + any_size(self.j.as_deref())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct F {
    pub b: String,
}

impl Message for F {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(1);
        en.write_str("B");
        en.write_str(&self.b);
        Ok(())
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"B" => {
                    let (s, rest) = read_str_bytes(rest)?;
                    self.b = s.to_owned();
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn msg_size(&self) -> usize {
        1 + str_size("B") + str_size(&self.b)
    }
}

/// Struct that embeds `F` and receives `B` through an intercepted field.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct G {
    pub f: F,
    pub h1: Vec<String>,
    pub h2: Vec<String>,
}

impl Message for G {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(3);
        en.write_str("B");
        en.write_str(&self.f.b);
        en.write_str("H1");
        write_strs(en, &self.h1);
        en.write_str("H2");
        write_strs(en, &self.h2);
        Ok(())
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"B" => {
                    let (wrapped, rest) = intercept_field("B", rest)?;
                    self.f.unmarshal_msg(&wrapped)?;
                    rest
                }
                b"H1" => {
                    let (items, rest) = read_strs(rest)?;
                    self.h1 = items;
                    rest
                }
                b"H2" => {
                    let (items, rest) = read_strs(rest)?;
                    self.h2 = items;
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn decode_msg(&mut self, dc: &mut Reader<'_>) -> Result<(), Error> {
        let n = dc.read_map_header()?;
        for _ in 0..n {
            match dc.read_map_key()?.as_str() {
                "B" => {
                    let wrapped = dc.intercept_field("B")?;
                    self.f.unmarshal_msg(&wrapped)?;
                }
                "H1" => self.h1 = decode_strs(dc)?,
                "H2" => self.h2 = decode_strs(dc)?,
                _ => dc.skip()?,
            }
        }
        Ok(())
    }

    fn msg_size(&self) -> usize {
        1 + str_size("B")
            + str_size(&self.f.b)
            + str_size("H1")
            + strs_size(&self.h1)
            + str_size("H2")
            + strs_size(&self.h2)
    }
}

/// Reader-side struct: `G` and `F` are embedded, so their keys arrive flat
/// and are routed to them as single-entry maps.
#[derive(Debug, Default)]
pub struct E2 {
    pub g: G,
    pub a: String,
    pub f: Option<F>,
    pub j: AnyValue,
}

impl E2 {
    fn route(&mut self, key: &str, wrapped: &[u8]) -> Result<(), Error> {
        self.g.unmarshal_msg(wrapped)?;
        if key == "B" {
            self.f.get_or_insert_with(F::default).unmarshal_msg(wrapped)?;
        }
        Ok(())
    }
}

impl Message for E2 {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(5);
        en.write_str("A");
        en.write_str(&self.a);
        en.write_str("B");
        en.write_str(self.f.as_ref().map_or(self.g.f.b.as_str(), |f| f.b.as_str()));
        en.write_str("H1");
        write_strs(en, &self.g.h1);
        en.write_str("H2");
        write_strs(en, &self.g.h2);
        en.write_str("J");
        marshal_any(self.j.as_deref(), en)
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"A" => {
                    let (s, rest) = read_str_bytes(rest)?;
                    self.a = s.to_owned();
                    rest
                }
                b"B" | b"H1" | b"H2" => {
                    let field = field_name(key)?;
                    let (wrapped, rest) = intercept_field(field, rest)?;
                    self.route(field, &wrapped)?;
                    rest
                }
                b"J" => {
                    let (value, rest) = unmarshal_any(rest)?;
                    self.j = value;
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn decode_msg(&mut self, dc: &mut Reader<'_>) -> Result<(), Error> {
        let n = dc.read_map_header()?;
        for _ in 0..n {
            let key = dc.read_map_key()?;
            match key.as_str() {
                "A" => self.a = dc.read_string()?,
                "B" | "H1" | "H2" => {
                    let wrapped = dc.intercept_field(&key)?;
                    self.route(&key, &wrapped)?;
                }
                "J" => self.j = decode_any(dc)?,
                _ => dc.skip()?,
            }
        }
        Ok(())
    }

    fn msg_size(&self) -> usize {
        MAP_HEADER_SIZE
            + str_size("A")
            + str_size(&self.a)
            + str_size("B")
            + str_size(&self.g.f.b).max(self.f.as_ref().map_or(0, |f| str_size(&f.b)))
            + str_size("H1")
            + strs_size(&self.g.h1)
            + str_size("H2")
            + strs_size(&self.g.h2)
            + str_size("J")
            + any_size(self.j.as_deref())
    }
}

/// Any values in every container shape.
#[derive(Debug, Default)]
pub struct Table {
    pub a: AnyValue,
    pub b: [AnyValue; 5],
    pub c: Vec<AnyValue>,
    pub d: BTreeMap<String, AnyValue>,
    pub e: BTreeMap<String, Vec<AnyValue>>,
}

fn marshal_anys(en: &mut Encoder, items: &[AnyValue]) -> Result<(), Error> {
    en.write_array_header(items.len() as u32);
    for item in items {
        marshal_any(item.as_deref(), en)?;
    }
    Ok(())
}

fn unmarshal_anys(bts: &[u8]) -> Result<(Vec<AnyValue>, &[u8]), Error> {
    let (n, mut bts) = read_array_header_bytes(bts)?;
    let mut items = Vec::with_capacity((n as usize).min(bts.len()));
    for _ in 0..n {
        let (value, rest) = unmarshal_any(bts)?;
        items.push(value);
        bts = rest;
    }
    Ok((items, bts))
}

fn anys_size(items: &[AnyValue]) -> usize {
    ARRAY_HEADER_SIZE + items.iter().map(|v| any_size(v.as_deref())).sum::<usize>()
}

impl Message for Table {
    fn marshal_msg(&self, en: &mut Encoder) -> Result<(), Error> {
        en.write_map_header(5);
        en.write_str("A");
        marshal_any(self.a.as_deref(), en)?;
        en.write_str("B");
        marshal_anys(en, &self.b)?;
        en.write_str("C");
        marshal_anys(en, &self.c)?;
        en.write_str("D");
        en.write_map_header(self.d.len() as u32);
        for (k, v) in &self.d {
            en.write_str(k);
            marshal_any(v.as_deref(), en)?;
        }
        en.write_str("E");
        en.write_map_header(self.e.len() as u32);
        for (k, v) in &self.e {
            en.write_str(k);
            marshal_anys(en, v)?;
        }
        Ok(())
    }

    fn unmarshal_msg<'b>(&mut self, bts: &'b [u8]) -> Result<&'b [u8], Error> {
        let (n, mut bts) = read_map_header_bytes(bts)?;
        for _ in 0..n {
            let (key, rest) = read_map_key_bytes(bts)?;
            bts = match key {
                b"A" => {
                    let (value, rest) = unmarshal_any(rest)?;
                    self.a = value;
                    rest
                }
                b"B" => {
                    let (items, rest) = unmarshal_anys(rest)?;
                    self.b = Default::default();
                    for (slot, item) in self.b.iter_mut().zip(items) {
                        *slot = item;
                    }
                    rest
                }
                b"C" => {
                    let (items, rest) = unmarshal_anys(rest)?;
                    self.c = items;
                    rest
                }
                b"D" => {
                    let (entries, mut rest) = read_map_header_bytes(rest)?;
                    self.d.clear();
                    for _ in 0..entries {
                        let (k, after_key) = read_str_bytes(rest)?;
                        let (value, after_value) = unmarshal_any(after_key)?;
                        self.d.insert(k.to_owned(), value);
                        rest = after_value;
                    }
                    rest
                }
                b"E" => {
                    let (entries, mut rest) = read_map_header_bytes(rest)?;
                    self.e.clear();
                    for _ in 0..entries {
                        let (k, after_key) = read_str_bytes(rest)?;
                        let (items, after_value) = unmarshal_anys(after_key)?;
                        self.e.insert(k.to_owned(), items);
                        rest = after_value;
                    }
                    rest
                }
                _ => skip::skip(rest)?,
            };
        }
        Ok(bts)
    }

    fn msg_size(&self) -> usize {
        MAP_HEADER_SIZE
            + 5 * str_size("A")
            + any_size(self.a.as_deref())
            + anys_size(&self.b)
            + anys_size(&self.c)
            + MAP_HEADER_SIZE
            + self
                .d
                .iter()
                .map(|(k, v)| str_size(k) + any_size(v.as_deref()))
                .sum::<usize>()
            + MAP_HEADER_SIZE
            + self
                .e
                .iter()
                .map(|(k, v)| str_size(k) + anys_size(v))
                .sum::<usize>()
    }
}

pub fn grid(s: &str) -> AnyValue {
    Some(Box::new(GridView {
        test_field: s.to_owned(),
    }))
}

/// Reads the `test_field` of an Any holding a `GridView`.
pub fn grid_field(value: &AnyValue) -> Option<&str> {
    value
        .as_deref()?
        .downcast_ref::<GridView>()
        .map(|g| g.test_field.as_str())
}

/// Canonical values: decoding their encoding yields an equal tree.
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        (i64::MIN..0i64).prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1.0e9f64..1.0e9).prop_map(Value::F64),
        ".{0,40}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..300).prop_map(Value::Bin),
        (any::<i8>(), proptest::collection::vec(any::<u8>(), 0..20))
            .prop_map(|(tag, data)| Value::Ext(tag, data)),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            proptest::collection::vec((inner.clone(), inner), 0..8).prop_map(Value::Map),
        ]
    })
}

//! Minimal Avro-style binary pipeline used to exercise the conversion hooks
//!
//! Supports booleans, zig-zag varint `int`/`long`, length-prefixed strings,
//! `fixed` (raw or `decimal`), single-block arrays, and records. Every slot
//! goes through the encoder registry before it is written and, when decoded
//! into a dynamic slot, through the decoder registry after it is read.

#![allow(dead_code)]

use std::collections::HashMap;

use tedium_conv::{
    ConversionError, Decimal, DecimalError, DecoderTypeConverter, EncoderTypeConverter,
    LogicalType, Schema, TypeTag, TypedSlot, Value,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Decimal(#[from] DecimalError),
    #[error("cannot encode value of type `{found}` as {expected}")]
    Type { expected: TypeTag, found: &'static str },
    #[error("fixed value of {actual} bytes does not match size {size}")]
    FixedSize { size: usize, actual: usize },
    #[error("record field `{0}` missing")]
    MissingField(String),
    #[error("unexpected end of input")]
    Eof,
    #[error("malformed varint")]
    Varint,
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone)]
pub enum Kind {
    Boolean,
    Int,
    Long,
    Str,
    Fixed { size: usize, scale: Option<u32> },
    Array(Box<TestSchema>),
    Record(Vec<(String, TestSchema)>),
}

#[derive(Debug, Clone)]
pub struct TestSchema {
    base: TypeTag,
    logical: Option<LogicalType>,
    kind: Kind,
}

impl Schema for TestSchema {
    fn base_type(&self) -> &TypeTag {
        &self.base
    }

    fn logical_type(&self) -> Option<&LogicalType> {
        self.logical.as_ref()
    }
}

impl TestSchema {
    fn plain(base: TypeTag, kind: Kind) -> Self {
        Self { base, logical: None, kind }
    }

    pub fn boolean() -> Self {
        Self::plain(TypeTag::BOOLEAN, Kind::Boolean)
    }

    pub fn int() -> Self {
        Self::plain(TypeTag::INT, Kind::Int)
    }

    pub fn long() -> Self {
        Self::plain(TypeTag::LONG, Kind::Long)
    }

    pub fn string() -> Self {
        Self::plain(TypeTag::STRING, Kind::Str)
    }

    pub fn fixed(size: usize) -> Self {
        Self::plain(TypeTag::FIXED, Kind::Fixed { size, scale: None })
    }

    pub fn fixed_decimal(size: usize, scale: u32) -> Self {
        Self {
            base: TypeTag::FIXED,
            logical: Some(LogicalType::DECIMAL),
            kind: Kind::Fixed { size, scale: Some(scale) },
        }
    }

    pub fn array(items: TestSchema) -> Self {
        Self::plain(TypeTag::ARRAY, Kind::Array(Box::new(items)))
    }

    pub fn record(fields: Vec<(&str, TestSchema)>) -> Self {
        let fields = fields.into_iter().map(|(n, s)| (n.to_owned(), s)).collect();
        Self::plain(TypeTag::RECORD, Kind::Record(fields))
    }
}

fn mismatch(schema: &TestSchema, val: &Value) -> PipelineError {
    PipelineError::Type {
        expected: schema.specific_type().into_owned(),
        found: val.type_name(),
    }
}

fn write_long(n: i64, buf: &mut Vec<u8>) {
    let mut z = ((n << 1) ^ (n >> 63)) as u64;
    while z >= 0x80 {
        buf.push((z as u8 & 0x7f) | 0x80);
        z >>= 7;
    }
    buf.push(z as u8);
}

fn read_long(input: &mut &[u8]) -> PipelineResult<i64> {
    let mut z: u64 = 0;
    for shift in (0..64).step_by(7) {
        let buf: &[u8] = *input;
        let (&b, rest) = buf.split_first().ok_or(PipelineError::Eof)?;
        *input = rest;
        z |= u64::from(b & 0x7f) << shift;
        if b & 0x80 == 0 {
            return Ok((z >> 1) as i64 ^ -((z & 1) as i64));
        }
    }
    Err(PipelineError::Varint)
}

fn read_exact<'a>(input: &mut &'a [u8], n: usize) -> PipelineResult<&'a [u8]> {
    if input.len() < n {
        return Err(PipelineError::Eof);
    }
    let buf: &'a [u8] = *input;
    let (head, rest) = buf.split_at(n);
    *input = rest;
    Ok(head)
}

/// Encoder bound to one schema and one registry
pub struct Encoder<'a> {
    schema: TestSchema,
    conv: &'a EncoderTypeConverter,
}

impl<'a> Encoder<'a> {
    pub fn new(schema: TestSchema, conv: &'a EncoderTypeConverter) -> Self {
        Self { schema, conv }
    }

    /// Appends the encoding of `val` to `out`; nothing is appended on failure.
    pub fn encode(&self, val: Value, out: &mut Vec<u8>) -> PipelineResult<()> {
        let mut scratch = Vec::new();
        self.write(&self.schema, val, &mut scratch)?;
        out.extend_from_slice(&scratch);
        Ok(())
    }

    fn write(&self, schema: &TestSchema, val: Value, buf: &mut Vec<u8>) -> PipelineResult<()> {
        let val = self.conv.convert(val, schema)?;
        match &schema.kind {
            Kind::Boolean => match val.downcast_ref::<bool>() {
                Some(&b) => buf.push(b as u8),
                None => return Err(mismatch(schema, &val)),
            },
            Kind::Int => match val.downcast_ref::<i32>() {
                Some(&i) => write_long(i64::from(i), buf),
                None => return Err(mismatch(schema, &val)),
            },
            Kind::Long => match val.downcast_ref::<i64>() {
                Some(&i) => write_long(i, buf),
                None => return Err(mismatch(schema, &val)),
            },
            Kind::Str => {
                let s: &str = if let Some(s) = val.downcast_ref::<String>() {
                    s
                } else if let Some(s) = val.downcast_ref::<&'static str>() {
                    s
                } else {
                    return Err(mismatch(schema, &val));
                };
                write_long(s.len() as i64, buf);
                buf.extend_from_slice(s.as_bytes());
            }
            Kind::Fixed { size, scale: Some(scale) } => match val.downcast_ref::<Decimal>() {
                Some(d) => buf.extend(d.rescale(*scale)?.to_fixed_bytes(*size)?),
                None => return Err(mismatch(schema, &val)),
            },
            Kind::Fixed { size, scale: None } => match val.downcast_ref::<Vec<u8>>() {
                Some(bytes) if bytes.len() == *size => buf.extend_from_slice(bytes),
                Some(bytes) => {
                    return Err(PipelineError::FixedSize {
                        size: *size,
                        actual: bytes.len(),
                    })
                }
                None => return Err(mismatch(schema, &val)),
            },
            Kind::Array(items) => {
                let elems = val.downcast::<Vec<Value>>().map_err(|v| mismatch(schema, &v))?;
                if !elems.is_empty() {
                    write_long(elems.len() as i64, buf);
                    for elem in elems {
                        self.write(items, elem, buf)?;
                    }
                }
                buf.push(0);
            }
            Kind::Record(fields) => {
                let mut map = val
                    .downcast::<HashMap<String, Value>>()
                    .map_err(|v| mismatch(schema, &v))?;
                for (name, field) in fields {
                    let fv = map
                        .remove(name)
                        .ok_or_else(|| PipelineError::MissingField(name.clone()))?;
                    self.write(field, fv, buf)?;
                }
            }
        }
        Ok(())
    }
}

/// Decoder bound to one schema and one registry
pub struct Decoder<'a> {
    schema: TestSchema,
    conv: &'a DecoderTypeConverter,
}

impl<'a> Decoder<'a> {
    pub fn new(schema: TestSchema, conv: &'a DecoderTypeConverter) -> Self {
        Self { schema, conv }
    }

    /// Decodes one value into a dynamic slot, applying decode conversions.
    pub fn decode(&self, input: &mut &[u8], slot: &mut Option<Value>) -> PipelineResult<()> {
        self.read(&self.schema, input, slot)
    }

    /// Decodes a `long` straight into a typed slot; conversions never apply.
    pub fn decode_long_typed(&self, input: &mut &[u8]) -> PipelineResult<i64> {
        let mut slot = TypedSlot(read_long(input)?);
        self.conv.convert(&self.schema, &mut slot)?;
        Ok(slot.into_inner())
    }

    fn read(&self, schema: &TestSchema, input: &mut &[u8], slot: &mut Option<Value>) -> PipelineResult<()> {
        let natural = match &schema.kind {
            Kind::Boolean => Value::new(read_exact(input, 1)?[0] != 0),
            Kind::Int => Value::new(read_long(input)? as i32),
            Kind::Long => Value::new(read_long(input)?),
            Kind::Str => {
                let len = read_long(input)? as usize;
                Value::new(String::from_utf8_lossy(read_exact(input, len)?).into_owned())
            }
            Kind::Fixed { size, scale: Some(scale) } => {
                Value::new(Decimal::from_be_bytes(read_exact(input, *size)?, *scale))
            }
            Kind::Fixed { size, scale: None } => Value::new(read_exact(input, *size)?.to_vec()),
            Kind::Array(items) => {
                let mut elems = Vec::new();
                loop {
                    let count = read_long(input)?;
                    if count == 0 {
                        break;
                    }
                    for _ in 0..count {
                        let mut elem = None;
                        self.read(items, input, &mut elem)?;
                        elems.extend(elem);
                    }
                }
                Value::new(elems)
            }
            Kind::Record(fields) => {
                let mut map = HashMap::new();
                for (name, field) in fields {
                    let mut fv = None;
                    self.read(field, input, &mut fv)?;
                    if let Some(fv) = fv {
                        map.insert(name.clone(), fv);
                    }
                }
                Value::new(map)
            }
        };
        *slot = Some(natural);
        self.conv.convert(schema, slot)?;
        Ok(())
    }
}

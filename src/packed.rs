//! Packed value arrays
//!
//! Raw signal traces, script steps and packets are stored as element text
//! holding Base64 of fixed-width little-endian values. Two attributes
//! describe the body:
//!
//! ```xml
//! <RawSignal numvalues="3" vartype="LE_R4">AACAPwAAAEAAAEBA</RawSignal>
//! ```
//!
//! The decoder:
//!
//! 1. Base64 decodes the text
//! 2. Checks the byte length against `numvalues × width`
//! 3. Reinterprets the bytes as the declared numeric kind

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::encoding::decode_base64;
use crate::error::{Result, XadError};
use crate::xml::RawElement;

/// Element type of a packed array, from the `vartype` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackedValueType {
    /// `LE_R4`: 32-bit IEEE float, little-endian
    Float32,
    /// `LE_I2`: 16-bit signed integer, little-endian
    Int16,
    /// `LE_UI1`: unsigned byte
    UInt8,
}

impl PackedValueType {
    /// Resolve a `vartype` attribute value
    pub fn from_vartype(vartype: &str) -> Result<Self> {
        match vartype {
            "LE_R4" => Ok(PackedValueType::Float32),
            "LE_I2" => Ok(PackedValueType::Int16),
            "LE_UI1" => Ok(PackedValueType::UInt8),
            other => Err(XadError::UnsupportedPackedValueType(other.to_string())),
        }
    }

    /// The `vartype` spelling of this type
    pub fn vartype(&self) -> &'static str {
        match self {
            PackedValueType::Float32 => "LE_R4",
            PackedValueType::Int16 => "LE_I2",
            PackedValueType::UInt8 => "LE_UI1",
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            PackedValueType::Float32 => 4,
            PackedValueType::Int16 => 2,
            PackedValueType::UInt8 => 1,
        }
    }
}

/// A decoded packed array, tagged by its numeric kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values")]
pub enum PackedArray {
    /// Values from an `LE_R4` body
    Float32(Vec<f32>),
    /// Values from an `LE_I2` body
    Int16(Vec<i16>),
    /// Values from an `LE_UI1` body
    UInt8(Vec<u8>),
}

impl PackedArray {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            PackedArray::Float32(v) => v.len(),
            PackedArray::Int16(v) => v.len(),
            PackedArray::UInt8(v) => v.len(),
        }
    }

    /// True if the array holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The numeric kind of the array
    pub fn value_type(&self) -> PackedValueType {
        match self {
            PackedArray::Float32(_) => PackedValueType::Float32,
            PackedArray::Int16(_) => PackedValueType::Int16,
            PackedArray::UInt8(_) => PackedValueType::UInt8,
        }
    }

    /// Borrow the values if this is a float array
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            PackedArray::Float32(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the values if this is an int16 array
    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            PackedArray::Int16(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the values if this is a byte array
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            PackedArray::UInt8(v) => Some(v),
            _ => None,
        }
    }

    /// Decode a Base64 body holding `num_values` values of `value_type`
    pub fn decode(base64_data: &str, value_type: PackedValueType, num_values: usize) -> Result<Self> {
        let bytes = decode_base64(base64_data)?;
        Self::from_le_bytes(&bytes, value_type, num_values)
    }

    /// Reinterpret little-endian bytes as `num_values` values of `value_type`
    pub fn from_le_bytes(bytes: &[u8], value_type: PackedValueType, num_values: usize) -> Result<Self> {
        let width = value_type.byte_size();
        if num_values.checked_mul(width) != Some(bytes.len()) {
            return Err(XadError::ArrayLengthMismatch {
                declared: num_values,
                width,
                actual_bytes: bytes.len(),
            });
        }

        let mut cursor = Cursor::new(bytes);
        let array = match value_type {
            PackedValueType::Float32 => {
                let mut values = vec![0f32; num_values];
                cursor.read_f32_into::<LittleEndian>(&mut values)?;
                PackedArray::Float32(values)
            }
            PackedValueType::Int16 => {
                let mut values = vec![0i16; num_values];
                cursor.read_i16_into::<LittleEndian>(&mut values)?;
                PackedArray::Int16(values)
            }
            PackedValueType::UInt8 => PackedArray::UInt8(bytes.to_vec()),
        };

        Ok(array)
    }

    /// Decode a packed-array element
    ///
    /// The element must carry `numvalues` and `vartype` and hold at most one
    /// text child with the Base64 body.
    pub fn from_element(element: &RawElement, context: &str) -> Result<Self> {
        let num_values = required_attribute(element, "numvalues")?;
        let num_values: usize = num_values.trim().parse().map_err(|_| {
            XadError::InvalidAttributeValue(format!(
                "numvalues=\"{}\" on <{}> is not a non-negative integer",
                num_values, element.name
            ))
        })?;
        let value_type = PackedValueType::from_vartype(required_attribute(element, "vartype")?)?;

        let body = crate::walker::element_text(element, context)?;
        let array = Self::decode(&body, value_type, num_values)?;

        log::trace!(
            "decoded <{}> as {} x {}",
            element.name,
            num_values,
            value_type.vartype()
        );
        Ok(array)
    }
}

fn required_attribute<'a>(element: &'a RawElement, attribute: &'static str) -> Result<&'a str> {
    element
        .attribute(attribute)
        .ok_or_else(|| XadError::MissingAttribute {
            element: element.name.clone(),
            attribute,
        })
}

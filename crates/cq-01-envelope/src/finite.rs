//! Non-finite number detection.
//!
//! JSON has no representation for NaN or infinities and `serde_json` writes
//! them as `null`. [`check_finite`] walks a value through serde and fails on
//! the first non-finite float so that such events are rejected instead of
//! being silently rewritten.

use serde::ser::{self, Serialize};
use std::fmt;

/// Why a value failed the walk.
#[derive(Debug)]
pub(crate) enum FiniteError {
    /// A NaN or infinite float was found.
    NonFinite(f64),
    /// The value's own `Serialize` impl failed.
    Custom(String),
}

impl fmt::Display for FiniteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(v) => write!(f, "non-finite number {v}"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FiniteError {}

impl ser::Error for FiniteError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Fail if `value` contains a NaN or infinite float anywhere.
pub(crate) fn check_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), FiniteError> {
    value.serialize(FiniteCheck)
}

#[derive(Clone, Copy)]
struct FiniteCheck;

type Walk = Result<(), FiniteError>;

fn float(v: f64) -> Walk {
    if v.is_finite() {
        Ok(())
    } else {
        Err(FiniteError::NonFinite(v))
    }
}

macro_rules! accept {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(fn $method(self, _v: $ty) -> Walk { Ok(()) })*
    };
}

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Walk {
        float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Walk {
        float(v)
    }

    fn serialize_none(self) -> Walk {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Walk {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Walk {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Walk {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Walk {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Walk {
        key.serialize(FiniteCheck)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _key: &'static str, value: &T) -> Walk {
        value.serialize(FiniteCheck)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

// Copyright (c) 2025 Sean McNamara <smcnam@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversion of loosely typed values into log text.
//!
//! Only text, characters, integers and floating point numbers have a textual
//! form. Everything else renders as [`UNSUPPORTED_PLACEHOLDER`] instead of
//! failing the append it is part of.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::constants::UNSUPPORTED_PLACEHOLDER;

/// A value that can be appended to a log line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Text(Cow<'a, str>),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Float32(f32),
    Unsupported,
}

macro_rules! downcast_number {
    ($value:expr, $variant:ident as $target:ty, $($ty:ty),+) => {
        $(
            if let Some(v) = $value.downcast_ref::<$ty>() {
                return Value::$variant(*v as $target);
            }
        )+
    };
}

impl<'a> Value<'a> {
    /// Classify an arbitrary value by its concrete type.
    ///
    /// Types outside the known set map to [`Value::Unsupported`].
    pub fn from_any(value: &'a dyn Any) -> Self {
        if let Some(s) = value.downcast_ref::<String>() {
            return Value::Text(Cow::Borrowed(s.as_str()));
        }
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Value::Text(Cow::Borrowed(*s));
        }
        if let Some(c) = value.downcast_ref::<char>() {
            return Value::Char(*c);
        }
        downcast_number!(value, Int as i64, i8, i16, i32, i64, isize);
        downcast_number!(value, UInt as u64, u8, u16, u32, u64, usize);
        downcast_number!(value, Float as f64, f64);
        downcast_number!(value, Float32 as f32, f32);
        Value::Unsupported
    }

    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_ref()),
            Value::Char(c) => Cow::Owned(c.to_string()),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::UInt(n) => Cow::Owned(n.to_string()),
            Value::Float(n) => Cow::Owned(n.to_string()),
            Value::Float32(n) => Cow::Owned(n.to_string()),
            Value::Unsupported => Cow::Borrowed(UNSUPPORTED_PLACEHOLDER),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Value::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Value::Text(Cow::Owned(value))
    }
}

impl From<char> for Value<'_> {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

macro_rules! impl_from_integer {
    ($variant:ident as $target:ty, $($ty:ty),+) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_integer!(Int as i64, i8, i16, i32, i64, isize);
impl_from_integer!(UInt as u64, u8, u16, u32, u64, usize);

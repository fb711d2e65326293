use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use paste::paste;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
}

impl ValType {
    pub const ALL: [ValType; 4] = [ValType::I32, ValType::I64, ValType::F32, ValType::F64];

    pub fn name(self) -> &'static str {
        match self {
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
        }
    }

    #[inline(always)]
    pub fn is_integer(self) -> bool { matches!(self, ValType::I32 | ValType::I64) }
}

impl FromStr for ValType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| Error::unsupported(s))
    }
}

impl Display for ValType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

/// An un-normalized host number: the raw input of [`coerce`] and the domain arithmetic runs in.
///
/// Integer arithmetic is exact up to 128 bits and wraps beyond that, which keeps the low 64 bits
/// correct for every integer coercion. As soon as a float takes part the computation moves to f64.
#[derive(Debug, Copy, Clone)]
pub enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    /// Integer interpretation, truncating toward zero. NaN becomes 0 and infinities saturate.
    ///
    /// Finite floats of 2^64 or more are reduced modulo 2^64 first. `%` is exact on floats, so the
    /// low 64 bits of the exact integer value survive for every integer coercion.
    #[inline]
    pub fn as_int(self) -> i128 {
        const TWO_64: f64 = 18_446_744_073_709_551_616.0;
        match self {
            Numeric::Int(n) => n,
            Numeric::Float(x) if x.is_finite() && x.abs() >= TWO_64 => (x % TWO_64) as i128,
            Numeric::Float(x) => x.trunc() as i128,
        }
    }

    #[inline]
    pub fn as_float(self) -> f64 {
        match self {
            Numeric::Int(n) => n as f64,
            Numeric::Float(x) => x,
        }
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        match self {
            Numeric::Int(n) => n == 0,
            Numeric::Float(x) => x == 0.0,
        }
    }

    /// True division. An integer quotient is only kept when the result lands in an integer type,
    /// where truncating the exact quotient is what coercion would do anyway.
    pub fn divide(self, rhs: Numeric, ty: ValType) -> Option<Numeric> {
        if rhs.is_zero() {
            return None;
        }
        Some(match (self, rhs) {
            (Numeric::Int(a), Numeric::Int(b)) if ty.is_integer() => Numeric::Int(a.wrapping_div(b)),
            (a, b) => Numeric::Float(a.as_float() / b.as_float()),
        })
    }
}

macro_rules! arith {
    ($($trait:ident, $op:tt);*) => {$(
        paste! {
            impl std::ops::$trait for Numeric {
                type Output = Numeric;

                #[inline]
                fn [<$trait:lower>](self, rhs: Numeric) -> Numeric {
                    match (self, rhs) {
                        (Numeric::Int(a), Numeric::Int(b)) => Numeric::Int(a.[<wrapping_ $trait:lower>](b)),
                        (a, b) => Numeric::Float(a.as_float() $op b.as_float()),
                    }
                }
            }
        }
    )*};
}

arith!(Add, +; Sub, -; Mul, *);

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool { self.partial_cmp(other) == Some(Ordering::Equal) }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_float().partial_cmp(&b.as_float()),
        }
    }
}

macro_rules! numeric_from {
    (Int: $($int:ty),*; Float: $($float:ty),*) => {
        $(impl From<$int> for Numeric { fn from(v: $int) -> Self { Numeric::Int(v as i128) } })*
        $(impl From<$float> for Numeric { fn from(v: $float) -> Self { Numeric::Float(v as f64) } })*
    };
}

numeric_from!(Int: i32, u32, i64, u64, i128; Float: f32, f64);

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Int(n) => write!(f, "{}", n),
            Numeric::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// A stack value. The variant is the type tag, so a payload can never be wider than its type.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WasmValue {
    I32(u32),
    I64(u64),
    F32(f32),
    F64(f64),
}

impl WasmValue {
    pub fn ty(self) -> ValType {
        match self {
            WasmValue::I32(_) => ValType::I32,
            WasmValue::I64(_) => ValType::I64,
            WasmValue::F32(_) => ValType::F32,
            WasmValue::F64(_) => ValType::F64,
        }
    }

    #[inline]
    pub fn numeric(self) -> Numeric {
        match self {
            WasmValue::I32(v) => Numeric::Int(v as i128),
            WasmValue::I64(v) => Numeric::Int(v as i128),
            WasmValue::F32(v) => Numeric::Float(v as f64),
            WasmValue::F64(v) => Numeric::Float(v),
        }
    }
}

/// Normalizes `raw` to the width and representation of `ty`.
pub fn coerce(ty: ValType, raw: Numeric) -> WasmValue {
    match ty {
        ValType::I32 => WasmValue::I32(raw.as_int() as u32),
        ValType::I64 => WasmValue::I64(raw.as_int() as u64),
        ValType::F32 => WasmValue::F32(raw.as_float() as f32),
        ValType::F64 => WasmValue::F64(raw.as_float()),
    }
}

impl Display for WasmValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WasmValue::I32(v) => write!(f, "{}", v),
            WasmValue::I64(v) => write!(f, "{}", v),
            WasmValue::F32(v) => write!(f, "{:?}", v),
            WasmValue::F64(v) => write!(f, "{:?}", v),
        }
    }
}

// Bare JSON numbers, the shape stack dumps have always had.
impl Serialize for WasmValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            WasmValue::I32(v) => serializer.serialize_u32(v),
            WasmValue::I64(v) => serializer.serialize_u64(v),
            WasmValue::F32(v) => serializer.serialize_f32(v),
            WasmValue::F64(v) => serializer.serialize_f64(v),
        }
    }
}

//! Element type descriptors.
//!
//! [`DType`] mirrors the dtype vocabulary of columnar array libraries: fixed-width
//! booleans, integers, floats and complex numbers, fixed-width strings, datetimes
//! with a unit, and the catch-all `Object`.

use std::fmt;

/// Time unit of a `datetime64` / `timedelta64` dtype.
///
/// Ordered from coarsest to finest; `Generic` (no unit yet) sorts first so that any
/// concrete unit wins during promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateUnit {
    Generic,
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl DateUnit {
    /// Short unit code, e.g. `"ns"`.
    pub fn code(self) -> &'static str {
        match self {
            DateUnit::Generic => "generic",
            DateUnit::Year => "Y",
            DateUnit::Month => "M",
            DateUnit::Week => "W",
            DateUnit::Day => "D",
            DateUnit::Hour => "h",
            DateUnit::Minute => "m",
            DateUnit::Second => "s",
            DateUnit::Millisecond => "ms",
            DateUnit::Microsecond => "us",
            DateUnit::Nanosecond => "ns",
        }
    }
}

/// Array element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// Fixed-width unicode string; width in characters.
    Unicode(usize),
    /// Fixed-width byte string; width in bytes.
    Bytes(usize),
    DateTime64(DateUnit),
    Timedelta64(DateUnit),
    Object,
}

impl DType {
    /// Single-character kind code (`b i u f c U S M m O`).
    pub fn kind(self) -> char {
        match self {
            DType::Bool => 'b',
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => 'i',
            DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64 => 'u',
            DType::Float32 | DType::Float64 => 'f',
            DType::Complex64 | DType::Complex128 => 'c',
            DType::Unicode(_) => 'U',
            DType::Bytes(_) => 'S',
            DType::DateTime64(_) => 'M',
            DType::Timedelta64(_) => 'm',
            DType::Object => 'O',
        }
    }

    pub fn is_object(self) -> bool {
        self == DType::Object
    }

    pub fn is_bool(self) -> bool {
        self == DType::Bool
    }

    /// Unicode or byte string.
    pub fn is_string(self) -> bool {
        matches!(self, DType::Unicode(_) | DType::Bytes(_))
    }

    /// `datetime64` or `timedelta64`.
    pub fn is_datetime_like(self) -> bool {
        matches!(self, DType::DateTime64(_) | DType::Timedelta64(_))
    }

    pub fn is_integer(self) -> bool {
        matches!(self.kind(), 'i' | 'u')
    }

    pub fn is_numeric(self) -> bool {
        matches!(self.kind(), 'i' | 'u' | 'f' | 'c')
    }

    /// Size of one element in bytes (pointer-sized for `Object`).
    pub fn itemsize(self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Complex64 => 8,
            DType::Complex128 => 16,
            DType::Unicode(n) => 4 * n,
            DType::Bytes(n) => n,
            DType::DateTime64(_) | DType::Timedelta64(_) => 8,
            DType::Object => std::mem::size_of::<usize>(),
        }
    }

    /// Bit width of a numeric dtype (per component for complex), `None` otherwise.
    pub(crate) fn bits(self) -> Option<u32> {
        match self {
            DType::Int8 | DType::UInt8 => Some(8),
            DType::Int16 | DType::UInt16 => Some(16),
            DType::Int32 | DType::UInt32 | DType::Float32 | DType::Complex64 => Some(32),
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Complex128 => Some(64),
            _ => None,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Bool => write!(f, "bool"),
            DType::Int8 => write!(f, "int8"),
            DType::Int16 => write!(f, "int16"),
            DType::Int32 => write!(f, "int32"),
            DType::Int64 => write!(f, "int64"),
            DType::UInt8 => write!(f, "uint8"),
            DType::UInt16 => write!(f, "uint16"),
            DType::UInt32 => write!(f, "uint32"),
            DType::UInt64 => write!(f, "uint64"),
            DType::Float32 => write!(f, "float32"),
            DType::Float64 => write!(f, "float64"),
            DType::Complex64 => write!(f, "complex64"),
            DType::Complex128 => write!(f, "complex128"),
            DType::Unicode(n) => write!(f, "<U{n}"),
            DType::Bytes(n) => write!(f, "|S{n}"),
            DType::DateTime64(DateUnit::Generic) => write!(f, "datetime64"),
            DType::DateTime64(unit) => write!(f, "datetime64[{}]", unit.code()),
            DType::Timedelta64(DateUnit::Generic) => write!(f, "timedelta64"),
            DType::Timedelta64(unit) => write!(f, "timedelta64[{}]", unit.code()),
            DType::Object => write!(f, "object"),
        }
    }
}

//! Owned scalar values stored in object arrays, and predicates over them.

use std::hash::{Hash, Hasher};

use num_complex::{Complex, Complex32, Complex64};
use num_traits::Float;

use crate::dtype::{DType, DateUnit};
use crate::{ArrayKitError, Result};

/// Integer marker for "not a time" in datetime and timedelta values.
pub const NAT: i64 = i64::MIN;

/// A single label or cell value.
#[derive(Debug, Clone)]
pub enum Element {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Float32(f32),
    Complex(Complex64),
    Complex64(Complex32),
    Str(String),
    Bytes(Vec<u8>),
    /// Ticks since the epoch in `DateUnit`, or [`NAT`].
    DateTime(i64, DateUnit),
    /// Duration in `DateUnit` ticks, or [`NAT`].
    Timedelta(i64, DateUnit),
    Tuple(Vec<Element>),
    List(Vec<Element>),
}

impl Element {
    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::None => "NoneType",
            Element::Bool(_) => "bool",
            Element::Int(_) => "int",
            Element::Float(_) => "float",
            Element::Float32(_) => "float32",
            Element::Complex(_) => "complex",
            Element::Complex64(_) => "complex64",
            Element::Str(_) => "str",
            Element::Bytes(_) => "bytes",
            Element::DateTime(..) => "datetime64",
            Element::Timedelta(..) => "timedelta64",
            Element::Tuple(_) => "tuple",
            Element::List(_) => "list",
        }
    }

    /// Whether the value can be used as a hashable label.
    pub fn is_hashable(&self) -> bool {
        match self {
            Element::List(_) => false,
            Element::Tuple(items) => items.iter().all(Element::is_hashable),
            _ => true,
        }
    }
}

impl From<bool> for Element {
    fn from(v: bool) -> Self {
        Element::Bool(v)
    }
}

impl From<i64> for Element {
    fn from(v: i64) -> Self {
        Element::Int(v)
    }
}

impl From<f64> for Element {
    fn from(v: f64) -> Self {
        Element::Float(v)
    }
}

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::Str(v.to_owned())
    }
}

impl From<String> for Element {
    fn from(v: String) -> Self {
        Element::Str(v)
    }
}

fn float_key(v: f64) -> u64 {
    // -0.0 == 0.0, so they must hash alike
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::None, Element::None) => true,
            (Element::Bool(a), Element::Bool(b)) => a == b,
            (Element::Int(a), Element::Int(b)) => a == b,
            (Element::Float(a), Element::Float(b)) => float_key(*a) == float_key(*b),
            (Element::Float32(a), Element::Float32(b)) => {
                float_key(*a as f64) == float_key(*b as f64)
            }
            (Element::Complex(a), Element::Complex(b)) => {
                float_key(a.re) == float_key(b.re) && float_key(a.im) == float_key(b.im)
            }
            (Element::Complex64(a), Element::Complex64(b)) => {
                float_key(a.re as f64) == float_key(b.re as f64)
                    && float_key(a.im as f64) == float_key(b.im as f64)
            }
            (Element::Str(a), Element::Str(b)) => a == b,
            (Element::Bytes(a), Element::Bytes(b)) => a == b,
            (Element::DateTime(a, u), Element::DateTime(b, v)) => a == b && u == v,
            (Element::Timedelta(a, u), Element::Timedelta(b, v)) => a == b && u == v,
            (Element::Tuple(a), Element::Tuple(b)) => a == b,
            (Element::List(a), Element::List(b)) => a == b,
            _ => false,
        }
    }
}

// Floats compare by bit pattern, which makes equality reflexive.
impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Element::None => {}
            Element::Bool(v) => v.hash(state),
            Element::Int(v) => v.hash(state),
            Element::Float(v) => float_key(*v).hash(state),
            Element::Float32(v) => float_key(*v as f64).hash(state),
            Element::Complex(c) => {
                float_key(c.re).hash(state);
                float_key(c.im).hash(state);
            }
            Element::Complex64(c) => {
                float_key(c.re as f64).hash(state);
                float_key(c.im as f64).hash(state);
            }
            Element::Str(s) => s.hash(state),
            Element::Bytes(b) => b.hash(state),
            Element::DateTime(v, unit) | Element::Timedelta(v, unit) => {
                v.hash(state);
                unit.hash(state);
            }
            Element::Tuple(items) | Element::List(items) => items.hash(state),
        }
    }
}

fn complex_is_nan<T: Float>(c: &Complex<T>) -> bool {
    c.re.is_nan() || c.im.is_nan()
}

/// Return `true` if the element is a missing value: `None`, a NaN float, a complex
/// number with a NaN component, or a NaT datetime/timedelta.
pub fn isna_element(element: &Element) -> bool {
    match element {
        Element::None => true,
        Element::Float(v) => v.is_nan(),
        Element::Float32(v) => v.is_nan(),
        Element::Complex(c) => complex_is_nan(c),
        Element::Complex64(c) => complex_is_nan(c),
        Element::DateTime(v, _) | Element::Timedelta(v, _) => *v == NAT,
        _ => false,
    }
}

/// Return the dtype an array built from this single element would have.
///
/// String and byte widths are at least one, so an empty string is `<U1`.
pub fn dtype_from_element(element: &Element) -> DType {
    match element {
        Element::None => DType::Object,
        Element::Bool(_) => DType::Bool,
        Element::Int(_) => DType::Int64,
        Element::Float(_) => DType::Float64,
        Element::Float32(_) => DType::Float32,
        Element::Complex(_) => DType::Complex128,
        Element::Complex64(_) => DType::Complex64,
        Element::Str(s) => DType::Unicode(s.chars().count().max(1)),
        Element::Bytes(b) => DType::Bytes(b.len().max(1)),
        Element::DateTime(_, unit) => DType::DateTime64(*unit),
        Element::Timedelta(_, unit) => DType::Timedelta64(*unit),
        Element::Tuple(_) | Element::List(_) => DType::Object,
    }
}

/// Return `name` unchanged if it is usable as a label, i.e. hashable.
pub fn name_filter(name: Element) -> Result<Element> {
    if !name.is_hashable() {
        return Err(ArrayKitError::UnhashableName(name.type_name()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_isna_none_and_nan() {
        assert!(isna_element(&Element::None));
        assert!(isna_element(&Element::Float(f64::NAN)));
        assert!(isna_element(&Element::Float32(f32::NAN)));
        assert!(!isna_element(&Element::Float(0.0)));
        assert!(!isna_element(&Element::Int(0)));
        assert!(!isna_element(&Element::Str(String::new())));
    }

    #[test]
    fn test_isna_complex() {
        assert!(isna_element(&Element::Complex(Complex64::new(f64::NAN, 1.0))));
        assert!(isna_element(&Element::Complex(Complex64::new(1.0, f64::NAN))));
        assert!(isna_element(&Element::Complex64(Complex32::new(f32::NAN, 0.0))));
        assert!(!isna_element(&Element::Complex(Complex64::new(1.0, 2.0))));
    }

    #[test]
    fn test_isna_nat() {
        assert!(isna_element(&Element::DateTime(NAT, DateUnit::Day)));
        assert!(isna_element(&Element::Timedelta(NAT, DateUnit::Second)));
        assert!(!isna_element(&Element::DateTime(0, DateUnit::Day)));
    }

    #[test]
    fn test_isna_containers() {
        assert!(!isna_element(&Element::List(vec![Element::None])));
        assert!(!isna_element(&Element::Tuple(vec![])));
    }

    #[test]
    fn test_dtype_from_element() {
        assert_eq!(dtype_from_element(&Element::None), DType::Object);
        assert_eq!(dtype_from_element(&Element::Bool(true)), DType::Bool);
        assert_eq!(dtype_from_element(&Element::Int(3)), DType::Int64);
        assert_eq!(dtype_from_element(&Element::Float(1.5)), DType::Float64);
        assert_eq!(dtype_from_element(&Element::from("abc")), DType::Unicode(3));
        assert_eq!(dtype_from_element(&Element::from("ñé")), DType::Unicode(2));
        assert_eq!(dtype_from_element(&Element::from("")), DType::Unicode(1));
        assert_eq!(dtype_from_element(&Element::Bytes(vec![])), DType::Bytes(1));
        assert_eq!(dtype_from_element(&Element::Bytes(b"ab".to_vec())), DType::Bytes(2));
        assert_eq!(
            dtype_from_element(&Element::DateTime(1, DateUnit::Millisecond)),
            DType::DateTime64(DateUnit::Millisecond)
        );
        assert_eq!(
            dtype_from_element(&Element::Complex64(Complex32::new(1.0, 0.0))),
            DType::Complex64
        );
        assert_eq!(dtype_from_element(&Element::List(vec![])), DType::Object);
    }

    #[test]
    fn test_name_filter() {
        let name = name_filter(Element::from("a")).unwrap();
        assert_eq!(name, Element::from("a"));
        let name = name_filter(Element::Tuple(vec![Element::Int(1), Element::None])).unwrap();
        assert!(matches!(name, Element::Tuple(_)));
    }

    #[test]
    fn test_name_filter_unhashable() {
        let err = name_filter(Element::List(vec![Element::Int(1)])).unwrap_err();
        match err {
            ArrayKitError::UnhashableName("list") => {}
            _ => panic!("unexpected error: {err:?}"),
        }
        let err = name_filter(Element::Tuple(vec![Element::List(vec![])])).unwrap_err();
        assert!(matches!(err, ArrayKitError::UnhashableName("tuple")));
    }

    #[test]
    fn test_hash_eq_floats() {
        let mut set = HashSet::new();
        set.insert(Element::Float(0.0));
        assert!(set.contains(&Element::Float(-0.0)));
        set.insert(Element::Float(f64::NAN));
        assert!(set.contains(&Element::Float(f64::NAN)));
        assert!(!set.contains(&Element::Int(0)));
    }
}

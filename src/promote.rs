use crate::dtype::DType;
use crate::{ArrayKitError, Result};

/// Resolve two dtypes into one that can hold values of both.
///
/// This follows the usual array-library promotion rule, but never lets
/// an otherwise lossy or surprising coercion through:
/// - equal dtypes resolve to themselves
/// - `Object` or `Bool` on either side resolves to `Object`
/// - a string mixed with a non-string resolves to `Object`
/// - a datetime or timedelta mixed with anything of a different kind resolves to `Object`
/// - otherwise the promoted dtype, or `Object` if the pair has no promotion
pub fn resolve_dtype(a: DType, b: DType) -> DType {
    if a == b {
        return a;
    }
    if a.is_object() || b.is_object() || a.is_bool() || b.is_bool() {
        return DType::Object;
    }
    if a.is_string() != b.is_string() {
        return DType::Object;
    }
    if (a.is_datetime_like() || b.is_datetime_like()) && a.kind() != b.kind() {
        return DType::Object;
    }
    promote_types(a, b).unwrap_or(DType::Object)
}

/// Resolve an iterator of dtypes pairwise, stopping early once `Object` is reached.
///
/// Returns [`ArrayKitError::EmptyDTypeIter`] if the iterator yields nothing.
pub fn resolve_dtype_iter<I>(dtypes: I) -> Result<DType>
where
    I: IntoIterator<Item = DType>,
{
    let mut iter = dtypes.into_iter();
    let mut resolved = iter.next().ok_or(ArrayKitError::EmptyDTypeIter)?;
    for dtype in iter {
        if resolved.is_object() {
            break;
        }
        resolved = resolve_dtype(resolved, dtype);
    }
    Ok(resolved)
}

/// Smallest dtype holding both `a` and `b`, for pairs of the same family.
fn promote_types(a: DType, b: DType) -> Option<DType> {
    match (a, b) {
        (DType::Unicode(n), DType::Unicode(m))
        | (DType::Unicode(n), DType::Bytes(m))
        | (DType::Bytes(n), DType::Unicode(m)) => Some(DType::Unicode(n.max(m))),
        (DType::Bytes(n), DType::Bytes(m)) => Some(DType::Bytes(n.max(m))),
        (DType::DateTime64(u), DType::DateTime64(v)) => Some(DType::DateTime64(u.max(v))),
        (DType::Timedelta64(u), DType::Timedelta64(v)) => Some(DType::Timedelta64(u.max(v))),
        _ if a.is_numeric() && b.is_numeric() => promote_numeric(a, b),
        _ => None,
    }
}

fn promote_numeric(a: DType, b: DType) -> Option<DType> {
    let (ka, kb) = (a.kind(), b.kind());
    let (ba, bb) = (a.bits()?, b.bits()?);
    match (ka, kb) {
        ('i', 'i') => signed(ba.max(bb)),
        ('u', 'u') => unsigned(ba.max(bb)),
        ('i', 'u') => mixed_sign(ba, bb),
        ('u', 'i') => mixed_sign(bb, ba),
        ('f', 'f') => float(ba.max(bb)),
        ('c', 'c') => complex(ba.max(bb)),
        ('f', 'c') | ('c', 'f') => complex(ba.max(bb)),
        ('i' | 'u', 'f') => float(bb.max(int_float_bits(a)?)),
        ('f', 'i' | 'u') => float(ba.max(int_float_bits(b)?)),
        ('i' | 'u', 'c') => complex(bb.max(int_float_bits(a)?)),
        ('c', 'i' | 'u') => complex(ba.max(int_float_bits(b)?)),
        _ => None,
    }
}

/// Signed integer of `sbits` mixed with unsigned integer of `ubits`.
fn mixed_sign(sbits: u32, ubits: u32) -> Option<DType> {
    if sbits > ubits {
        signed(sbits)
    } else if ubits < 64 {
        signed(ubits * 2)
    } else {
        Some(DType::Float64)
    }
}

/// Float width needed to represent every value of an integer dtype.
fn int_float_bits(dtype: DType) -> Option<u32> {
    match dtype.bits()? {
        8 | 16 => Some(32),
        _ => Some(64),
    }
}

fn signed(bits: u32) -> Option<DType> {
    match bits {
        8 => Some(DType::Int8),
        16 => Some(DType::Int16),
        32 => Some(DType::Int32),
        64 => Some(DType::Int64),
        _ => None,
    }
}

fn unsigned(bits: u32) -> Option<DType> {
    match bits {
        8 => Some(DType::UInt8),
        16 => Some(DType::UInt16),
        32 => Some(DType::UInt32),
        64 => Some(DType::UInt64),
        _ => None,
    }
}

fn float(bits: u32) -> Option<DType> {
    match bits {
        32 => Some(DType::Float32),
        64 => Some(DType::Float64),
        _ => None,
    }
}

fn complex(bits: u32) -> Option<DType> {
    match bits {
        32 => Some(DType::Complex64),
        64 => Some(DType::Complex128),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DateUnit;

    #[test]
    fn test_resolve_same() {
        assert_eq!(resolve_dtype(DType::Int16, DType::Int16), DType::Int16);
        assert_eq!(resolve_dtype(DType::Unicode(3), DType::Unicode(3)), DType::Unicode(3));
    }

    #[test]
    fn test_resolve_bool_and_object() {
        assert_eq!(resolve_dtype(DType::Bool, DType::Int8), DType::Object);
        assert_eq!(resolve_dtype(DType::Float64, DType::Object), DType::Object);
        assert_eq!(resolve_dtype(DType::Bool, DType::Bool), DType::Bool);
    }

    #[test]
    fn test_resolve_string_mix() {
        assert_eq!(resolve_dtype(DType::Unicode(3), DType::Int64), DType::Object);
        assert_eq!(resolve_dtype(DType::Bytes(2), DType::Unicode(5)), DType::Unicode(5));
        assert_eq!(resolve_dtype(DType::Bytes(8), DType::Unicode(2)), DType::Unicode(8));
        assert_eq!(resolve_dtype(DType::Bytes(2), DType::Bytes(4)), DType::Bytes(4));
    }

    #[test]
    fn test_resolve_datetime() {
        let d = DType::DateTime64(DateUnit::Day);
        let ns = DType::DateTime64(DateUnit::Nanosecond);
        let td = DType::Timedelta64(DateUnit::Day);
        assert_eq!(resolve_dtype(d, ns), ns);
        assert_eq!(resolve_dtype(d, td), DType::Object);
        assert_eq!(resolve_dtype(d, DType::Int64), DType::Object);
        assert_eq!(
            resolve_dtype(DType::Timedelta64(DateUnit::Generic), td),
            td
        );
    }

    #[test]
    fn test_resolve_integers() {
        assert_eq!(resolve_dtype(DType::Int8, DType::Int32), DType::Int32);
        assert_eq!(resolve_dtype(DType::UInt8, DType::UInt16), DType::UInt16);
        assert_eq!(resolve_dtype(DType::Int16, DType::UInt8), DType::Int16);
        assert_eq!(resolve_dtype(DType::Int8, DType::UInt8), DType::Int16);
        assert_eq!(resolve_dtype(DType::UInt32, DType::Int32), DType::Int64);
        assert_eq!(resolve_dtype(DType::UInt64, DType::Int8), DType::Float64);
    }

    #[test]
    fn test_resolve_floats() {
        assert_eq!(resolve_dtype(DType::Float32, DType::Float64), DType::Float64);
        assert_eq!(resolve_dtype(DType::Int16, DType::Float32), DType::Float32);
        assert_eq!(resolve_dtype(DType::Int32, DType::Float32), DType::Float64);
        assert_eq!(resolve_dtype(DType::Float32, DType::Complex64), DType::Complex64);
        assert_eq!(resolve_dtype(DType::Float64, DType::Complex64), DType::Complex128);
        assert_eq!(resolve_dtype(DType::Int64, DType::Complex64), DType::Complex128);
        assert_eq!(resolve_dtype(DType::UInt8, DType::Complex64), DType::Complex64);
    }

    #[test]
    fn test_resolve_iter() {
        let resolved =
            resolve_dtype_iter([DType::Int8, DType::UInt8, DType::Float32]).unwrap();
        assert_eq!(resolved, DType::Float32);
    }

    #[test]
    fn test_resolve_iter_stops_at_object() {
        let resolved =
            resolve_dtype_iter([DType::Int8, DType::Bool, DType::Float32]).unwrap();
        assert_eq!(resolved, DType::Object);
    }

    #[test]
    fn test_resolve_iter_single() {
        assert_eq!(resolve_dtype_iter([DType::Bytes(3)]).unwrap(), DType::Bytes(3));
    }

    #[test]
    fn test_resolve_iter_empty() {
        let err = resolve_dtype_iter(std::iter::empty()).unwrap_err();
        match err {
            ArrayKitError::EmptyDTypeIter => {}
            _ => panic!("unexpected error: {err:?}"),
        }
    }
}

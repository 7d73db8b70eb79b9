/// Returns `true` if `bits` is non-empty and made only of `0` and `1`.
///
/// # Example
/// ```
/// use br_core::bits::is_bit_string;
/// assert!(is_bit_string("010011"));
/// assert!(!is_bit_string("01a0"));
/// assert!(!is_bit_string(""));
/// ```
#[must_use]
pub fn is_bit_string(bits: &str) -> bool {
    !bits.is_empty() && bits.bytes().all(|b| b == b'0' || b == b'1')
}

/// Binary form of `value`, left-padded with zeros to at least `width` digits.
///
/// Values needing more than `width` digits are returned unpadded and longer
/// than `width`; callers compare the length to detect overflow.
///
/// # Example
/// ```
/// use br_core::bits::to_bit_string;
/// assert_eq!(to_bit_string(u32::from('A'), 8), "01000001");
/// assert_eq!(to_bit_string(0x263A, 8), "10011000111010");
/// ```
#[must_use]
pub fn to_bit_string(value: u32, width: usize) -> String {
    format!("{value:0width$b}")
}

/// Index of the branch selected by a bit character: `0` → 0, `1` → 1.
#[inline]
pub(crate) fn branch_index(bit: u8) -> usize {
    usize::from(bit == b'1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_fills_to_width() {
        assert_eq!(to_bit_string(0, 6), "000000");
        assert_eq!(to_bit_string(1, 6), "000001");
        assert_eq!(to_bit_string(255, 8), "11111111");
    }

    #[test]
    fn rejects_non_binary() {
        assert!(!is_bit_string("0120"));
        assert!(!is_bit_string(" 01"));
        assert!(is_bit_string("1"));
    }
}

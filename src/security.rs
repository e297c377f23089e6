//! Constant-time comparison and best-effort wiping of secret buffers.
//!
//! Wiping is defense in depth only: the allocator, the optimizer and copies made before a
//! buffer reaches these helpers are all out of reach. Any buffer that held secret or share
//! data should still be passed here on every exit path. Most internal buffers get this for
//! free through [`zeroize::Zeroizing`] or a `ZeroizeOnDrop` derive.

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::field::Gf2053;
use crate::share::Share;

/// Compares two sequences element by element without stopping at the first difference.
///
/// The length is not treated as secret: sequences of different lengths compare unequal
/// straight away.
pub fn constant_time_equal<T: ConstantTimeEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter()
        .zip(b)
        .fold(Choice::from(1), |acc, (x, y)| acc & x.ct_eq(y))
        .into()
}

/// [`constant_time_equal`] over the bytes of two strings.
pub fn constant_time_string_equal(a: &str, b: &str) -> bool {
    constant_time_equal(a.as_bytes(), b.as_bytes())
}

/// Constant-time equality of two single field elements.
pub fn constant_time_element_equal(a: Gf2053, b: Gf2053) -> bool {
    a.ct_eq(&b).into()
}

pub fn secure_wipe_elements(buffer: &mut [Gf2053]) {
    buffer.zeroize();
}

pub fn secure_wipe_bytes(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// Overwrites the string's bytes and truncates it.
pub fn secure_wipe_string(buffer: &mut String) {
    buffer.zeroize();
}

/// Overwrites every field of a share, leaving it empty.
pub fn secure_wipe_share(share: &mut Share) {
    share.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_equal_matches_eq() {
        let base: Vec<u16> = (0..24).collect();
        assert!(constant_time_equal(&base, &base.clone()));

        // A difference anywhere, first or last element included, is found.
        for position in 0..base.len() {
            let mut other = base.clone();
            other[position] ^= 1;
            assert_eq!(constant_time_equal(&base, &other), base == other);
            assert!(!constant_time_equal(&base, &other));
        }
    }

    #[test]
    fn test_constant_time_equal_length_mismatch() {
        assert!(!constant_time_equal(&[1u8, 2, 3], &[1u8, 2]));
        assert!(constant_time_equal::<u8>(&[], &[]));
    }

    #[test]
    fn test_constant_time_equal_on_field_elements() {
        let a = [Gf2053::new(1), Gf2053::new(2052)];
        let b = [Gf2053::new(1), Gf2053::new(2052)];
        let c = [Gf2053::new(1), Gf2053::new(2051)];
        assert!(constant_time_equal(&a, &b));
        assert!(!constant_time_equal(&a, &c));
        assert!(constant_time_element_equal(a[1], b[1]));
        assert!(!constant_time_element_equal(a[1], c[1]));
    }

    #[test]
    fn test_constant_time_string_equal() {
        assert!(constant_time_string_equal("abandon about", "abandon about"));
        assert!(!constant_time_string_equal("abandon about", "abandon above"));
        assert!(!constant_time_string_equal("abandon", "abandon about"));
    }

    #[test]
    fn test_wipes_overwrite_contents() {
        let mut elements = vec![Gf2053::new(17), Gf2053::new(2048)];
        secure_wipe_elements(&mut elements);
        assert!(elements.iter().all(|e| e.is_zero()));

        let mut bytes = [0xAAu8; 16];
        secure_wipe_bytes(&mut bytes);
        assert_eq!(bytes, [0u8; 16]);

        let mut phrase = String::from("abandon about");
        secure_wipe_string(&mut phrase);
        assert!(phrase.is_empty());
    }

    #[test]
    fn test_wipe_share() {
        let mut share = Share {
            share_number: Gf2053::new(1),
            word_shares: vec![Gf2053::new(5); 12],
            checksum_shares: vec![Gf2053::new(7); 4],
            global_integrity_check_share: Gf2053::new(28),
        };
        secure_wipe_share(&mut share);
        assert!(share.share_number.is_zero());
        assert!(share.word_shares.is_empty());
        assert!(share.checksum_shares.is_empty());
        assert!(share.global_integrity_check_share.is_zero());
    }
}

use super::Base32Error;

/// The RFC 4648 base32 alphabet, lower-cased.
///
/// This is also the 32-symbol character set of v2 onion addresses.
pub const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: usize = 5;
const MASK: u16 = 0x1F;

/// Lookup table for base32 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow upper-case
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_lowercase() {
            lut[(c - 32) as usize] = i; // uppercase letter
        }
        i += 1;
    }
    lut
};

/// Number of base32 symbols needed to encode `bytes` bytes without padding.
#[must_use]
pub const fn encoded_len(bytes: usize) -> usize {
    (bytes * 8).div_ceil(BITS_PER_CHAR)
}

/// Returns `true` if `byte` is a symbol of the base32 alphabet, in either case.
#[must_use]
pub const fn is_symbol(byte: u8) -> bool {
    LOOKUP[byte as usize] != NO_VALUE
}

/// Encodes `input` as lower-case base32, writing output to `buf`.
///
/// `buf` must be exactly [`encoded_len`]`(input.len())` bytes long. Trailing
/// bits of the last symbol are zero-filled and no `=` padding is written.
///
/// # Panics
///
/// Panics if `buf` is shorter than the encoded output.
pub fn encode_base32(input: &[u8], buf: &mut [u8]) {
    debug_assert_eq!(buf.len(), encoded_len(input.len()));
    let mut acc = 0_u16;
    let mut bits = 0;

    let mut out = 0;
    for &b in input {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            // The masked index is always in 0..=31.
            buf[out] = ALPHABET[((acc >> bits) & MASK) as usize];
            out += 1;
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        buf[out] = ALPHABET[((acc << (BITS_PER_CHAR - bits)) & MASK) as usize];
    }
}

/// Encodes `input` into a freshly allocated lower-case [`String`].
#[must_use]
pub fn encode_to_string(input: &[u8]) -> String {
    let mut buf = vec![0_u8; encoded_len(input.len())];
    encode_base32(input, &mut buf);
    buf.into_iter().map(char::from).collect()
}

/// Decodes a base32 string (either case) into `out`.
///
/// `encoded` must be exactly [`encoded_len`]`(out.len())` symbols long.
///
/// # Errors
///
/// - [`Base32Error::InvalidLength`] if the input length does not match `out`.
/// - [`Base32Error::InvalidSymbol`] on the first byte outside the alphabet.
/// - [`Base32Error::NonCanonical`] if the trailing fill bits are not zero.
pub fn decode_base32(encoded: &[u8], out: &mut [u8]) -> Result<(), Base32Error> {
    let expected = encoded_len(out.len());
    if encoded.len() != expected {
        return Err(Base32Error::InvalidLength {
            expected,
            found: encoded.len(),
        });
    }

    let mut acc = 0_u16;
    let mut bits = 0;
    let mut pos = 0;
    for (index, &byte) in encoded.iter().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Base32Error::InvalidSymbol { byte, index });
        }
        acc = (acc << BITS_PER_CHAR) | u16::from(val);
        bits += BITS_PER_CHAR;
        if bits >= 8 {
            bits -= 8;
            out[pos] = (acc >> bits) as u8;
            pos += 1;
            acc &= (1 << bits) - 1;
        }
    }

    if acc != 0 {
        return Err(Base32Error::NonCanonical);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_VECTORS: [(&[u8], &str); 7] = [
        (b"", ""),
        (b"f", "my"),
        (b"fo", "mzxq"),
        (b"foo", "mzxw6"),
        (b"foob", "mzxw6yq"),
        (b"fooba", "mzxw6ytb"),
        (b"foobar", "mzxw6ytboi"),
    ];

    #[test]
    fn encode_matches_rfc4648_vectors_without_padding() {
        for (input, expected) in RFC_VECTORS {
            assert_eq!(encode_to_string(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn decode_matches_rfc4648_vectors() {
        for (expected, encoded) in RFC_VECTORS {
            let mut out = vec![0_u8; expected.len()];
            decode_base32(encoded.as_bytes(), &mut out).unwrap();
            assert_eq!(out, expected, "encoded={encoded}");
        }
    }

    #[test]
    fn decode_accepts_uppercase_characters() {
        let mut lower = [0_u8; 6];
        let mut upper = [0_u8; 6];
        decode_base32(b"mzxw6ytboi", &mut lower).unwrap();
        decode_base32(b"MZXW6YTBOI", &mut upper).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(&lower, b"foobar");
    }

    #[test]
    fn thirty_five_bytes_encode_to_exactly_fifty_six_symbols() {
        assert_eq!(encoded_len(35), 56);
        assert_eq!(encoded_len(10), 16);

        let input = [0xA5_u8; 35];
        let mut buf = [0_u8; 56];
        encode_base32(&input, &mut buf);
        assert!(buf.iter().all(|&b| ALPHABET.contains(&b)));

        let mut decoded = [0_u8; 35];
        decode_base32(&buf, &mut decoded).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn decode_returns_error_for_invalid_character() {
        let mut out = [0_u8; 5];
        let result = decode_base32(b"mzxw6yt1", &mut out);
        assert_eq!(
            result.unwrap_err(),
            Base32Error::InvalidSymbol {
                byte: b'1',
                index: 7,
            }
        );
    }

    #[test]
    fn decode_returns_error_for_wrong_length() {
        let mut out = [0_u8; 35];
        let result = decode_base32(b"abc", &mut out);
        assert_eq!(
            result.unwrap_err(),
            Base32Error::InvalidLength {
                expected: 56,
                found: 3,
            }
        );
    }

    #[test]
    fn decode_rejects_set_fill_bits() {
        // "my" decodes to "f" only when the last two fill bits are zero.
        let mut out = [0_u8; 1];
        assert_eq!(
            decode_base32(b"mz", &mut out).unwrap_err(),
            Base32Error::NonCanonical
        );
    }

    #[test]
    fn symbol_table_covers_both_cases_only() {
        for &c in ALPHABET {
            assert!(is_symbol(c));
            assert!(is_symbol(c.to_ascii_uppercase()));
        }
        for c in [b'0', b'1', b'8', b'9', b'=', b'-', b' '] {
            assert!(!is_symbol(c));
        }
    }
}

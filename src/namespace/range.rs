//! Byte-range clipping for leaf reads.

/// Slice `data` for a read of `len` bytes at `offset`.
///
/// An offset at or past the end yields an empty slice, not an error.
/// The offset guard must run before the length arithmetic: computed the
/// other way around, `size - offset` underflows in unsigned arithmetic for
/// offsets past the end and produces a huge bogus read length.
pub fn clip(data: &[u8], offset: u64, len: u32) -> &[u8] {
    let size = data.len() as u64;
    if offset >= size {
        return &[];
    }
    let start = offset as usize;
    let remaining = data.len() - start;
    let take = (len as usize).min(remaining);
    &data[start..start + take]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_read() {
        assert_eq!(clip(b"hello", 0, 5), b"hello");
        assert_eq!(clip(b"hello", 0, 100), b"hello");
    }

    #[test]
    fn test_offset_inside() {
        assert_eq!(clip(b"hello", 2, 2), b"ll");
        assert_eq!(clip(b"hello", 4, 10), b"o");
    }

    #[test]
    fn test_offset_at_end() {
        assert_eq!(clip(b"hello", 5, 10), b"");
    }

    #[test]
    fn test_offset_past_end_does_not_underflow() {
        // regression: offset > size used to underflow the clipped length
        assert_eq!(clip(b"hello", 6, 1), b"");
        assert_eq!(clip(b"hello", u64::MAX, u32::MAX), b"");
        assert_eq!(clip(b"", 1, 1), b"");
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(clip(b"hello", 0, 0), b"");
        assert_eq!(clip(b"", 0, 0), b"");
    }
}

use super::normalization::check_lengths;
use crate::frame::Result;

/// Swizzle BGRA color samples into RGBA
///
/// The sensor's alpha byte carries no meaning for display, so the output is
/// always opaque.
///
/// # Errors
///
/// Returns an error if the buffers differ in length
pub fn bgra_to_rgba(bgra: &[u8], out: &mut [u8]) -> Result<()> {
    check_lengths(out.len(), bgra.len())?;

    for (dst, src) in out.chunks_exact_mut(4).zip(bgra.chunks_exact(4)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = u8::MAX;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swizzle_and_opaque_alpha() {
        let mut out = [0u8; 8];
        bgra_to_rgba(&[1, 2, 3, 0, 10, 20, 30, 40], &mut out).unwrap();
        assert_eq!(out, [3, 2, 1, 255, 30, 20, 10, 255]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut out = [0u8; 4];
        assert!(bgra_to_rgba(&[0; 8], &mut out).is_err());
    }
}

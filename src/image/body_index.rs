use super::normalization::check_lengths;
use crate::frame::Result;

/// Packed `0xXXRRGGBB` color per tracking slot; the high byte is ignored
pub const BODY_INDEX_COLORS: [u32; 6] = [
    0x0000_FF00,
    0x00FF_0000,
    0xFFFF_4000,
    0x40FF_FF00,
    0xFF40_FF00,
    0xFF80_8000,
];

/// Body-index value for pixels that belong to no body
pub const NO_BODY: u8 = 255;

/// RGB for one body-index pixel; anything outside the palette is black
#[inline]
#[must_use]
pub fn body_index_color(index: u8) -> [u8; 3] {
    BODY_INDEX_COLORS
        .get(usize::from(index))
        .map_or([0, 0, 0], |&packed| {
            let [_, r, g, b] = packed.to_be_bytes();
            [r, g, b]
        })
}

/// Map body-index pixels into an interleaved RGB buffer
///
/// # Errors
///
/// Returns an error unless `out` holds exactly three bytes per index
pub fn map_body_index(indices: &[u8], out: &mut [u8]) -> Result<()> {
    check_lengths(out.len(), indices.len() * 3)?;

    for (dst, &index) in out.chunks_exact_mut(3).zip(indices) {
        dst.copy_from_slice(&body_index_color(index));
    }

    Ok(())
}

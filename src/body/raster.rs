//! Software rasterizer for overlay commands
//!
//! Everything is clipped to the display area. Points with non-finite
//! coordinates are skipped.

use super::{DepthSpacePoint, DrawCommand};
use crate::frame::{FrameError, Result};
use crate::types::Dimensions;
use image::Rgba;

/// Draw `commands` in order into an RGBA buffer of the display size
///
/// # Errors
///
/// Returns an error unless `out` holds four bytes per display pixel
pub fn rasterize(commands: &[DrawCommand], display: Dimensions, out: &mut [u8]) -> Result<()> {
    let expected = display.pixel_count() * 4;
    if out.len() != expected {
        return Err(FrameError::LengthMismatch {
            expected,
            actual: out.len(),
        });
    }

    let mut canvas = Canvas {
        width: i32::from(display.width),
        height: i32::from(display.height),
        pixels: out,
    };

    for command in commands {
        match *command {
            DrawCommand::Rectangle {
                x,
                y,
                width,
                height,
                color,
            } => canvas.fill_rect(x, y, width, height, color),
            DrawCommand::Line { from, to, pen } => {
                canvas.stroke_line(from, to, pen.thickness, pen.color);
            }
            DrawCommand::Ellipse {
                center,
                radius,
                color,
            } => canvas.fill_disc(center, radius, color),
        }
    }

    Ok(())
}

struct Canvas<'a> {
    width: i32,
    height: i32,
    pixels: &'a mut [u8],
}

impl Canvas<'_> {
    /// Pixel bounds covering `[min, max]`, clipped to the canvas
    fn span(&self, min: f32, max: f32, limit: i32) -> Option<(i32, i32)> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        // Float to int casts saturate
        let start = (min.floor() as i32).max(0);
        let end = (max.ceil() as i32).min(limit);
        (start < end).then_some((start, end))
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        // Callers only pass clipped coordinates
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[idx..idx + 4];
        let alpha = u32::from(color.0[3]);

        for channel in 0..3 {
            let src = u32::from(color.0[channel]);
            let old = u32::from(dst[channel]);
            dst[channel] = ((src * alpha + old * (255 - alpha) + 127) / 255) as u8;
        }
        let old_alpha = u32::from(dst[3]);
        dst[3] = (alpha + (old_alpha * (255 - alpha) + 127) / 255) as u8;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            self.span(x, x + width, self.width),
            self.span(y, y + height, self.height),
        ) else {
            return;
        };

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn fill_disc(&mut self, center: DepthSpacePoint, radius: f32, color: Rgba<u8>) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            self.span(center.x - radius, center.x + radius, self.width),
            self.span(center.y - radius, center.y + radius, self.height),
        ) else {
            return;
        };
        let radius_sq = radius * radius;

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                if dx.mul_add(dx, dy * dy) <= radius_sq {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: DepthSpacePoint, to: DepthSpacePoint, thickness: f32, color: Rgba<u8>) {
        let half = (thickness / 2.0).max(0.5);
        let (Some((x0, x1)), Some((y0, y1))) = (
            self.span(from.x.min(to.x) - half, from.x.max(to.x) + half, self.width),
            self.span(from.y.min(to.y) - half, from.y.max(to.y) + half, self.height),
        ) else {
            return;
        };

        let (sx, sy) = (to.x - from.x, to.y - from.y);
        let length_sq = sx.mul_add(sx, sy * sy);
        let half_sq = half * half;

        for py in y0..y1 {
            for px in x0..x1 {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                // Closest point on the segment to the pixel centre
                let t = if length_sq > 0.0 {
                    ((cx - from.x).mul_add(sx, (cy - from.y) * sy) / length_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = cx - t.mul_add(sx, from.x);
                let dy = cy - t.mul_add(sy, from.y);
                if dx.mul_add(dx, dy * dy) <= half_sq {
                    self.blend(px, py, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Pen;

    const DISPLAY: Dimensions = Dimensions {
        width: 20,
        height: 10,
    };
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn pixel(buf: &[u8], x: usize, y: usize) -> [u8; 4] {
        let idx = (y * DISPLAY.width as usize + x) * 4;
        [buf[idx], buf[idx + 1], buf[idx + 2], buf[idx + 3]]
    }

    fn background() -> DrawCommand {
        DrawCommand::Rectangle {
            x: 0.0,
            y: 0.0,
            width: 20.0,
            height: 10.0,
            color: Rgba([0, 0, 0, 255]),
        }
    }

    #[test]
    fn test_background_fills_everything() {
        let mut buf = vec![7u8; DISPLAY.pixel_count() * 4];
        rasterize(&[background()], DISPLAY, &mut buf).unwrap();
        assert!(buf.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_half_alpha_blends_over_black() {
        let mut buf = vec![0u8; DISPLAY.pixel_count() * 4];
        let marker = DrawCommand::Ellipse {
            center: DepthSpacePoint::new(10.0, 5.0),
            radius: 3.0,
            color: Rgba([255, 0, 0, 128]),
        };
        rasterize(&[background(), marker], DISPLAY, &mut buf).unwrap();

        assert_eq!(pixel(&buf, 10, 5), [128, 0, 0, 255]);
        assert_eq!(pixel(&buf, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_line_covers_midpoint_only_near_segment() {
        let mut buf = vec![0u8; DISPLAY.pixel_count() * 4];
        let line = DrawCommand::Line {
            from: DepthSpacePoint::new(2.0, 5.0),
            to: DepthSpacePoint::new(18.0, 5.0),
            pen: Pen {
                color: WHITE,
                thickness: 1.0,
            },
        };
        rasterize(&[background(), line], DISPLAY, &mut buf).unwrap();

        assert_eq!(pixel(&buf, 10, 4), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, 10, 8), [0, 0, 0, 255]);
        assert_eq!(pixel(&buf, 19, 4), [0, 0, 0, 255]);
    }

    #[test]
    fn test_off_canvas_and_non_finite_are_ignored() {
        let mut buf = vec![0u8; DISPLAY.pixel_count() * 4];
        let commands = [
            background(),
            DrawCommand::Ellipse {
                center: DepthSpacePoint::new(-500.0, 9000.0),
                radius: 30.0,
                color: WHITE,
            },
            DrawCommand::Ellipse {
                center: DepthSpacePoint::new(f32::NAN, 1.0),
                radius: 3.0,
                color: WHITE,
            },
            DrawCommand::Line {
                from: DepthSpacePoint::new(f32::NEG_INFINITY, 0.0),
                to: DepthSpacePoint::new(5.0, 5.0),
                pen: Pen {
                    color: WHITE,
                    thickness: 6.0,
                },
            },
        ];
        rasterize(&commands, DISPLAY, &mut buf).unwrap();
        assert!(buf.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let mut buf = vec![0u8; 3];
        assert!(rasterize(&[background()], DISPLAY, &mut buf).is_err());
    }
}

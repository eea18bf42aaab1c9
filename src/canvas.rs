//! The drawing surface: a packed-pixel raster that captures freehand
//! pointer gestures as rasterized strokes and exports snapshots.
//!
//! Pixels are `0x00RRGGBB` words (the minifb convention), so the buffer can
//! be blitted straight into a window while still being scanned and encoded
//! without any unpacking tricks.

use std::io::Cursor;

use base64::Engine as Base64Engine;
use image::{ImageFormat, Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::PadConfig;

/// Gesture capture state. Only one pointer stream is tracked; a second
/// pointer source is out of scope and never reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Drawing { last: (i32, i32) },
}

/// A fixed-size drawing surface.
///
/// Construction fills the buffer with the background color, so a fresh
/// canvas is blank by definition. Strokes are rasterized immediately as the
/// pointer moves; nothing but their pixel effect is retained.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    background: u32,
    ink: u32,
    stroke_radius: i32,
    // On-screen origin of the surface in viewport coordinates. Pointer
    // events arrive in viewport space and are translated against this.
    origin: (i32, i32),
    gesture: Gesture,
}

impl Canvas {
    /// Create a canvas from the pad configuration, placed at viewport
    /// origin (0, 0). Use [`Canvas::set_origin`] when the surface sits
    /// inside a larger window.
    pub fn new(config: &PadConfig) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::ConfigError(
                "canvas dimensions must be non-zero".into(),
            ));
        }
        if config.stroke_width == 0 {
            return Err(Error::ConfigError("stroke width must be non-zero".into()));
        }
        let width = config.width as usize;
        let height = config.height as usize;
        Ok(Self {
            width,
            height,
            pixels: vec![config.background; width * height],
            background: config.background,
            ink: config.ink,
            stroke_radius: (config.stroke_width / 2).max(1) as i32,
            origin: (0, 0),
            gesture: Gesture::Idle,
        })
    }

    /// Move the surface's on-screen origin. Subsequent pointer events are
    /// translated by subtracting this point.
    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw pixel words, row-major. Used by the demo window to blit the
    /// surface into its framebuffer.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Whether a stroke is currently being captured.
    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing { .. })
    }

    /// Reset every pixel to the background color. Erases all prior strokes
    /// irreversibly; always succeeds and is idempotent.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Full-buffer scan: true iff every pixel equals the exact background
    /// value. The comparison is deliberately bit-exact, never tolerance
    /// based; strokes write a different packed constant, so the scan cannot
    /// produce false negatives.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&px| px == self.background)
    }

    /// Pointer pressed at a viewport position. Starts a stroke when the
    /// position lands on the surface; presses elsewhere are ignored.
    pub fn pointer_down(&mut self, vx: f32, vy: f32) {
        let p = self.to_local(vx, vy);
        if self.contains(p) {
            self.gesture = Gesture::Drawing { last: p };
        }
    }

    /// Pointer moved. While drawing, rasterizes a segment from the last
    /// recorded point; a move that exits the surface ends the stroke
    /// exactly like a release. Moves while idle are ignored.
    pub fn pointer_moved(&mut self, vx: f32, vy: f32) {
        let Gesture::Drawing { last } = self.gesture else {
            return;
        };
        let p = self.to_local(vx, vy);
        if !self.contains(p) {
            // Leaving the surface must not leave a stroke half-open.
            self.gesture = Gesture::Idle;
            return;
        }
        self.stroke_segment(last, p);
        self.gesture = Gesture::Drawing { last: p };
    }

    /// Pointer released: ends the current stroke, if any.
    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Encode the buffer as a lossless PNG reflecting this exact moment.
    pub fn export_png(&self) -> Result<Vec<u8>> {
        let img = RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            Rgb([(px >> 16) as u8, (px >> 8) as u8, px as u8])
        });
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| Error::ExportUnavailable(format!("PNG encoding failed: {}", e)))?;
        Ok(buf)
    }

    /// Serialize the buffer as a `data:image/png;base64,<payload>` data
    /// URL, the one artifact handed to the recognition client.
    pub fn export_image(&self) -> Result<String> {
        let png = self.export_png()?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&png);
        Ok(format!("data:image/png;base64,{}", payload))
    }

    fn to_local(&self, vx: f32, vy: f32) -> (i32, i32) {
        (
            vx.round() as i32 - self.origin.0,
            vy.round() as i32 - self.origin.1,
        )
    }

    fn contains(&self, (x, y): (i32, i32)) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color;
    }

    // A filled disc stamped at (cx, cy); out-of-bounds pixels are clipped.
    fn stamp_disc(&mut self, cx: i32, cy: i32) {
        let r = self.stroke_radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put_pixel(cx + dx, cy + dy, self.ink);
                }
            }
        }
    }

    /// Rasterize one stroke segment by stamping discs along a Bresenham
    /// walk between the endpoints. The discs give round caps and round
    /// joins without any extra geometry.
    fn stroke_segment(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
        let (mut x0, mut y0) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp_disc(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

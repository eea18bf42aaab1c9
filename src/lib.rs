//! digitpad
//!
//! A hand-drawn digit pad: a software-rasterized drawing surface plus a
//! single-shot client for a cloud vision model. Draw a digit, export the
//! canvas as a PNG data URL, and ask the model which digit it is.
//!
//! The library is split along the one real seam in the system:
//!
//! - [`Canvas`]: owns the pixel buffer, captures pointer gestures into
//!   strokes, answers "is this blank?", and exports encoded snapshots
//! - [`Recognizer`]: takes an encoded snapshot and performs exactly one
//!   model call, normalizing the answer to a digit or the `?` sentinel
//! - [`Session`]: the interaction policy on top — empty-canvas check,
//!   one request in flight, loading/result/error display state
//!
//! # Example
//!
//! ```no_run
//! use digitpad::{PadConfig, RecognizerConfig, Session};
//!
//! # fn main() -> digitpad::Result<()> {
//! let recognizer = RecognizerConfig {
//!     api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
//!     ..Default::default()
//! };
//! let mut session = Session::new(&PadConfig::default(), recognizer)?;
//!
//! // Pointer gestures rasterize strokes immediately.
//! session.canvas_mut().pointer_down(100.0, 60.0);
//! session.canvas_mut().pointer_moved(120.0, 200.0);
//! session.canvas_mut().pointer_up();
//!
//! session.recognize();
//! while session.is_waiting() {
//!     session.poll();
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//! }
//! if let Some(digit) = session.result() {
//!     println!("Recognized: {}", digit);
//! }
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod error;
pub mod recognize;
pub mod session;
pub mod ui;
pub mod worker;

pub use canvas::Canvas;
pub use error::{Error, Result};
pub use recognize::{Digit, Recognizer, RecognizerConfig};
pub use session::{Session, Status};
pub use worker::RecognizerHandle;

/// Configuration for the drawing surface
///
/// The defaults reproduce the reference pad: a 280x280 white canvas drawn
/// on with a 20-pixel black stroke, dark ink on a light background so the
/// model sees the digit the way handwriting datasets render them.
///
/// # Examples
///
/// ```
/// let config = digitpad::PadConfig::default();
/// assert_eq!(config.width, 280);
/// assert_eq!(config.background, 0x00FF_FFFF);
/// ```
#[derive(Debug, Clone)]
pub struct PadConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Stroke width in pixels (round caps and joins)
    pub stroke_width: u32,
    /// Background fill, packed `0x00RRGGBB`
    pub background: u32,
    /// Stroke color, packed `0x00RRGGBB`
    pub ink: u32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            width: 280,
            height: 280,
            stroke_width: 20,
            background: 0x00FF_FFFF,
            ink: 0x0000_0000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PadConfig::default();
        assert_eq!(config.width, 280);
        assert_eq!(config.height, 280);
        assert_eq!(config.stroke_width, 20);
        assert_ne!(config.background, config.ink);
    }
}

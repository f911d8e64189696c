//! Messhall Codec - the identity codec
//!
//! Converts a resident identifier to and from a scannable 2-D matrix code:
//! - [`encode`] renders the identifier as a square QR luminance image
//! - [`decode`] reads at most one QR code out of a camera luminance frame
//!
//! Decode returns `None` for a frame with no code in it. On a live stream
//! that is the common case, not a failure, so it is not an error.

use image::GrayImage;
use qrcode::{EcLevel, QrCode};

/// Default edge length, in pixels, of a rendered identity code.
pub const DEFAULT_PIXEL_SIZE: u32 = 768;

/// Encoding failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The identifier was empty; an empty payload can never round-trip.
    #[error("identifier is empty")]
    EmptyIdentifier,
    /// The identifier does not fit in a QR symbol.
    #[error("identifier cannot be encoded: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Render `identifier` as a square QR code at least `pixel_size` pixels on a
/// side. The payload is the plain identifier text, nothing more.
///
/// Deterministic for a given identifier: the rendered symbol always decodes
/// back to the same string.
///
/// # Errors
/// - [`CodecError::EmptyIdentifier`] for an empty identifier
/// - [`CodecError::Encode`] if the payload exceeds QR capacity
pub fn encode(identifier: &str, pixel_size: u32) -> Result<GrayImage, CodecError> {
    if identifier.is_empty() {
        return Err(CodecError::EmptyIdentifier);
    }
    let code = QrCode::with_error_correction_level(identifier.as_bytes(), EcLevel::M)?;
    Ok(code
        .render::<image::Luma<u8>>()
        .min_dimensions(pixel_size, pixel_size)
        .build())
}

/// Try to read one QR code out of a binarized luminance frame.
///
/// Only the QR symbology is considered. If the frame holds several codes,
/// the first detected grid wins. Returns `None` when no readable code is
/// present, which is the steady state for a live camera stream.
#[must_use]
pub fn decode(frame: GrayImage) -> Option<String> {
    let (width, height) = frame.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            frame.get_pixel(x as u32, y as u32)[0]
        });
    let grids = prepared.detect_grids();
    let grid = grids.first()?;
    match grid.decode() {
        Ok((_, text)) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(err) => {
            // A grid-shaped region that fails to read: stay silent, the next
            // frame usually recovers.
            tracing::trace!(?err, "grid detected but unreadable");
            None
        }
    }
}

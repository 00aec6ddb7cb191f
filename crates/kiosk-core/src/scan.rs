//! Seam for the barcode-decoding collaborator.
//!
//! Pixel capture and decoding happen outside this workspace; the workflow
//! only consumes the decoded text, after running it through
//! [`crate::validate::sanitize_decoded`].

/// Decodes a barcode from a raw pixel buffer.
///
/// `pixels` is tightly-packed RGBA, `width * height * 4` bytes. Returns the
/// decoded text payload, or `None` when no code is found in the frame.
pub trait QrDecoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

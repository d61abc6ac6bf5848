use std::io::Cursor;

use crate::app::{Result, XcliError};
use crate::domain::Attachment;

/// Where `Ctrl+V` in the editor gets its image from.
pub trait ClipboardSource {
    fn read_image(&mut self) -> Result<Attachment>;
}

/// The system clipboard via arboard. Connects lazily on each paste so a
/// missing display server only affects the paste itself.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_image(&mut self) -> Result<Attachment> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| XcliError::AttachmentUnavailable(e.to_string()))?;
        let image = clipboard
            .get_image()
            .map_err(|e| XcliError::AttachmentUnavailable(e.to_string()))?;
        let bytes = rgba_to_png(image.width, image.height, &image.bytes)?;
        Ok(Attachment {
            bytes,
            mime: "image/png".to_string(),
        })
    }
}

fn rgba_to_png(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>> {
    let unavailable = |e: png::EncodingError| XcliError::AttachmentUnavailable(e.to_string());

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(Cursor::new(&mut png_data), width as u32, height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(unavailable)?;
        writer.write_image_data(rgba).map_err(unavailable)?;
    }
    Ok(png_data)
}

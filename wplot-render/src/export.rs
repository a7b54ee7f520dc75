//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

/// Metadata to embed in an exported PNG as tEXt chunks.
pub struct ExportMetadata {
    pub expression: String,
    pub mode: String,
    pub top_left: (f64, f64),
    pub bottom_right: (f64, f64),
    pub width: u32,
    pub height: u32,
}

/// Write an RGBA pixel buffer as a PNG file with embedded plot metadata.
///
/// Uses the `png` crate directly to inject custom tEXt chunks readable by
/// exiftool and most image viewers, so a plot can be reproduced from its
/// output file.
pub fn export_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "wplot".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(metadata))?;

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;

    debug!(path = %path.display(), width, height, "Exported PNG");
    Ok(())
}

fn build_description(m: &ExportMetadata) -> String {
    format!(
        "f(w) = {}; mode = {}; viewport = [{} + {}i, {} + {}i]; size = {}x{}",
        m.expression,
        m.mode,
        m.top_left.0,
        m.top_left.1,
        m.bottom_right.0,
        m.bottom_right.1,
        m.width,
        m.height,
    )
}

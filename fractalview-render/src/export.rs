//! PNG export with the render parameters embedded as tEXt chunks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use fractalview_core::Color;

use crate::buffer::FrameBuffer;
use crate::strategy::ComputeMode;

const SOFTWARE: &str = "FractalView";

/// Parameters recorded alongside an exported image.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub function: String,
    pub depth: u64,
    pub color_mask: Color,
    pub background_color: Color,
    pub compute_mode: ComputeMode,
    pub resolution: u64,
}

impl ExportMetadata {
    /// `fractal{resolution}D{depth}F{function}`, without extension.
    pub fn file_stem(&self) -> String {
        format!("fractal{}D{}F{}", self.resolution, self.depth, self.function)
    }

    /// `fractal{resolution}D{depth}F{function}.png`
    pub fn file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }

    fn description(&self) -> String {
        format!(
            "{} at depth {}, {}x{}",
            self.function, self.depth, self.resolution, self.resolution
        )
    }

    fn text_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("FractalView.Function".into(), self.function.clone()),
            ("FractalView.Depth".into(), self.depth.to_string()),
            ("FractalView.ColorMask".into(), self.color_mask.to_string()),
            ("FractalView.Background".into(), self.background_color.to_string()),
            ("FractalView.ComputeMode".into(), self.compute_mode.to_string()),
            ("FractalView.Resolution".into(), self.resolution.to_string()),
        ]
    }
}

/// [`ExportMetadata::file_name`] in `dir`, or `{stem}-{n}.png` for the
/// first free `n` if that name is taken.
pub fn next_free_path(dir: &Path, metadata: &ExportMetadata) -> PathBuf {
    let path = dir.join(metadata.file_name());
    if !path.exists() {
        return path;
    }
    let stem = metadata.file_stem();
    (1..u32::MAX)
        .map(|n| dir.join(format!("{stem}-{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(path)
}

/// Encode `frame` as an RGBA PNG into `writer`.
pub fn write_png<W: Write>(
    writer: W,
    frame: &FrameBuffer,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let mut encoder = png::Encoder::new(writer, frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), SOFTWARE.to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.text_pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&frame.to_rgba_bytes())?;
    png_writer.finish()?;
    Ok(())
}

/// Write `frame` to `path` as a PNG file.
pub fn export_png(path: &Path, frame: &FrameBuffer, metadata: &ExportMetadata) -> crate::Result<()> {
    let file = File::create(path)?;
    write_png(BufWriter::new(file), frame, metadata)?;
    debug!(
        width = frame.width,
        height = frame.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}

mod cli;
mod logging;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use glyphterm_atlas::{Glyph, GlyphAtlas, RgbaImage};
use serde::Serialize;

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
};

#[derive(Serialize)]
struct AtlasSummary<'a> {
    image: String,
    glyph_count: usize,
    glyphs: Vec<GlyphSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    texture: Option<&'a str>,
}

#[derive(Serialize)]
struct GlyphSummary {
    index: u32,
    width: usize,
    height: usize,
    lit_pixels: usize,
}

impl From<&Glyph> for GlyphSummary {
    fn from(glyph: &Glyph) -> Self {
        Self {
            index: glyph.index,
            width: glyph.width(),
            height: glyph.height(),
            lit_pixels: glyph.bitmap.coverage(),
        }
    }
}

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    let _guard = init_logging(LoggingConfig::from_env()).wrap_err("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "glyphterm-atlas starting up");

    let cli = Cli::parse();

    let atlas = GlyphAtlas::open(&cli.image)
        .wrap_err_with(|| format!("Failed to load glyph atlas {}", cli.image.display()))?;

    let texture_path = match &cli.texture_out {
        Some(path) => {
            let texture = atlas.texture();
            RgbaImage::from_rgba_bytes(texture.width, texture.height, &texture.texels)?
                .save_png(path)
                .wrap_err_with(|| format!("Failed to write texture {}", path.display()))?;
            tracing::info!(path = %path.display(), "atlas texture written");
            Some(path.display().to_string())
        },
        None => None,
    };

    if cli.json {
        let summary = AtlasSummary {
            image: cli.image.display().to_string(),
            glyph_count: atlas.len(),
            glyphs: atlas.iter().map(GlyphSummary::from).collect(),
            texture: texture_path.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    cli.print_summary();
    println!("\nGlyph atlas loaded!");
    println!("Total glyph count: {}", atlas.len());
    print_size_histogram(&atlas);

    if let Some(index) = cli.glyph {
        let glyph = atlas
            .get(index)
            .ok_or_else(|| eyre!("Glyph {index} is not in the atlas"))?;
        print_glyph(glyph);
    } else if cli.preview {
        atlas.iter().for_each(print_glyph);
    }

    Ok(())
}

fn print_size_histogram(atlas: &GlyphAtlas) {
    let mut sizes: Vec<((usize, usize), usize)> = Vec::new();
    for glyph in atlas.iter() {
        let size = (glyph.width(), glyph.height());
        match sizes.iter_mut().find(|(s, _)| *s == size) {
            Some((_, count)) => *count += 1,
            None => sizes.push((size, 1)),
        }
    }

    for ((w, h), count) in sizes {
        println!("  {w}x{h}: {count} glyphs");
    }

    let wide = atlas.iter().filter(|g| g.index > 255).count();
    if wide > 0 {
        println!("  {wide} glyphs have indices above 255 and are not packed into the GPU texture");
    }
}

fn print_glyph(glyph: &Glyph) {
    let label = char::from_u32(glyph.index)
        .filter(|c| c.is_ascii_graphic())
        .map(|c| format!(" '{c}'"))
        .unwrap_or_default();

    println!("\nglyph {}{label} ({}x{})", glyph.index, glyph.width(), glyph.height());
    for row in glyph.bitmap.rows() {
        let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
        println!("  {line}");
    }
}

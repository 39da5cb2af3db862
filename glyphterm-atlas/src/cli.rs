use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "glyphterm-atlas",
    about = "Glyph atlas inspector for the glyphterm overlay",
    long_about = "Scans a marker-delimited glyph atlas image, reports the glyphs found and \
                  optionally exports the packed GPU texture"
)]
pub struct Cli {
    /// Atlas source image (PNG)
    #[arg(value_name = "IMAGE", value_parser = validate_file_exists)]
    pub image: PathBuf,

    /// Print every glyph as ASCII art
    #[arg(short, long)]
    pub preview: bool,

    /// Print a single glyph as ASCII art; accepts a decimal index or a quoted character ('A')
    #[arg(short, long, value_name = "INDEX", value_parser = parse_glyph_index)]
    pub glyph: Option<u32>,

    /// Emit the atlas summary as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Write the packed 128x256 GPU atlas texture to a PNG file
    #[arg(short = 'o', long, value_name = "PATH")]
    pub texture_out: Option<PathBuf>,
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File '{s}' does not exist"))
    }
}

fn parse_glyph_index(s: &str) -> Result<u32, String> {
    if let Ok(index) = s.parse::<u32>() {
        return Ok(index);
    }

    let mut chars = s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')).unwrap_or(s).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => Err(format!("Invalid glyph '{s}'. Use a decimal index or a single character")),
    }
}

impl Cli {
    pub fn print_summary(&self) {
        println!("Atlas image: {}", self.image.display());
        if let Some(out) = &self.texture_out {
            println!("Texture output: {}", out.display());
        }
    }
}

//! Saves a drawn frame as a PPM image.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use ratatui::{buffer::Buffer, style::Color};

/// Half-block glyph the background is drawn with.
const HALF_BLOCK: &str = "▀";

/// File name for a screenshot taken at `at`.
pub fn file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{prefix}-{}.ppm", at.format("%Y%m%d-%H%M%S%.3f"))
}

/// Write `buffer` to `dir` as a binary PPM and return the file path.
///
/// Every cell becomes two stacked pixels, matching how the background is
/// drawn. Cells holding text show only their background color.
pub fn save(buffer: &Buffer, dir: &Path, prefix: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(prefix, Local::now()));
    let mut file = io::BufWriter::new(fs::File::create(&path)?);
    file.write_all(&encode(buffer))?;
    file.flush()?;
    Ok(path)
}

/// Encode `buffer` as a binary PPM (`P6`) image.
pub fn encode(buffer: &Buffer) -> Vec<u8> {
    let area = buffer.area;
    let width = area.width as usize;
    let height = area.height as usize * 2;

    let mut out = format!("P6\n{width} {height}\n255\n").into_bytes();
    out.reserve(width * height * 3);

    for y in area.top()..area.bottom() {
        let mut top_row = Vec::with_capacity(width * 3);
        let mut bottom_row = Vec::with_capacity(width * 3);
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            let bottom = to_rgb(cell.bg);
            let top = if cell.symbol() == HALF_BLOCK {
                to_rgb(cell.fg)
            } else {
                bottom
            };
            top_row.extend_from_slice(&top);
            bottom_row.extend_from_slice(&bottom);
        }
        out.extend_from_slice(&top_row);
        out.extend_from_slice(&bottom_row);
    }
    out
}

/// Approximate a terminal color as RGB.
fn to_rgb(color: Color) -> [u8; 3] {
    match color {
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Black | Color::Reset => [0, 0, 0],
        Color::Red => [128, 0, 0],
        Color::Green => [0, 128, 0],
        Color::Yellow => [128, 128, 0],
        Color::Blue => [0, 0, 128],
        Color::Magenta => [128, 0, 128],
        Color::Cyan => [0, 128, 128],
        Color::Gray => [192, 192, 192],
        Color::DarkGray => [128, 128, 128],
        Color::LightRed => [255, 0, 0],
        Color::LightGreen => [0, 255, 0],
        Color::LightYellow => [255, 255, 0],
        Color::LightBlue => [0, 0, 255],
        Color::LightMagenta => [255, 0, 255],
        Color::LightCyan => [0, 255, 255],
        Color::White => [255, 255, 255],
        Color::Indexed(i) => [i, i, i],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::layout::Rect;

    #[test]
    fn test_file_name() {
        let at = Local.with_ymd_and_hms(2025, 2, 10, 9, 5, 7).unwrap();
        assert_eq!(
            file_name("launch-screen", at),
            "launch-screen-20250210-090507.000.ppm"
        );
    }

    #[test]
    fn test_encode_half_blocks() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 2, 1));
        buffer[(0, 0)]
            .set_symbol(HALF_BLOCK)
            .set_fg(Color::Rgb(1, 2, 3))
            .set_bg(Color::Rgb(4, 5, 6));
        buffer[(1, 0)].set_symbol("q").set_fg(Color::White).set_bg(Color::Rgb(7, 8, 9));

        let bytes = encode(&buffer);
        let header = b"P6\n2 2\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(
            &bytes[header.len()..],
            &[1, 2, 3, 7, 8, 9, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = Buffer::empty(Rect::new(0, 0, 3, 2));
        let path = save(&buffer, &dir.path().join("shots"), "test").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), encode(&buffer));
    }
}

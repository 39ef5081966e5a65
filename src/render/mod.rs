//! Fixed-layout summary artifact: totals plus the top five countries by
//! estimated GDP, drawn through the [`Canvas`] primitives and written as a
//! PNG that is overwritten on every refresh.

pub mod png;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::country::Country;
use crate::error::CatalogResult;
use png::PngCanvas;

pub const SUMMARY_WIDTH: u32 = 800;
pub const SUMMARY_HEIGHT: u32 = 500;

const BACKGROUND: [u8; 3] = [0x00, 0x00, 0x00];
const FOREGROUND: [u8; 3] = [0xe2, 0xe8, 0xf0];

/// Drawing surface for the summary artifact. The encoder behind it is a
/// collaborator; the layout below only speaks in these primitives.
pub trait Canvas {
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]);

    /// Draws `text` with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: u32, y: u32, size: f32, color: [u8; 3]);
}

/// Formats a GDP value with at most two fractional digits.
pub fn format_gdp(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// The top `n` rows by estimated GDP descending. Rows with an absent
/// estimate never rank.
pub fn top_by_estimated_gdp(rows: Vec<Country>, n: usize) -> Vec<Country> {
    let mut ranked: Vec<Country> = rows
        .into_iter()
        .filter(|c| c.estimated_gdp.is_some())
        .collect();
    ranked.sort_by(|a, b| {
        b.estimated_gdp
            .partial_cmp(&a.estimated_gdp)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Draws the 800x500 summary layout onto `canvas`.
pub fn draw_summary(canvas: &mut dyn Canvas, total: u64, top: &[Country], now: DateTime<Utc>) {
    canvas.fill_rect(0, 0, SUMMARY_WIDTH, SUMMARY_HEIGHT, BACKGROUND);

    canvas.draw_text("Countries Summary", 24, 48, 28.0, FOREGROUND);
    canvas.draw_text(&format!("Total countries: {total}"), 24, 90, 16.0, FOREGROUND);
    canvas.draw_text(
        &format!(
            "Last refresh: {}",
            now.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        24,
        120,
        16.0,
        FOREGROUND,
    );
    canvas.draw_text("Top 5 by Estimated GDP", 24, 170, 20.0, FOREGROUND);

    for (idx, country) in top.iter().take(5).enumerate() {
        let gdp = country.estimated_gdp.unwrap_or(0.0);
        let line = format!("{}. {} - {}", idx + 1, country.name, format_gdp(gdp));
        canvas.draw_text(&line, 24, 200 + idx as u32 * 26, 16.0, FOREGROUND);
    }
}

/// Owns the output location and the optional font for the PNG encoder.
pub struct SummaryRenderer {
    output_dir: PathBuf,
    font_data: Option<Vec<u8>>,
}

impl SummaryRenderer {
    pub fn new(output_dir: &Path, font_data: Option<Vec<u8>>) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            font_data,
        }
    }

    /// Well-known artifact location; the file there is disposable cache.
    pub fn image_path(&self) -> PathBuf {
        self.output_dir.join("summary.png")
    }

    pub fn render_to_file(
        &self,
        total: u64,
        top: &[Country],
        now: DateTime<Utc>,
    ) -> CatalogResult<PathBuf> {
        let mut canvas =
            PngCanvas::new(SUMMARY_WIDTH, SUMMARY_HEIGHT, self.font_data.as_deref())?;
        draw_summary(&mut canvas, total, top, now);
        let bytes = canvas.encode()?;

        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;
        let path = self.image_path();
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write summary image: {}", path.display()))?;

        debug!(path = %path.display(), "Wrote summary image");
        Ok(path)
    }
}

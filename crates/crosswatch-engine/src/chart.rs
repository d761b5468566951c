//! Per-symbol indicator chart emission.
//!
//! The report renderer consumes one chart image per surfaced symbol; the
//! pipeline emits it before the event is recorded, so an event can never
//! exist without its chart input. Output is a self-contained SVG of the
//! MACD and signal lines with the crossover highlighted.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crosswatch_core::{Crossover, Direction, IndicatorSeries, Symbol};

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 40.0;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes one `<symbol>.svg` per instrument under a report directory.
#[derive(Debug, Clone)]
pub struct ChartWriter {
    dir: PathBuf,
}

impl ChartWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.dir.join(format!("{}.svg", symbol.cache_key()))
    }

    pub fn write(
        &self,
        symbol: &Symbol,
        indicators: &IndicatorSeries,
        crossover: Option<&Crossover>,
    ) -> Result<PathBuf, ChartError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(symbol);
        fs::write(&path, render_svg(symbol, indicators, crossover))?;
        Ok(path)
    }
}

fn render_svg(symbol: &Symbol, indicators: &IndicatorSeries, crossover: Option<&Crossover>) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{MARGIN}\" y=\"24\" font-family=\"sans-serif\" font-size=\"16\">MACD - {symbol}</text>\n"
    ));

    if indicators.len() >= 2 {
        let scale = Scale::fit(&indicators.macd, &indicators.signal);

        // Zero line for orientation.
        let zero_y = scale.y(0.0);
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN}\" y1=\"{zero_y:.1}\" x2=\"{:.1}\" y2=\"{zero_y:.1}\" \
             stroke=\"#cccccc\" stroke-dasharray=\"4 4\"/>\n",
            WIDTH - MARGIN
        ));

        svg.push_str(&polyline(&indicators.macd, &scale, "#1f77b4", 1.5));
        svg.push_str(&polyline(&indicators.signal, &scale, "#ff7f0e", 1.2));

        if let Some(cross) = crossover {
            if cross.index < indicators.len() {
                let color = match cross.direction {
                    Direction::Bullish => "green",
                    Direction::Bearish => "red",
                };
                svg.push_str(&format!(
                    "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" fill=\"{color}\"/>\n",
                    scale.x(cross.index),
                    scale.y(indicators.macd[cross.index]),
                ));
            }
        }
    } else {
        svg.push_str(&format!(
            "  <text x=\"{MARGIN}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"14\">\
             insufficient data</text>\n",
            HEIGHT / 2.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn polyline(values: &[f64], scale: &Scale, stroke: &str, width: f64) -> String {
    let points: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| format!("{:.1},{:.1}", scale.x(i), scale.y(v)))
        .collect();
    format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{width}\"/>\n",
        points.join(" ")
    )
}

struct Scale {
    len: usize,
    min: f64,
    max: f64,
}

impl Scale {
    fn fit(macd: &[f64], signal: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in macd.iter().chain(signal) {
            min = min.min(v);
            max = max.max(v);
        }
        // Degenerate flat series still needs a non-zero span.
        if (max - min).abs() < f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        Self {
            len: macd.len(),
            min,
            max,
        }
    }

    fn x(&self, index: usize) -> f64 {
        let span = (self.len.saturating_sub(1)).max(1) as f64;
        MARGIN + (index as f64 / span) * (WIDTH - 2.0 * MARGIN)
    }

    fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let ratio = (clamped - self.min) / (self.max - self.min);
        HEIGHT - MARGIN - ratio * (HEIGHT - 2.0 * MARGIN)
    }
}

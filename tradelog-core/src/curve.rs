//! Equity-curve layout — maps a variable-length trade sequence onto a
//! fixed-size logical canvas.
//!
//! This is a graphics-layout problem, not a value plot: the vertical axis is
//! dynamic-range compressed so near-flat ledgers don't amplify noise, and the
//! horizontal axis uses tiered fixed spacing so 2 trades and 200 trades both
//! render legibly.

use serde::{Deserialize, Serialize};

use crate::domain::{Outcome, TradeRecord};

/// Logical canvas dimensions for the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Logical width W.
    pub width: f64,
    /// Logical height H; the baseline sits at H/2.
    pub height: f64,
    /// Maximum vertical deviation D from the baseline.
    pub max_deviation: f64,
    /// Points are clamped to `[margin, W-margin] x [margin, H-margin]`.
    pub margin: f64,
}

impl CanvasSpec {
    pub fn baseline_y(&self) -> f64 {
        self.height / 2.0
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 760.0,
            height: 260.0,
            max_deviation: 100.0,
            margin: 20.0,
        }
    }
}

/// One marker on the curve, colored by the trade's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub outcome: Outcome,
    /// Capital after this trade, for tooltips/labels.
    pub running_capital: f64,
}

/// Polyline description: points in chronological order plus the flat
/// baseline. An empty `points` means "draw a flat line at `baseline_y`".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    pub points: Vec<CurvePoint>,
    pub baseline_y: f64,
    pub spacing: f64,
}

impl EquityCurve {
    pub fn is_flat(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lay out the curve for a display-order (newest-first) ledger.
///
/// Only closed trades with a decided outcome contribute points; they are
/// reversed to chronological order before the cumulative fold.
pub fn render(trades: &[TradeRecord], starting_capital: f64, canvas: &CanvasSpec) -> EquityCurve {
    let valid: Vec<&TradeRecord> = trades
        .iter()
        .rev()
        .filter(|t| t.counts_for_stats())
        .collect();

    let cy = canvas.baseline_y();
    if valid.is_empty() {
        return EquityCurve {
            points: Vec::new(),
            baseline_y: cy,
            spacing: 0.0,
        };
    }

    // Cumulative capital after each trade, oldest first.
    let mut running = Vec::with_capacity(valid.len());
    let mut capital = starting_capital;
    for trade in &valid {
        capital += trade.return_amount;
        running.push(capital);
    }

    // Vertical scale: compress the full capital range into the allowed
    // deviation. The 5%-of-capital floor keeps near-flat sequences from
    // being amplified into a dramatic-looking curve.
    let hi = running
        .iter()
        .copied()
        .fold(starting_capital, f64::max);
    let lo = running
        .iter()
        .copied()
        .fold(starting_capital, f64::min);
    let capital_range = hi - lo;
    let k = canvas.max_deviation / capital_range.max(starting_capital * 0.05);

    let spacing = horizontal_spacing(valid.len(), canvas);

    let points = valid
        .iter()
        .zip(running.iter())
        .enumerate()
        .map(|(i, (trade, &cap))| {
            let x = ((i + 1) as f64 * spacing).min(canvas.width - canvas.margin);
            let y = (cy - (cap - starting_capital) * k)
                .clamp(canvas.margin, canvas.height - canvas.margin);
            CurvePoint {
                x,
                y,
                outcome: trade.outcome,
                running_capital: cap,
            }
        })
        .collect();

    EquityCurve {
        points,
        baseline_y: cy,
        spacing,
    }
}

/// Tiered fixed spacing by trade count, with auto-fit fallback.
///
/// Few trades get wide spacing so a two-trade journal doesn't collapse into
/// a sliver at the left edge; once the fixed tier would push the last point
/// past the right margin, the spacing switches to `W / (n+1)`.
fn horizontal_spacing(n: usize, canvas: &CanvasSpec) -> f64 {
    let fixed = match n {
        0..=3 => 80.0,
        4..=6 => 60.0,
        7..=12 => 40.0,
        13..=24 => 25.0,
        _ => return canvas.width / (n + 1) as f64,
    };
    if n as f64 * fixed > canvas.width - canvas.margin {
        canvas.width / (n + 1) as f64
    } else {
        fixed
    }
}

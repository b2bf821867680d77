//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one glyph per series, later series drawn on top
//! - exclusion ranges marked with `#` on a strip under the grid

/// A named series sampled on the plot's wavelength axis.
#[derive(Debug, Clone, Copy)]
pub struct PlotSeries<'a> {
    pub label: &'a str,
    pub glyph: char,
    pub values: &'a [f64],
}

/// Plot original, smoothed and unblended flux against wavelength.
pub fn render_smoothing_plot(
    wavelength: &[f64],
    raw: &[f64],
    fitted: &[f64],
    unblended: &[f64],
    shaded: &[(f64, f64)],
    width: usize,
    height: usize,
) -> String {
    let series = [
        PlotSeries {
            label: "original",
            glyph: '.',
            values: raw,
        },
        PlotSeries {
            label: "no blend",
            glyph: '+',
            values: unblended,
        },
        PlotSeries {
            label: "smoothed",
            glyph: '*',
            values: fitted,
        },
    ];
    render_plot(wavelength, &series, shaded, width, height)
}

/// Plot any number of series against wavelength.
pub fn render_plot(
    wavelength: &[f64],
    series: &[PlotSeries<'_>],
    shaded: &[(f64, f64)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = finite_range(wavelength.iter().copied()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) =
        finite_range(series.iter().flat_map(|s| s.values.iter().copied())).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for s in series {
        draw_series(&mut grid, wavelength, s, (x_min, x_max), (y_min, y_max));
    }

    let mut strip = vec![' '; width];
    for &(a, b) in shaded {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let c0 = map_x(lo, x_min, x_max, width);
        let c1 = map_x(hi, x_min, x_max, width);
        for c in strip.iter_mut().take(c1 + 1).skip(c0) {
            *c = '#';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: λ=[{x_min:.4}, {x_max:.4}] | flux=[{y_min:.4}, {y_max:.4}]\n"
    ));
    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.glyph, s.label)).collect();
    out.push_str(&legend.join("  "));
    out.push('\n');

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if !shaded.is_empty() {
        out.push_str(&strip.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn draw_series(
    grid: &mut [Vec<char>],
    wavelength: &[f64],
    series: &PlotSeries<'_>,
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) {
    let height = grid.len();
    let width = grid[0].len();

    // Connect consecutive samples; a masked sample breaks the line.
    let mut prev: Option<(usize, usize)> = None;
    for (&x, &y) in wavelength.iter().zip(series.values.iter()) {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, cx, cy, series.glyph),
            None => grid[cy][cx] = series.glyph,
        }
        prev = Some((cx, cy));
    }
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Both endpoints are drawn.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

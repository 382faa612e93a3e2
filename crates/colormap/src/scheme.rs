//! Color schemes and multi-stop interpolation engine.

use geosplat_core::io::Palette;

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Available color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Black -> White
    Grayscale,
    /// White -> Black
    InvertedGrayscale,
    /// Black -> Red -> Yellow -> White
    Hot,
}

impl ColorScheme {
    /// 256-entry table sampling the scheme at `level / 255`
    pub fn palette(&self) -> Palette {
        Palette::from_fn(|level| {
            let Rgb { r, g, b } = evaluate(*self, level as f64 / 255.0);
            [r, g, b]
        })
    }
}

/// Gray ramp written as the color table of an output raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrayRamp {
    /// `level -> (level, level, level)`
    Straight,
    /// `level -> (255 - level, 255 - level, 255 - level)`
    #[default]
    Inverted,
}

impl GrayRamp {
    pub fn scheme(&self) -> ColorScheme {
        match self {
            GrayRamp::Straight => ColorScheme::Grayscale,
            GrayRamp::Inverted => ColorScheme::InvertedGrayscale,
        }
    }

    pub fn palette(&self) -> Palette {
        self.scheme().palette()
    }
}

// Breakpoints of the classic "hot" map: red rises first, then green, then blue
const HOT_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 11, 0, 0),
    ColorStop::new(0.365079, 255, 0, 0),
    ColorStop::new(0.746032, 255, 255, 0),
    ColorStop::new(1.0, 255, 255, 255),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= stops[0].t {
        return stops[0].color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.t {
            return lerp_color(lo.color, hi.color, (t - lo.t) / (hi.t - lo.t));
        }
    }
    stops[stops.len() - 1].color
}

fn gray(t: f64) -> u8 {
    (t.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Evaluate a color scheme at normalized position `t` ∈ [0, 1].
///
/// Positions outside the interval clamp to the end colors.
pub fn evaluate(scheme: ColorScheme, t: f64) -> Rgb {
    match scheme {
        ColorScheme::Grayscale => {
            let v = gray(t);
            Rgb::new(v, v, v)
        }
        ColorScheme::InvertedGrayscale => {
            let v = 255 - gray(t);
            Rgb::new(v, v, v)
        }
        ColorScheme::Hot => multi_stop(HOT_STOPS, t),
    }
}

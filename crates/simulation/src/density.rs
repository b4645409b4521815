//! Population density field for the city generator.
//!
//! A scalar value per cell computed once for the whole grid and cached.
//! The primary term is a tiered radial falloff from the map center; a
//! small set of secondary centers add exponential-decay bumps. The road
//! grower samples this field to bias branching toward dense areas.

/// A weighted secondary density center (a suburb nucleus).
#[derive(Debug, Clone, Copy)]
pub struct DensityCenter {
    pub x: f32,
    pub y: f32,
    pub strength: f32,
}

/// Secondary centers only influence cells within this radius.
const SECONDARY_RADIUS: f32 = 10.0;

/// Total secondary contribution per cell is clamped to this value.
const SECONDARY_CAP: f32 = 0.6;

/// Cached per-cell population density. Pure function of the map
/// dimensions and the center list; deterministic, no failure modes.
pub struct PopulationDensityField {
    values: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl PopulationDensityField {
    pub fn compute(width: usize, height: usize, secondary: &[DensityCenter]) -> Self {
        let cx = (width / 2) as f32;
        let cy = (height / 2) as f32;
        let mut values = vec![0.0; width * height];
        for y in 0..height {
            for x in 0..width {
                let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                let primary = primary_falloff(d);

                let mut bump = 0.0;
                for c in secondary {
                    let sd = ((x as f32 - c.x).powi(2) + (y as f32 - c.y).powi(2)).sqrt();
                    if sd < SECONDARY_RADIUS {
                        bump += c.strength * (-sd / 5.0).exp();
                    }
                }
                values[y * width + x] = primary + bump.min(SECONDARY_CAP);
            }
        }
        Self {
            values,
            width,
            height,
        }
    }

    /// A uniform field, used by tests to drive adversarial branching.
    pub fn uniform(width: usize, height: usize, value: f32) -> Self {
        Self {
            values: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn density_at(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }
}

/// 4-tier piecewise-linear falloff: dense core, inner city, urban ring,
/// then a suburb floor that never drops below 0.1.
fn primary_falloff(d: f32) -> f32 {
    if d < 8.0 {
        1.0
    } else if d < 15.0 {
        0.85 - (d - 8.0) * 0.05
    } else if d < 25.0 {
        0.5 - (d - 15.0) * 0.03
    } else {
        (0.2 - (d - 25.0) * 0.01).max(0.1)
    }
}

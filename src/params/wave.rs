//! Analytic wave field coefficients.

/// One sinusoidal component: `amplitude * sin(kx*x + kz*z + omega*t + phase)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTerm {
    /// Peak displacement (meters)
    pub amplitude_m: f32,

    /// Spatial frequency along X (radians per meter)
    pub kx: f32,

    /// Spatial frequency along Z (radians per meter)
    pub kz: f32,

    /// Temporal frequency (radians per second)
    pub omega: f32,

    /// Phase offset (radians)
    pub phase: f32,
}

/// Height field: still-water level plus three travelling sinusoids
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParams {
    /// Still-water level above the floor plane (meters)
    pub base_height_m: f32,

    pub terms: [WaveTerm; 3],
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            base_height_m: 2.0,
            terms: [
                // Long swell along X
                WaveTerm {
                    amplitude_m: 0.05,
                    kx: 4.0,
                    kz: 0.0,
                    omega: 1.3,
                    phase: 0.0,
                },
                // Cross swell along Z
                WaveTerm {
                    amplitude_m: 0.04,
                    kx: 0.0,
                    kz: 5.0,
                    omega: 1.9,
                    phase: 1.1,
                },
                // Diagonal chop
                WaveTerm {
                    amplitude_m: 0.03,
                    kx: 3.5,
                    kz: 3.0,
                    omega: 2.7,
                    phase: 2.3,
                },
            ],
        }
    }
}

impl WaveParams {
    /// Still water (all amplitudes zero), useful for flat-surface reasoning
    pub fn flat(base_height_m: f32) -> Self {
        let mut params = Self::default();
        params.base_height_m = base_height_m;
        for term in &mut params.terms {
            term.amplitude_m = 0.0;
        }
        params
    }
}

/// 2D point or offset in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Degrees to radians, as the surface `rotate` call expects.
pub fn to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_convert() {
        assert!((to_radians(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((to_radians(-90.0) + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(to_radians(0.0), 0.0);
    }
}

//! Underwater fog.
//!
//! Density follows the water line automatically (thin above the surface, thick below)
//! unless `manual` is set, in which case it is left to whoever edits the fog.

use glam::Vec4;

/// Height of the water surface.
pub const WATER_LEVEL: f32 = 0.0;
/// Density used while the viewer is above [`WATER_LEVEL`].
pub const AIR_DENSITY: f32 = 0.01;
/// Density used while the viewer is submerged.
pub const WATER_DENSITY: f32 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum FogMode {
    Linear = 0,
    #[default]
    Exp = 1,
    Exp2 = 2,
}

/// How the distance fed into the fog equation is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum FogDepth {
    /// Depth along the view axis.
    PlaneBased = 0,
    /// Euclidean distance from the eye.
    #[default]
    RangeBased = 1,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub mode: FogMode,
    pub depth: FogDepth,
    pub density: f32,
    /// Linear-mode start distance.
    pub start: f32,
    /// Linear-mode end distance.
    pub end: f32,
    pub color: Vec4,
    pub enabled: bool,
    /// Disables the automatic density rule.
    pub manual: bool,
}

impl Default for Fog {
    fn default() -> Self {
        Self::new(0.1, 250.0)
    }
}

impl Fog {
    /// Fog spanning `start..end` for linear mode.
    pub fn new(start: f32, end: f32) -> Self {
        debug_assert!(start < end, "fog start must precede fog end");
        Self {
            mode: FogMode::default(),
            depth: FogDepth::default(),
            density: WATER_DENSITY,
            start,
            end,
            color: Vec4::new(0.266, 0.5, 0.609, 1.0),
            enabled: true,
            manual: false,
        }
    }

    /// Sets density from the height of the viewer unless the fog is manual.
    pub fn apply_auto_rule(&mut self, viewer_y: f32) {
        if self.manual {
            return;
        }
        self.density = if viewer_y >= WATER_LEVEL {
            AIR_DENSITY
        } else {
            WATER_DENSITY
        };
    }

    /// Fraction of the surface colour that survives at `distance` (1 means no fog).
    pub fn visibility(&self, distance: f32) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let f = match self.mode {
            FogMode::Linear => (self.end - distance) / (self.end - self.start),
            FogMode::Exp => (-self.density * distance).exp(),
            FogMode::Exp2 => (-(self.density * distance).powi(2)).exp(),
        };
        f.clamp(0.0, 1.0)
    }

    pub fn uniform(&self) -> FogUniform {
        FogUniform {
            color: self.color.to_array(),
            params: [self.density, self.start, self.end, 0.0],
            flags: [self.mode as u32, self.depth as u32, self.enabled as u32, 0],
        }
    }
}

/// Fog as laid out in the frame uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FogUniform {
    pub color: [f32; 4],
    /// density, start, end, unused
    pub params: [f32; 4],
    /// mode, depth, enabled, unused
    pub flags: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn auto_rule_follows_water_line() {
        let mut fog = Fog::default();
        fog.apply_auto_rule(-1.0);
        assert_eq!(fog.density, 0.15);
        fog.apply_auto_rule(1.0);
        assert_eq!(fog.density, 0.01);
        fog.apply_auto_rule(0.0);
        assert_eq!(fog.density, 0.01);
    }

    #[test]
    fn manual_fog_ignores_auto_rule() {
        let mut fog = Fog::default();
        fog.manual = true;
        fog.density = 0.4;
        fog.apply_auto_rule(10.0);
        assert_eq!(fog.density, 0.4);
    }

    #[test]
    fn visibility_per_mode() {
        let mut fog = Fog::new(0.0, 100.0);
        fog.density = 0.1;
        assert_relative_eq!(fog.visibility(10.0), (-1.0f32).exp());

        fog.mode = FogMode::Exp2;
        assert_relative_eq!(fog.visibility(10.0), (-1.0f32).exp());
        assert!(fog.visibility(20.0) < (-2.0f32).exp());

        fog.mode = FogMode::Linear;
        assert_relative_eq!(fog.visibility(25.0), 0.75);
        assert_eq!(fog.visibility(500.0), 0.0);

        fog.enabled = false;
        assert_eq!(fog.visibility(500.0), 1.0);
    }

    #[test]
    fn uniform_carries_flags() {
        let fog = Fog::default();
        let u = fog.uniform();
        assert_eq!(std::mem::size_of::<FogUniform>(), 48);
        assert_eq!(u.flags, [FogMode::Exp as u32, FogDepth::RangeBased as u32, 1, 0]);
        assert_eq!(u.params[0], 0.15);
    }
}

//! Light sources and their packed uniform form.
//!
//! The scene owns a fixed set of lights for the whole session: one directional light,
//! [`POINT_LIGHTS`] point lights, and [`SPOT_LIGHTS`] spot lights. [`Lights::uniforms`]
//! packs them into one array so the renderer uploads them in a single write.

use glam::{Vec3, Vec4};

/// Number of point lights in the scene.
pub const POINT_LIGHTS: usize = 5;
/// Number of spot lights in the scene.
pub const SPOT_LIGHTS: usize = 2;
/// Total light slots uploaded per frame.
pub const LIGHT_SLOTS: usize = 1 + POINT_LIGHTS + SPOT_LIGHTS;

/// Index of the point light that rides on the ROV.
pub const ROV_LAMP: usize = 4;
/// Index of the ROV headlight.
pub const ROV_SPOT: usize = 0;
/// Index of the ghost-camera flashlight.
pub const GHOST_SPOT: usize = 1;

/// Widest outer cutoff a spot light accepts, in degrees.
pub const MAX_OUTER_CUTOFF: f32 = 40.0;
/// Narrowest gap kept between the inner and outer cutoff, in degrees.
pub const CUTOFF_GAP: f32 = 1.0;

/// Which kind of light a uniform slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Caster {
    Directional = 0,
    Point = 1,
    Spot = 2,
}

/// Ambient, diffuse, and specular colours of a light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for LightColor {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.05),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
        }
    }
}

/// Distance falloff `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

impl Attenuation {
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: LightColor,
    pub enabled: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.2, -1.0, -0.3),
            color: LightColor::default(),
            enabled: false,
        }
    }
}

impl DirectionalLight {
    /// Diffuse colour of the slow sky colour cycle at time `t` seconds.
    pub fn day_cycle(t: f32) -> Vec3 {
        Vec3::new((t * 0.475).sin(), (t * 0.495).sin(), (t * 0.5).sin()) / 2.0 + 0.5
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
    pub enabled: bool,
}

impl PointLight {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            color: LightColor::default(),
            attenuation: Attenuation::default(),
            enabled: true,
        }
    }
}

/// A cone light with a smooth edge between `cutoff` and `outer_cutoff`.
///
/// Both angles are in degrees. The setters keep `cutoff < outer_cutoff` for any input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
    /// Falloff exponent used when the renderer selects exponent mode.
    pub exponent: f32,
    pub enabled: bool,
    cutoff: f32,
    outer_cutoff: f32,
}

impl SpotLight {
    pub fn with_cutoffs(cutoff: f32, outer_cutoff: f32) -> Self {
        let mut light = Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            color: LightColor::default(),
            attenuation: Attenuation::default(),
            exponent: 16.0,
            enabled: true,
            cutoff: 0.0,
            outer_cutoff: MAX_OUTER_CUTOFF,
        };
        light.set_outer_cutoff(outer_cutoff);
        light.set_cutoff(cutoff);
        light
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn outer_cutoff(&self) -> f32 {
        self.outer_cutoff
    }

    /// Sets the inner angle, clamped below the outer angle.
    pub fn set_cutoff(&mut self, degrees: f32) {
        self.cutoff = degrees.clamp(0.0, self.outer_cutoff - CUTOFF_GAP);
    }

    /// Sets the outer angle and pulls the inner angle in when needed.
    pub fn set_outer_cutoff(&mut self, degrees: f32) {
        self.outer_cutoff = degrees.clamp(CUTOFF_GAP, MAX_OUTER_CUTOFF);
        self.cutoff = self.cutoff.min(self.outer_cutoff - CUTOFF_GAP);
    }

    /// Aims the light from `position` along `direction`.
    pub fn track(&mut self, position: Vec3, direction: Vec3) {
        self.position = position;
        self.direction = direction;
    }
}

/// Every light in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Lights {
    pub directional: DirectionalLight,
    pub points: [PointLight; POINT_LIGHTS],
    pub spots: [SpotLight; SPOT_LIGHTS],
}

impl Default for Lights {
    fn default() -> Self {
        let mut points = [
            PointLight::at(Vec3::new(10.0, 10.0, 35.0)),
            PointLight::at(Vec3::new(-45.0, 5.0, 30.0)),
            PointLight::at(Vec3::new(38.0, 2.0, -40.0)),
            PointLight::at(Vec3::new(-50.0, 15.0, -45.0)),
            PointLight::at(Vec3::ZERO),
        ];
        points[ROV_LAMP].color.diffuse = Vec3::X;
        points[ROV_LAMP].color.specular = Vec3::ZERO;

        let mut flashlight = SpotLight::with_cutoffs(12.0, 26.0);
        flashlight.enabled = false;

        Self {
            directional: DirectionalLight::default(),
            points,
            spots: [SpotLight::with_cutoffs(25.0, 40.0), flashlight],
        }
    }
}

impl Lights {
    /// Packs the lights into uniform slots: directional, then points, then spots.
    pub fn uniforms(&self) -> [LightUniform; LIGHT_SLOTS] {
        let mut slots = [LightUniform::default(); LIGHT_SLOTS];

        let d = &self.directional;
        slots[0] = LightUniform {
            direction: d.direction.extend(0.0).to_array(),
            ..LightUniform::colored(Caster::Directional, &d.color, d.enabled)
        };

        for (slot, p) in slots[1..].iter_mut().zip(&self.points) {
            *slot = LightUniform {
                position: p.position.extend(1.0).to_array(),
                attenuation: attenuation(&p.attenuation, 0.0),
                ..LightUniform::colored(Caster::Point, &p.color, p.enabled)
            };
        }

        for (slot, s) in slots[1 + POINT_LIGHTS..].iter_mut().zip(&self.spots) {
            *slot = LightUniform {
                position: s.position.extend(1.0).to_array(),
                direction: s.direction.extend(0.0).to_array(),
                attenuation: attenuation(&s.attenuation, s.exponent),
                cutoff: [
                    s.cutoff.to_radians().cos(),
                    s.outer_cutoff.to_radians().cos(),
                ],
                ..LightUniform::colored(Caster::Spot, &s.color, s.enabled)
            };
        }

        slots
    }
}

fn attenuation(a: &Attenuation, exponent: f32) -> [f32; 4] {
    [a.constant, a.linear, a.quadratic, exponent]
}

/// One light as laid out in the frame uniform buffer (112 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, exponent
    pub attenuation: [f32; 4],
    /// cos(cutoff), cos(outer cutoff)
    pub cutoff: [f32; 2],
    pub caster: u32,
    pub enabled: u32,
}

impl LightUniform {
    fn colored(caster: Caster, color: &LightColor, enabled: bool) -> Self {
        Self {
            ambient: Vec4::from((color.ambient, 1.0)).to_array(),
            diffuse: Vec4::from((color.diffuse, 1.0)).to_array(),
            specular: Vec4::from((color.specular, 1.0)).to_array(),
            caster: caster as u32,
            enabled: enabled as u32,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_is_112_bytes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 112);
    }

    #[test]
    fn defaults_match_scene_setup() {
        let lights = Lights::default();
        assert!(!lights.directional.enabled);
        assert!(lights.points.iter().all(|p| p.enabled));
        assert_eq!(lights.points[ROV_LAMP].color.diffuse, Vec3::X);
        assert!(lights.spots[ROV_SPOT].enabled);
        assert!(!lights.spots[GHOST_SPOT].enabled);
        assert_eq!(lights.spots[ROV_SPOT].cutoff(), 25.0);
        assert_eq!(lights.spots[GHOST_SPOT].outer_cutoff(), 26.0);
    }

    #[test]
    fn cutoff_stays_below_outer_for_any_sequence() {
        let mut spot = SpotLight::with_cutoffs(25.0, 40.0);
        let inputs = [
            (90.0, 10.0),
            (-5.0, 0.0),
            (39.5, 40.0),
            (12.0, -20.0),
            (100.0, 100.0),
            (1.0, 1.5),
        ];
        for (cutoff, outer) in inputs {
            spot.set_cutoff(cutoff);
            assert!(spot.cutoff() < spot.outer_cutoff());
            spot.set_outer_cutoff(outer);
            assert!(spot.cutoff() < spot.outer_cutoff());
            assert!(spot.cutoff() >= 0.0);
            assert!(spot.outer_cutoff() <= MAX_OUTER_CUTOFF);
        }
    }

    #[test]
    fn with_cutoffs_orders_inverted_input() {
        let spot = SpotLight::with_cutoffs(30.0, 20.0);
        assert_eq!(spot.outer_cutoff(), 20.0);
        assert_eq!(spot.cutoff(), 19.0);
    }

    #[test]
    fn uniforms_use_fixed_slots() {
        let lights = Lights::default();
        let slots = lights.uniforms();
        assert_eq!(slots[0].caster, Caster::Directional as u32);
        assert_eq!(slots[0].enabled, 0);
        assert!(slots[1..=POINT_LIGHTS]
            .iter()
            .all(|s| s.caster == Caster::Point as u32));
        assert_eq!(slots[1 + ROV_LAMP].diffuse, [1.0, 0.0, 0.0, 1.0]);

        let spot = &slots[1 + POINT_LIGHTS + ROV_SPOT];
        assert_eq!(spot.caster, Caster::Spot as u32);
        assert_relative_eq!(spot.cutoff[0], 25f32.to_radians().cos());
        assert_relative_eq!(spot.cutoff[1], 40f32.to_radians().cos());
        assert_eq!(spot.attenuation[3], 16.0);
    }

    #[test]
    fn day_cycle_stays_in_unit_range() {
        for i in 0..200 {
            let c = DirectionalLight::day_cycle(i as f32 * 0.37);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
        assert_eq!(DirectionalLight::day_cycle(0.0), Vec3::splat(0.5));
    }

    #[test]
    fn attenuation_is_one_at_source() {
        assert_eq!(Attenuation::default().factor(0.0), 1.0);
        assert!(Attenuation::default().factor(10.0) < 0.5);
    }
}

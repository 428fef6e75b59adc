//! Declarative part hierarchies and the traversal that draws them.
//!
//! A [`Part`] carries a local transform, an optional shape, and child parts. [`walk`]
//! pushes the [`TransformStack`] for every part, applies the local transform, emits the
//! shape with the accumulated matrix, recurses, and pops. The shape's own matrix
//! (usually a scale) applies to that shape only and is not inherited by the children.
//!
//! ```
//! use bathyscope::rig::{self, Primitive};
//! use bathyscope::TransformStack;
//!
//! let mut stack = TransformStack::new();
//! let mut cubes = 0;
//! rig::walk(&rig::rov(0.0), &mut stack, &mut |primitive, _, _| {
//!     cubes += (primitive == Primitive::Cube) as usize;
//! });
//! assert_eq!(stack.depth(), 1);
//! assert!(cubes > 0);
//! ```

use glam::{Mat4, Vec3};

use crate::material::Material;
use crate::transform_stack::TransformStack;

/// Mesh a shape is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Unit cube centered at the origin.
    Cube,
    /// Sphere of radius 1.
    Sphere,
}

/// Something drawable at a part.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub primitive: Primitive,
    /// Applied after the part's local transform, for this shape only.
    pub matrix: Mat4,
    pub material: Material,
}

/// A node of a part hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Part {
    pub local: Mat4,
    pub shape: Option<Shape>,
    pub children: Vec<Part>,
}

impl Part {
    /// Empty part placed by `local`.
    pub fn new(local: Mat4) -> Self {
        Self {
            local,
            shape: None,
            children: Vec::new(),
        }
    }

    /// Part at `local` drawing `primitive` with no extra shape transform.
    pub fn leaf(local: Mat4, primitive: Primitive, material: Material) -> Self {
        Self::new(local).shape(primitive, Mat4::IDENTITY, material)
    }

    pub fn shape(mut self, primitive: Primitive, matrix: Mat4, material: Material) -> Self {
        self.shape = Some(Shape {
            primitive,
            matrix,
            material,
        });
        self
    }

    pub fn child(mut self, child: Part) -> Self {
        self.children.push(child);
        self
    }

    /// Number of shapes in this subtree.
    pub fn shape_count(&self) -> usize {
        self.shape.is_some() as usize + self.children.iter().map(Part::shape_count).sum::<usize>()
    }
}

/// Draws `part` and its subtree relative to the current top of `stack`.
///
/// The stack is left at the depth it had on entry.
pub fn walk<F>(part: &Part, stack: &mut TransformStack, emit: &mut F)
where
    F: FnMut(Primitive, Mat4, &Material),
{
    stack.push();
    stack.save(part.local);

    if let Some(shape) = &part.shape {
        emit(shape.primitive, stack.top() * shape.matrix, &shape.material);
    }
    for child in &part.children {
        walk(child, stack, emit);
    }

    stack.pop();
}

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

fn scale(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

/// Gunmetal used by the arm, engine, and blades.
fn steel(level: f32, shininess: f32) -> Material {
    Material::gray(level, 0.774597, shininess)
}

/// The ROV model in its own space; `engine_angle` spins the propeller (degrees).
pub fn rov(engine_angle: f32) -> Part {
    let head = Part::new(Mat4::IDENTITY).shape(
        Primitive::Cube,
        scale(1.0, 0.6, 2.0),
        Material::colored(
            Vec3::new(1.0, 0.956862745, 0.580392157),
            Vec3::new(1.0, 0.956862745, 0.580392157),
            Vec3::new(0.893548, 0.771906, 0.866721),
            256.0,
        ),
    );

    let camera_pod = Part::leaf(
        translate(0.0, 0.0, -0.95) * scale(0.2, 0.2, 0.3),
        Primitive::Cube,
        Material::gray(0.1, 0.5, 16.0),
    );

    let finger = |x: f32, degrees: f32| {
        Part::leaf(
            translate(x, 0.0, 0.0)
                * Mat4::from_rotation_y(degrees.to_radians())
                * scale(0.05, 0.2, 0.2),
            Primitive::Cube,
            steel(0.2, 64.0),
        )
    };
    let gripper = Part::new(translate(0.0, 0.0, -0.1))
        .child(finger(-0.05, 45.0))
        .child(finger(0.05, -45.0));

    let claw = Part::new(translate(0.0, 0.0, -1.0))
        .shape(Primitive::Sphere, Mat4::from_scale(Vec3::splat(0.1)), steel(0.4, 64.0))
        .child(gripper);

    let arm = Part::leaf(
        translate(0.0, 0.0, -0.5)
            * Mat4::from_rotation_x(90f32.to_radians())
            * scale(0.05, 1.0, 0.05),
        Primitive::Cube,
        steel(0.2, 64.0),
    );

    let wrist = Part::new(translate(0.0, -0.3, 0.0))
        .shape(Primitive::Sphere, Mat4::from_scale(Vec3::splat(0.15)), steel(0.4, 64.0))
        .child(arm)
        .child(claw);

    let forearm = Part::new(translate(0.0, -0.3, 0.0))
        .shape(Primitive::Cube, scale(0.05, 0.6, 0.05), steel(0.2, 64.0))
        .child(wrist);

    let hand = Part::new(translate(0.0, -0.2, -0.4))
        .shape(Primitive::Sphere, Mat4::from_scale(Vec3::splat(0.2)), steel(0.4, 64.0))
        .child(forearm);

    let blade = |degrees: f32| {
        Part::leaf(
            Mat4::from_rotation_z(degrees.to_radians())
                * translate(0.0, 0.3, 0.0)
                * scale(0.2, 0.6, 0.05),
            Primitive::Cube,
            steel(0.2, 16.0),
        )
    };
    let propeller = Part::new(
        translate(0.0, 0.0, 0.3) * Mat4::from_rotation_z(engine_angle.to_radians()),
    )
    .shape(Primitive::Sphere, scale(0.2, 0.2, 0.1), steel(0.4, 16.0))
    .child(blade(0.0))
    .child(blade(120.0))
    .child(blade(240.0));

    let engine = Part::new(translate(0.0, 0.0, 1.1))
        .shape(Primitive::Cube, scale(0.1, 0.1, 0.6), steel(0.2, 64.0))
        .child(propeller);

    let body = Part::new(translate(0.0, -0.5, 0.0))
        .shape(Primitive::Cube, scale(0.8, 0.4, 1.6), steel(0.611764706, 16.0))
        .child(camera_pod)
        .child(hand)
        .child(engine);

    Part::new(Mat4::IDENTITY).child(head).child(body)
}

/// The marker drawn where the inactive camera sits.
///
/// The lens inherits the body's scale.
pub fn camera() -> Part {
    Part::leaf(
        scale(1.0, 0.8, 1.8),
        Primitive::Cube,
        Material::gray(0.2, 0.774597, 32.0),
    )
    .child(Part::leaf(
        translate(0.0, 0.0, -0.2) * scale(0.6, 0.6, 1.2),
        Primitive::Cube,
        Material::gray(0.25, 0.774597, 32.0),
    ))
}

/// Origin sphere plus red, green, and blue bars along X, Y, and Z.
pub fn axis() -> Part {
    let bar = |offset: Vec3, size: Vec3, color: Vec3| {
        Part::leaf(
            Mat4::from_translation(offset) * Mat4::from_scale(size),
            Primitive::Cube,
            Material::colored(color, color, color, 64.0).emissive(),
        )
    };

    Part::new(Mat4::IDENTITY)
        .shape(
            Primitive::Sphere,
            Mat4::from_scale(Vec3::splat(0.2)),
            Material::colored(Vec3::splat(0.1), Vec3::splat(0.2), Vec3::splat(0.4), 64.0)
                .emissive(),
        )
        .child(bar(Vec3::new(1.5, 0.0, 0.0), Vec3::new(3.0, 0.1, 0.1), Vec3::X))
        .child(bar(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.1, 3.0, 0.1), Vec3::Y))
        .child(bar(Vec3::new(0.0, 0.0, 1.5), Vec3::new(0.1, 0.1, 3.0), Vec3::Z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(part: &Part, root: Mat4) -> Vec<(Primitive, Mat4)> {
        let mut stack = TransformStack::with_root(root);
        let mut out = Vec::new();
        walk(part, &mut stack, &mut |p, m, _| out.push((p, m)));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), root);
        out
    }

    #[test]
    fn rov_draws_every_shape() {
        let rov = rov(0.0);
        // head, body, pod, hand, forearm, wrist, arm, claw, 2 fingers, engine, hub, 3 blades
        assert_eq!(rov.shape_count(), 15);
        let drawn = collect(&rov, Mat4::IDENTITY);
        assert_eq!(drawn.len(), 15);
        let spheres = drawn.iter().filter(|(p, _)| *p == Primitive::Sphere).count();
        assert_eq!(spheres, 4);
    }

    #[test]
    fn shape_scale_is_not_inherited() {
        let drawn = collect(&rov(0.0), Mat4::IDENTITY);
        // camera pod: body offset + pod offset, scaled only by its own shape
        let pod = drawn[2].1;
        let center = pod.transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(0.0, -0.5, -0.95), 1e-6));
        let extent = pod.transform_vector3(Vec3::X);
        assert!(extent.abs_diff_eq(Vec3::new(0.2, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn nested_offsets_accumulate() {
        let drawn = collect(&rov(0.0), Mat4::IDENTITY);
        // claw joint sits under body, hand, forearm, wrist, and its own offset
        let claw = drawn[7].1.transform_point3(Vec3::ZERO);
        assert!(claw.abs_diff_eq(Vec3::new(0.0, -1.3, -1.4), 1e-5));
    }

    #[test]
    fn engine_angle_spins_blades_only() {
        let still = collect(&rov(0.0), Mat4::IDENTITY);
        let spun = collect(&rov(90.0), Mat4::IDENTITY);
        assert_eq!(still[..11], spun[..11]);
        assert_ne!(still[12].1, spun[12].1);
        // hub center stays put
        assert!(still[11].1.transform_point3(Vec3::ZERO).abs_diff_eq(
            spun[11].1.transform_point3(Vec3::ZERO),
            1e-6
        ));
    }

    #[test]
    fn root_transform_places_rig() {
        let root = Mat4::from_translation(Vec3::new(5.0, -1.0, 2.0));
        let drawn = collect(&rov(0.0), root);
        assert!(drawn[0].1.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(5.0, -1.0, 2.0), 1e-6));
    }

    #[test]
    fn camera_lens_inherits_body_scale() {
        let drawn = collect(&camera(), Mat4::IDENTITY);
        assert_eq!(drawn.len(), 2);
        let lens_center = drawn[1].1.transform_point3(Vec3::ZERO);
        assert!(lens_center.abs_diff_eq(Vec3::new(0.0, 0.0, -0.36), 1e-6));
        let lens_depth = drawn[1].1.transform_vector3(Vec3::Z);
        assert!(lens_depth.abs_diff_eq(Vec3::new(0.0, 0.0, 1.8 * 1.2), 1e-5));
    }

    #[test]
    fn axis_is_emissive() {
        let axis = axis();
        let mut stack = TransformStack::new();
        let mut count = 0;
        walk(&axis, &mut stack, &mut |_, _, m| {
            assert!(m.emissive);
            count += 1;
        });
        assert_eq!(count, 4);
    }
}

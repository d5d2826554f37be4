use bytemuck::{Pod, Zeroable};

use super::hitable::{Hitable, Shape};
use crate::math::Vector;

/// The wire form of one scene primitive, byte-exact to the uniform block the
/// shader indexes by record stride.
///
/// Every 3-component vector occupies a padded 4-float slot so that it starts
/// on a 16-byte boundary; the scalar and UV fields are packed after the
/// vector block. Do not reorder fields: the layout is shared with the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PackedHitable {
    pub center: [f32; 4],
    pub normal: [f32; 4],
    pub point: [f32; 4],
    pub a: [f32; 4],
    pub b: [f32; 4],
    pub c: [f32; 4],
    pub color: [f32; 4],
    /// -1 none, 0 sphere, 1 plane, 2 triangle.
    pub kind: i32,
    pub radius: f32,
    /// -1 none, 1 diffuse, 2 reflective, 3 diffuse+reflective, 4 dielectric.
    pub material: i32,
    pub fuzz: f32,
    pub ref_idx: f32,
    /// Index into the shader's texture array, -1 untextured.
    pub tex_id: i32,
    pub uv_a: [f32; 2],
    pub uv_b: [f32; 2],
    pub uv_c: [f32; 2],
}

/// Record stride in the uniform buffer.
pub const PACKED_HITABLE_SIZE: usize = 160;

impl PackedHitable {
    /// The record an unpopulated world slot uploads as.
    pub const EMPTY: PackedHitable = PackedHitable {
        center: [0.0; 4],
        normal: [0.0; 4],
        point: [0.0; 4],
        a: [0.0; 4],
        b: [0.0; 4],
        c: [0.0; 4],
        color: [0.0; 4],
        kind: -1,
        radius: 0.0,
        material: -1,
        fuzz: 0.0,
        ref_idx: 0.0,
        tex_id: -1,
        uv_a: [0.0; 2],
        uv_b: [0.0; 2],
        uv_c: [0.0; 2],
    };
}

impl Default for PackedHitable {
    fn default() -> PackedHitable {
        PackedHitable::EMPTY
    }
}

/// Pads a vector into a 16-byte slot; missing components become zero.
fn vec3(v: &Vector<f32>) -> [f32; 4] {
    let mut padded = [0.0; 4];
    for (slot, value) in padded.iter_mut().take(3).zip(v.iter()) {
        *slot = value;
    }
    padded
}

impl From<&Hitable> for PackedHitable {
    fn from(hitable: &Hitable) -> PackedHitable {
        let mut packed = PackedHitable::EMPTY;

        let material = &hitable.material;
        packed.material = material.kind.tag();
        packed.fuzz = material.fuzz;
        packed.ref_idx = material.ref_idx;
        packed.color = [
            material.color.r,
            material.color.g,
            material.color.b,
            material.color.a,
        ];
        packed.tex_id = material.tex_id.map_or(-1, |id| id as i32);

        packed.kind = hitable.shape.tag();
        match &hitable.shape {
            Shape::Sphere { center, radius } => {
                packed.center = vec3(center);
                packed.radius = *radius;
            }
            Shape::Plane { point, normal } => {
                packed.point = vec3(point);
                packed.normal = vec3(normal);
            }
            Shape::Triangle { a, b, c, uv } => {
                packed.a = vec3(a);
                packed.b = vec3(b);
                packed.c = vec3(c);
                if let Some([uv_a, uv_b, uv_c]) = uv {
                    packed.uv_a = [uv_a.u, uv_a.v];
                    packed.uv_b = [uv_b.u, uv_b.v];
                    packed.uv_c = [uv_c.u, uv_c.v];
                }
            }
        }

        packed
    }
}

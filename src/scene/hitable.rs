use crate::math::Vector;

pub type Color = rgb::RGBA<f32>;

/// Geometry of one scene primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        center: Vector<f32>,
        radius: f32,
    },
    Plane {
        point: Vector<f32>,
        normal: Vector<f32>,
    },
    Triangle {
        a: Vector<f32>,
        b: Vector<f32>,
        c: Vector<f32>,
        /// Per-vertex texture coordinates; `None` for an untextured triangle.
        uv: Option<[TexCoord; 3]>,
    },
}

impl Shape {
    /// The variant tag the shader switches on.
    pub fn tag(&self) -> i32 {
        match self {
            Shape::Sphere { .. } => 0,
            Shape::Plane { .. } => 1,
            Shape::Triangle { .. } => 2,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    None,
    Diffuse,
    Reflective,
    DiffuseReflective,
    Dielectric,
}

impl MaterialKind {
    pub fn tag(self) -> i32 {
        match self {
            MaterialKind::None => -1,
            MaterialKind::Diffuse => 1,
            MaterialKind::Reflective => 2,
            MaterialKind::DiffuseReflective => 3,
            MaterialKind::Dielectric => 4,
        }
    }

    pub fn from_tag(tag: i32) -> Option<MaterialKind> {
        match tag {
            -1 => Some(MaterialKind::None),
            1 => Some(MaterialKind::Diffuse),
            2 => Some(MaterialKind::Reflective),
            3 => Some(MaterialKind::DiffuseReflective),
            4 => Some(MaterialKind::Dielectric),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Reflective roughness.
    pub fuzz: f32,
    /// Refractive index, used by dielectric materials.
    pub ref_idx: f32,
    /// Surface color; alpha is carried on the wire but unused by the shader.
    pub color: Color,
    /// Index into the shader's texture array; `None` means untextured.
    pub tex_id: Option<u32>,
}

impl Default for Material {
    /// The constructor defaults: plain diffuse, untextured, neutral gray.
    fn default() -> Material {
        Material {
            kind: MaterialKind::Diffuse,
            fuzz: 0.0,
            ref_idx: 0.0,
            color: Color::new(0.5, 0.5, 0.5, 1.0),
            tex_id: None,
        }
    }
}

/// One scene primitive: geometry plus material, the unit the ray-tracing
/// shader consumes. Constructors populate geometry and leave the default
/// material for the caller to override.
#[derive(Clone, Debug, PartialEq)]
pub struct Hitable {
    pub shape: Shape,
    pub material: Material,
}

impl Hitable {
    pub fn sphere(center: Vector<f32>, radius: f32) -> Hitable {
        Hitable {
            shape: Shape::Sphere { center, radius },
            material: Material::default(),
        }
    }

    pub fn plane(point: Vector<f32>, normal: Vector<f32>) -> Hitable {
        Hitable {
            shape: Shape::Plane { point, normal },
            material: Material::default(),
        }
    }

    pub fn triangle(a: Vector<f32>, b: Vector<f32>, c: Vector<f32>) -> Hitable {
        Hitable {
            shape: Shape::Triangle {
                a,
                b,
                c,
                uv: None,
            },
            material: Material::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Hitable {
        self.material = material;
        self
    }
}

use std::{fs, path::Path};

use arrayvec::ArrayVec;
use itertools::Itertools as _;
use thiserror::Error;

use crate::math::Vector;
use crate::scene::{Hitable, Material, Shape, TexCoord, WORLD_CAPACITY, World};

/// Data errors of the mesh loader. Unlike kernel errors these are
/// recoverable: a failed load leaves the world untouched and the caller may
/// retry with a different source.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh source: {0}")]
    SourceNotFound(#[from] std::io::Error),

    #[error(
        "mesh has {needed} faces but only {available} world slots are free at index {insert_at}"
    )]
    CapacityExceeded {
        needed: usize,
        available: usize,
        insert_at: usize,
    },

    #[error("line {line}: malformed vertex data")]
    MalformedVertex { line: usize },

    #[error("line {line}: malformed face")]
    MalformedFace { line: usize },

    #[error("line {line}: invalid number")]
    NumericParse { line: usize },
}

/// Loads a mesh file into `world` starting at slot `insert_at`, copying the
/// material of `template` onto every triangle. Returns the number of
/// triangles written.
pub fn load_mesh(
    path: impl AsRef<Path>,
    world: &mut World,
    insert_at: usize,
    template: &Material,
) -> Result<usize, MeshError> {
    let source = fs::read_to_string(path)?;
    load_mesh_str(&source, world, insert_at, template)
}

/// Two-pass parse of an OBJ subset: `v` vertex positions, `vt` texture
/// coordinates, and triangular `f` faces (`vIndex` or `vIndex/vtIndex`
/// tokens, 1-based, a `vtIndex` of 0 meaning no texture coordinate). All
/// other line types are ignored.
///
/// Pass 1 counts line kinds to size the working buffers and to check the
/// face count against the free world slots up front. Pass 2 fills the
/// position/uv buffers and stages the faces, which are resolved only after
/// the whole source has been read, then committed. A malformed line aborts
/// the load before anything is written.
pub fn load_mesh_str(
    source: &str,
    world: &mut World,
    insert_at: usize,
    template: &Material,
) -> Result<usize, MeshError> {
    let counts = source.lines().filter_map(classify).counts();
    let face_count = counts.get(&LineKind::Face).copied().unwrap_or(0);
    let position_count = counts.get(&LineKind::Position).copied().unwrap_or(0);
    let uv_count = counts.get(&LineKind::TexCoord).copied().unwrap_or(0);

    let available = WORLD_CAPACITY.saturating_sub(insert_at);
    if face_count > available {
        return Err(MeshError::CapacityExceeded {
            needed: face_count,
            available,
            insert_at,
        });
    }
    log::debug!(
        "mesh source: {position_count} vertex positions, {uv_count} texture coordinates, \
         {face_count} faces"
    );

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(position_count);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(uv_count);
    let mut faces: Vec<(usize, [VertexRef; 3])> = Vec::with_capacity(face_count);

    for (number, line) in source.lines().enumerate() {
        let line = LineTokens::new(line, number + 1);
        match classify(line.text) {
            Some(LineKind::Position) => positions.push(line.floats::<3>()?),
            Some(LineKind::TexCoord) => uvs.push(line.floats::<2>()?),
            Some(LineKind::Face) => faces.push((line.number, line.face()?)),
            None => {}
        }
    }

    // Faces resolve only now, against the fully populated buffers, so the
    // source's line ordering does not matter.
    let mut triangles = Vec::with_capacity(faces.len());
    for (line, refs) in faces {
        let [(a, uv_a), (b, uv_b), (c, uv_c)] = refs
            .into_iter()
            .map(|vertex| vertex.resolve(&positions, &uvs, line))
            .collect::<Result<ArrayVec<_, 3>, _>>()?
            .into_inner()
            .unwrap_or_else(|_| unreachable!("a face has exactly three vertices"));

        let uv = if uv_a.is_none() && uv_b.is_none() && uv_c.is_none() {
            None
        } else {
            Some([
                uv_a.unwrap_or_default(),
                uv_b.unwrap_or_default(),
                uv_c.unwrap_or_default(),
            ])
        };
        triangles.push(Hitable {
            shape: Shape::Triangle { a, b, c, uv },
            material: template.clone(),
        });
    }

    let appended = triangles.len();
    for (offset, triangle) in triangles.into_iter().enumerate() {
        world
            .overwrite(insert_at + offset, triangle)
            .unwrap_or_else(|_| unreachable!("capacity was checked against the face count"));
    }
    log::info!(
        "loaded {appended} triangles into world slots {insert_at}..{}",
        insert_at + appended
    );
    Ok(appended)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum LineKind {
    Position,
    TexCoord,
    Face,
}

fn classify(line: &str) -> Option<LineKind> {
    match line.split_whitespace().next()? {
        "v" => Some(LineKind::Position),
        "vt" => Some(LineKind::TexCoord),
        "f" => Some(LineKind::Face),
        _ => None,
    }
}

/// One source line with its 1-based number, for error reporting.
#[derive(Copy, Clone)]
struct LineTokens<'a> {
    text: &'a str,
    number: usize,
}

impl<'a> LineTokens<'a> {
    fn new(text: &'a str, number: usize) -> LineTokens<'a> {
        LineTokens { text, number }
    }

    fn fields(&self) -> impl Iterator<Item = &'a str> {
        // skip the line keyword
        self.text.split_whitespace().skip(1)
    }

    /// Exactly N leading float fields; trailing extras are ignored, matching
    /// the fixed-count reads of common OBJ writers (`v x y z w`).
    fn floats<const N: usize>(&self) -> Result<[f32; N], MeshError> {
        let line = self.number;
        self.fields()
            .take(N)
            .map(|token| {
                token
                    .parse::<f32>()
                    .map_err(|_| MeshError::NumericParse { line })
            })
            .collect::<Result<ArrayVec<f32, N>, _>>()?
            .into_inner()
            .map_err(|_| MeshError::MalformedVertex { line })
    }

    /// Exactly three vertex references; any other arity is an error.
    fn face(&self) -> Result<[VertexRef; 3], MeshError> {
        let line = self.number;
        let mut refs = ArrayVec::<VertexRef, 3>::new();
        for token in self.fields() {
            let vertex = VertexRef::parse(token, line)?;
            refs.try_push(vertex)
                .map_err(|_| MeshError::MalformedFace { line })?;
        }
        refs.into_inner()
            .map_err(|_| MeshError::MalformedFace { line })
    }
}

/// A face token, still carrying the source's 1-based indices.
#[derive(Copy, Clone, Debug)]
struct VertexRef {
    position: usize,
    uv: Option<usize>,
}

impl VertexRef {
    fn parse(token: &str, line: usize) -> Result<VertexRef, MeshError> {
        let mut segments = token.split('/');
        let position = segments.next().unwrap_or("");
        let uv = segments.next();
        if segments.next().is_some() {
            // vIndex/vtIndex/vnIndex and beyond are out of scope
            return Err(MeshError::MalformedFace { line });
        }

        let position = position
            .parse::<usize>()
            .map_err(|_| MeshError::NumericParse { line })?;
        let uv = match uv {
            None | Some("") => None,
            Some(text) => {
                let index = text
                    .parse::<usize>()
                    .map_err(|_| MeshError::NumericParse { line })?;
                (index != 0).then_some(index)
            }
        };
        Ok(VertexRef { position, uv })
    }

    fn resolve(
        self,
        positions: &[[f32; 3]],
        uvs: &[[f32; 2]],
        line: usize,
    ) -> Result<(Vector<f32>, Option<TexCoord>), MeshError> {
        let index = self
            .position
            .checked_sub(1)
            .ok_or(MeshError::MalformedFace { line })?;
        let [x, y, z] = *positions
            .get(index)
            .ok_or(MeshError::MalformedFace { line })?;

        let uv = match self.uv {
            None => None,
            Some(index) => {
                let [u, v] = *uvs
                    .get(index - 1)
                    .ok_or(MeshError::MalformedFace { line })?;
                Some(TexCoord { u, v })
            }
        };
        Ok((Vector::from([x, y, z]), uv))
    }
}

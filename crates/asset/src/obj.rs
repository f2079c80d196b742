//! Minimal OBJ parser producing parallel position/normal/uv/index arrays.
//!
//! Understands `v`, `vt`, `vn` and `f`; every other directive is skipped.
//! Face vertices are `p`, `p/t`, `p//n` or `p/t/n` with 1-based indices
//! (negative ones count back from the last declaration). Polygons are fan
//! triangulated from their first vertex. All faces in a file must use the same
//! vertex layout, so normals/uvs either cover every vertex or are absent.

use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader},
};

use crate::{
    error::{AssetError, AssetResult},
    mesh::Mesh,
    store::AssetStore,
};

/// Load an OBJ mesh from an asset store.
pub fn load_obj<S: AssetStore + ?Sized>(store: &S, path: &str) -> AssetResult<Mesh> {
    let reader = store.open(path)?;
    let mesh = parse_obj(BufReader::new(reader), path)?;
    log::debug!(
        "Loaded mesh {}: {} vertices, {} triangles, normals={}, uvs={}",
        path,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.has_normals(),
        mesh.has_uvs()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation. `name` labels errors.
pub fn load_obj_from_reader<R: BufRead>(reader: R, name: &str) -> AssetResult<Mesh> {
    parse_obj(reader, name)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<Mesh> {
    parse_obj(io::Cursor::new(contents), "<memory>")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Key(usize, Option<usize>, Option<usize>);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Layout {
    uv: bool,
    normal: bool,
}

#[derive(Default)]
struct Parser {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
    unique: HashMap<Key, u32>,
    layout: Option<Layout>,
    mesh: Mesh,
}

fn parse_obj<R: BufRead>(reader: R, path: &str) -> AssetResult<Mesh> {
    let mut parser = Parser::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssetError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        parser
            .line(trimmed)
            .map_err(|message| AssetError::Parse {
                path: path.to_owned(),
                line: line_no + 1,
                message,
            })?;
    }

    parser.finish(path)
}

impl Parser {
    fn line(&mut self, trimmed: &str) -> Result<(), String> {
        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            return Ok(());
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), "x coordinate")?;
                let y = parse_f32(parts.next(), "y coordinate")?;
                let z = parse_f32(parts.next(), "z coordinate")?;
                self.positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), "u coordinate")?;
                let v = parse_f32(parts.next(), "v coordinate")?;
                self.texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), "nx coordinate")?;
                let ny = parse_f32(parts.next(), "ny coordinate")?;
                let nz = parse_f32(parts.next(), "nz coordinate")?;
                self.normals.push([nx, ny, nz]);
            }
            "f" => self.face(parts)?,
            _ => {
                // Ignore other directives (o/g/s/usemtl/mtllib/etc.)
            }
        }
        Ok(())
    }

    fn face<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> Result<(), String> {
        let mut face: Vec<u32> = Vec::new();
        for token in parts {
            let (vi, vti, vni) = parse_face_vertex(
                token,
                self.positions.len(),
                self.texcoords.len(),
                self.normals.len(),
            )?;

            let layout = Layout {
                uv: vti.is_some(),
                normal: vni.is_some(),
            };
            match self.layout {
                None => self.layout = Some(layout),
                Some(expected) if expected != layout => {
                    return Err(format!(
                        "face vertex '{}' mixes attributes differently from earlier faces",
                        token
                    ));
                }
                Some(_) => {}
            }

            let key = Key(vi, vti, vni);
            let index = match self.unique.get(&key) {
                Some(&idx) => idx,
                None => {
                    let idx = u32::try_from(self.mesh.vertex_count())
                        .map_err(|_| format!("too many vertices in OBJ (>{})", u32::MAX))?;
                    self.mesh.positions.extend_from_slice(&self.positions[vi]);
                    if let Some(t) = vti {
                        self.mesh.uvs.extend_from_slice(&self.texcoords[t]);
                    }
                    if let Some(n) = vni {
                        self.mesh.normals.extend_from_slice(&self.normals[n]);
                    }
                    self.unique.insert(key, idx);
                    idx
                }
            };
            face.push(index);
        }

        if face.len() < 3 {
            return Err(format!("face has {} vertices, need at least 3", face.len()));
        }
        // Triangulate fan
        for tri in 1..(face.len() - 1) {
            self.mesh
                .indices
                .extend_from_slice(&[face[0], face[tri], face[tri + 1]]);
        }
        Ok(())
    }

    fn finish(self, path: &str) -> AssetResult<Mesh> {
        if !self.mesh.indices.is_empty() {
            return Ok(self.mesh);
        }
        if self.positions.is_empty() {
            return Err(AssetError::Parse {
                path: path.to_owned(),
                line: 0,
                message: "OBJ contains no vertex data".to_owned(),
            });
        }

        log::warn!(
            "OBJ {} has {} positions but no faces; returning them without triangles",
            path,
            self.positions.len()
        );
        Ok(Mesh {
            positions: self.positions.into_iter().flatten().collect(),
            ..Mesh::default()
        })
    }
}

fn parse_f32(value: Option<&str>, what: &str) -> Result<f32, String> {
    let token = value.ok_or_else(|| format!("missing {}", what))?;
    match token.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {} '{}'", what, token)),
    }
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
) -> Result<(usize, Option<usize>, Option<usize>), String> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| format!("malformed face element '{}'", token))?;
    let pos_idx = resolve_index(pos, pos_count, "position")?;

    let tex_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, tex_count, "texcoord")?),
        _ => None,
    };

    let norm_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, "normal")?),
        _ => None,
    };

    if split.next().is_some() {
        return Err(format!("malformed face element '{}'", token));
    }

    Ok((pos_idx, tex_idx, norm_idx))
}

fn resolve_index(token: &str, len: usize, what: &str) -> Result<usize, String> {
    let raw = token
        .parse::<i64>()
        .map_err(|_| format!("invalid {} index '{}'", what, token))?;
    if raw == 0 {
        return Err(format!("OBJ indices are 1-based; found 0 {} index", what));
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        return Err(format!(
            "{} index {} refers past the {} declared so far",
            what, raw, len
        ));
    }

    Ok(idx as usize)
}

use glam::{Vec2, Vec3};

/// Vertex layout shared with the external renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Static triangle geometry. Immutable once registered with the collision
/// index; the name identifies a mesh across registration and lookup.
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Unit cube centered on the origin
    pub fn create_cube(name: &str) -> Self {
        // One quad per face, normals pointing outward
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::Z, Vec3::X, Vec3::Y),         // front
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y), // back
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),     // top
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),     // bottom
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),     // right
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),     // left
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, tangent, bitangent) in faces {
            let base = vertices.len() as u32;
            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                let position = (normal
                    + tangent * (u * 2.0 - 1.0)
                    + bitangent * (v * 2.0 - 1.0))
                    * 0.5;
                vertices.push(Vertex {
                    position,
                    normal,
                    uv: Vec2::new(u, v),
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self {
            name: name.to_string(),
            vertices,
            indices,
        }
    }

    /// Flat ground quad in the XZ plane, `size` units on a side
    pub fn create_ground_plane(name: &str, size: f32) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vertex {
                position: Vec3::new(-h, 0.0, -h),
                normal: Vec3::Y,
                uv: Vec2::new(0.0, 0.0),
            },
            Vertex {
                position: Vec3::new(h, 0.0, -h),
                normal: Vec3::Y,
                uv: Vec2::new(1.0, 0.0),
            },
            Vertex {
                position: Vec3::new(h, 0.0, h),
                normal: Vec3::Y,
                uv: Vec2::new(1.0, 1.0),
            },
            Vertex {
                position: Vec3::new(-h, 0.0, h),
                normal: Vec3::Y,
                uv: Vec2::new(0.0, 1.0),
            },
        ];
        let indices = vec![0, 1, 2, 2, 3, 0];

        Self {
            name: name.to_string(),
            vertices,
            indices,
        }
    }

    /// Load every model from an OBJ file as a separate mesh
    pub fn load_obj(path: &str) -> anyhow::Result<Vec<Self>> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut meshes = Vec::with_capacity(models.len());

        for (model_index, model) in models.into_iter().enumerate() {
            let mesh = &model.mesh;
            let mut vertices = Vec::with_capacity(mesh.positions.len() / 3);

            for i in 0..mesh.positions.len() / 3 {
                let position = Vec3::new(
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                );

                let normal = if !mesh.normals.is_empty() {
                    Vec3::new(
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    )
                } else {
                    Vec3::Y
                };

                let uv = if !mesh.texcoords.is_empty() {
                    Vec2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
                } else {
                    Vec2::ZERO
                };

                vertices.push(Vertex {
                    position,
                    normal,
                    uv,
                });
            }

            let name = if model.name.is_empty() {
                format!("{}#{}", path, model_index)
            } else {
                model.name.clone()
            };

            meshes.push(Self {
                name,
                vertices,
                indices: mesh.indices.clone(),
            });
        }

        Ok(meshes)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

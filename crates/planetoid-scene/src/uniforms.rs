//! Named shader uniforms and their GPU packing.
//!
//! Every surface reads a shared base table (time, camera, light, ocean level,
//! planet radius, temperature) plus its own extension. The shared table lives
//! once in [`SurfaceUniforms`]; a surface's effective table is rebuilt by
//! [`SurfaceUniforms::merged`] so shared writes reach every surface.

use std::fmt;

use glam::Vec3;
use thiserror::Error;

use UniformKind::{Float as F, Vec3 as V3};

/// Uniform type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec3,
}

impl UniformKind {
    fn size(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec3 => 12,
        }
    }

    fn align(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec3 => 16,
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformKind::Float => f.write_str("f"),
            UniformKind::Vec3 => f.write_str("v3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec3(_) => UniformKind::Vec3,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            UniformValue::Float(v) => Some(v),
            UniformValue::Vec3(_) => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match *self {
            UniformValue::Vec3(v) => Some(v),
            UniformValue::Float(_) => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v.to_array())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UniformError {
    #[error("uniform '{name}' is missing")]
    Missing { name: String },

    #[error("uniform '{name}' should be {expected}, found {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },

    #[error("uniform '{name}' is not declared in shader '{shader}'")]
    NotInSource { name: String, shader: String },
}

/// Insertion-ordered name → value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformTable {
    entries: Vec<(String, UniformValue)>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, replacing an existing entry in place (order is kept).
    pub fn insert(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_float)
    }

    pub fn vec3(&self, name: &str) -> Option<[f32; 3]> {
        self.get(name).and_then(UniformValue::as_vec3)
    }

    /// Overwrite an existing uniform, keeping its kind.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        let value = value.into();
        let slot = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| UniformError::Missing {
                name: name.to_string(),
            })?;
        if slot.kind() != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `base` then `extension`; extension keys override base keys.
    pub fn merged(base: &UniformTable, extension: &UniformTable) -> UniformTable {
        let mut out = base.clone();
        for (name, value) in extension.iter() {
            out.insert(name, *value);
        }
        out
    }
}

/// The four shader-driven surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Planet,
    Ocean,
    Atmosphere,
    Moon,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::Planet,
        Surface::Ocean,
        Surface::Atmosphere,
        Surface::Moon,
    ];

    /// Shader bundle name.
    pub fn name(self) -> &'static str {
        match self {
            Surface::Planet => "planet",
            Surface::Ocean => "ocean",
            Surface::Atmosphere => "atmosphere",
            Surface::Moon => "moon",
        }
    }

    pub fn layout(self) -> &'static UniformLayout {
        match self {
            Surface::Planet => &UniformLayout::PLANET,
            Surface::Ocean => &UniformLayout::OCEAN,
            Surface::Atmosphere => &UniformLayout::ATMOSPHERE,
            Surface::Moon => &UniformLayout::MOON,
        }
    }
}

/// Shared table plus one extension per surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceUniforms {
    pub shared: UniformTable,
    pub planet: UniformTable,
    pub ocean: UniformTable,
    pub atmosphere: UniformTable,
    pub moon: UniformTable,
}

impl SurfaceUniforms {
    pub fn new(planet_radius: f32, light_pos: Vec3, camera_pos: Vec3) -> Self {
        let shared = UniformTable::new()
            .with("time", 0.0_f32)
            .with("cameraPos", camera_pos)
            .with("lightPos", light_pos)
            .with("oceanLevel", 1.0_f32)
            .with("planetRadius", planet_radius)
            .with("avTemp", 7.0_f32);

        let planet = UniformTable::new()
            .with("surfaceColor", [0.0_f32, 0.4, 0.1])
            .with("shoreColor", [0.95_f32, 0.67, 0.26])
            .with("mountFreq", 0.04_f32)
            .with("mountAmp", 15.0_f32);

        let ocean = UniformTable::new().with("oceanColor", [0.0_f32, 0.0, 1.0]);

        let atmosphere = UniformTable::new()
            .with("atmoHeight", 6.0_f32)
            .with("atmoOpacity", 0.35_f32)
            .with("atmoColor", [0.35_f32, 0.6, 1.0]);

        let moon = UniformTable::new()
            .with("surfaceColor", [0.8_f32, 0.8, 0.8])
            .with("moonSpeed", 0.001_f32)
            .with("moonMountFreq", 0.2_f32)
            .with("moonMountAmp", 2.5_f32);

        Self {
            shared,
            planet,
            ocean,
            atmosphere,
            moon,
        }
    }

    pub fn extension(&self, surface: Surface) -> &UniformTable {
        match surface {
            Surface::Planet => &self.planet,
            Surface::Ocean => &self.ocean,
            Surface::Atmosphere => &self.atmosphere,
            Surface::Moon => &self.moon,
        }
    }

    pub fn extension_mut(&mut self, surface: Surface) -> &mut UniformTable {
        match surface {
            Surface::Planet => &mut self.planet,
            Surface::Ocean => &mut self.ocean,
            Surface::Atmosphere => &mut self.atmosphere,
            Surface::Moon => &mut self.moon,
        }
    }

    /// The effective table a surface's shader sees right now.
    pub fn merged(&self, surface: Surface) -> UniformTable {
        UniformTable::merged(&self.shared, self.extension(surface))
    }

    /// Merge, validate and pack a surface's uniforms for upload.
    pub fn pack(&self, surface: Surface) -> Result<Vec<u8>, UniformError> {
        surface.layout().pack(&self.merged(surface))
    }
}

impl Default for SurfaceUniforms {
    fn default() -> Self {
        Self::new(
            100.0,
            Vec3::new(1000.0, 1000.0, 1000.0),
            Vec3::new(0.0, 0.0, 500.0),
        )
    }
}

/// Field order of a WGSL uniform struct.
#[derive(Debug, PartialEq)]
pub struct UniformLayout {
    pub name: &'static str,
    pub fields: &'static [(&'static str, UniformKind)],
}

impl UniformLayout {
    pub const PLANET: UniformLayout = UniformLayout {
        name: "planet",
        fields: &[
            ("cameraPos", V3),
            ("time", F),
            ("lightPos", V3),
            ("oceanLevel", F),
            ("surfaceColor", V3),
            ("planetRadius", F),
            ("shoreColor", V3),
            ("avTemp", F),
            ("mountFreq", F),
            ("mountAmp", F),
        ],
    };

    pub const OCEAN: UniformLayout = UniformLayout {
        name: "ocean",
        fields: &[
            ("cameraPos", V3),
            ("time", F),
            ("lightPos", V3),
            ("oceanLevel", F),
            ("oceanColor", V3),
            ("planetRadius", F),
            ("avTemp", F),
        ],
    };

    pub const ATMOSPHERE: UniformLayout = UniformLayout {
        name: "atmosphere",
        fields: &[
            ("cameraPos", V3),
            ("time", F),
            ("lightPos", V3),
            ("oceanLevel", F),
            ("atmoColor", V3),
            ("planetRadius", F),
            ("avTemp", F),
            ("atmoHeight", F),
            ("atmoOpacity", F),
        ],
    };

    pub const MOON: UniformLayout = UniformLayout {
        name: "moon",
        fields: &[
            ("cameraPos", V3),
            ("time", F),
            ("lightPos", V3),
            ("oceanLevel", F),
            ("surfaceColor", V3),
            ("planetRadius", F),
            ("avTemp", F),
            ("moonSpeed", F),
            ("moonMountFreq", F),
            ("moonMountAmp", F),
        ],
    };

    /// Every field must be present in `table` with the declared kind.
    pub fn validate(&self, table: &UniformTable) -> Result<(), UniformError> {
        for &(name, expected) in self.fields {
            let value = table.get(name).ok_or_else(|| UniformError::Missing {
                name: name.to_string(),
            })?;
            if value.kind() != expected {
                return Err(UniformError::KindMismatch {
                    name: name.to_string(),
                    expected,
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }

    /// Every field name must appear in the shader text.
    pub fn validate_source(&self, source: &str) -> Result<(), UniformError> {
        match self.fields.iter().find(|(name, _)| !source.contains(name)) {
            Some(&(name, _)) => Err(UniformError::NotInSource {
                name: name.to_string(),
                shader: self.name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Byte offset of each field under uniform-buffer alignment rules.
    pub fn offsets(&self) -> Vec<usize> {
        let mut offset: usize = 0;
        self.fields
            .iter()
            .map(|&(_, kind)| {
                let at = offset.next_multiple_of(kind.align());
                offset = at + kind.size();
                at
            })
            .collect()
    }

    /// Struct size, rounded up to 16 bytes.
    pub fn size(&self) -> usize {
        let end = self
            .fields
            .iter()
            .zip(self.offsets())
            .map(|(&(_, kind), at)| at + kind.size())
            .max()
            .unwrap_or(0);
        end.next_multiple_of(16)
    }

    /// Validate `table` and write it into a buffer matching the WGSL struct.
    pub fn pack(&self, table: &UniformTable) -> Result<Vec<u8>, UniformError> {
        self.validate(table)?;
        let mut bytes = vec![0u8; self.size()];
        for (&(name, _), at) in self.fields.iter().zip(self.offsets()) {
            match table.get(name) {
                Some(UniformValue::Float(v)) => {
                    bytes[at..at + 4].copy_from_slice(&v.to_le_bytes());
                }
                Some(UniformValue::Vec3(v)) => {
                    for (i, c) in v.iter().enumerate() {
                        let start = at + i * 4;
                        bytes[start..start + 4].copy_from_slice(&c.to_le_bytes());
                    }
                }
                None => {}
            }
        }
        Ok(bytes)
    }
}

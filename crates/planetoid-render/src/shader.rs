//! Shader sources, noise composition, module caching and the background loader.
//!
//! Each surface has a vertex and a fragment WGSL file. Noise helpers live in
//! their own snippets and are prepended per surface before compilation, since
//! WGSL has no include mechanism. Sources can be overridden from a directory
//! at startup; anything missing there falls back to the copy compiled into
//! the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{debug, info, warn};
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Names of the four surface shader bundles.
pub const BUNDLE_NAMES: [&str; 4] = ["planet", "ocean", "moon", "atmosphere"];

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read shader file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("shader '{name}' not found in library")]
    NotLoaded { name: String },

    #[error("no shader bundle named '{name}'")]
    MissingBundle { name: String },

    #[error("shader loader thread exited without delivering sources")]
    LoaderDisconnected,
}

/// A reusable block of WGSL noise functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseSnippet {
    /// Gradient (Perlin-style) noise plus an fBm helper.
    ClassicNoise3d,
    /// Worley cell noise returning the two nearest feature distances.
    CellularNoise3d,
}

impl NoiseSnippet {
    pub const ALL: [NoiseSnippet; 2] = [NoiseSnippet::ClassicNoise3d, NoiseSnippet::CellularNoise3d];

    pub fn name(self) -> &'static str {
        match self {
            NoiseSnippet::ClassicNoise3d => "classic_noise_3d",
            NoiseSnippet::CellularNoise3d => "cellular_noise_3d",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            NoiseSnippet::ClassicNoise3d => include_str!("../shaders/noise/classic_noise_3d.wgsl"),
            NoiseSnippet::CellularNoise3d => {
                include_str!("../shaders/noise/cellular_noise_3d.wgsl")
            }
        }
    }
}

/// Noise snippets a surface's shaders are prefixed with, in order.
pub fn noise_prefix(bundle: &str) -> &'static [NoiseSnippet] {
    match bundle {
        "planet" | "moon" => &[NoiseSnippet::ClassicNoise3d],
        "ocean" => &[NoiseSnippet::ClassicNoise3d, NoiseSnippet::CellularNoise3d],
        _ => &[],
    }
}

/// Raw vertex and fragment text for one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBundle {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

/// A bundle with its noise prefix applied, ready to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedShader {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

/// Every shader source the scene needs.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    bundles: HashMap<String, ShaderBundle>,
    noise: HashMap<NoiseSnippet, String>,
}

fn embedded_bundle(name: &str) -> Option<(&'static str, &'static str)> {
    let pair = match name {
        "planet" => (
            include_str!("../shaders/planet.vert.wgsl"),
            include_str!("../shaders/planet.frag.wgsl"),
        ),
        "ocean" => (
            include_str!("../shaders/ocean.vert.wgsl"),
            include_str!("../shaders/ocean.frag.wgsl"),
        ),
        "moon" => (
            include_str!("../shaders/moon.vert.wgsl"),
            include_str!("../shaders/moon.frag.wgsl"),
        ),
        "atmosphere" => (
            include_str!("../shaders/atmosphere.vert.wgsl"),
            include_str!("../shaders/atmosphere.frag.wgsl"),
        ),
        _ => return None,
    };
    Some(pair)
}

/// Read `dir/file` if present, otherwise use `fallback`.
fn read_or_fallback(dir: &Path, file: &str, fallback: &str) -> Result<String, ShaderError> {
    let path = dir.join(file);
    if path.is_file() {
        info!("Using shader override {}", path.display());
        Ok(std::fs::read_to_string(&path)?)
    } else {
        debug!("No override for {file}, using embedded source");
        Ok(fallback.to_string())
    }
}

impl ShaderSources {
    /// Sources compiled into the binary.
    pub fn embedded() -> Self {
        let bundles = BUNDLE_NAMES
            .iter()
            .filter_map(|&name| {
                embedded_bundle(name).map(|(vertex, fragment)| {
                    (
                        name.to_string(),
                        ShaderBundle {
                            name: name.to_string(),
                            vertex: vertex.to_string(),
                            fragment: fragment.to_string(),
                        },
                    )
                })
            })
            .collect();
        let noise = NoiseSnippet::ALL
            .iter()
            .map(|&snippet| (snippet, snippet.embedded().to_string()))
            .collect();
        Self { bundles, noise }
    }

    /// Embedded sources with any files found in `dir` taking their place.
    ///
    /// Expects `<name>.vert.wgsl`, `<name>.frag.wgsl` and `noise/<snippet>.wgsl`.
    pub fn load(dir: &Path) -> Result<Self, ShaderError> {
        if !dir.is_dir() {
            return Err(ShaderError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut sources = Self::embedded();
        for bundle in sources.bundles.values_mut() {
            bundle.vertex =
                read_or_fallback(dir, &format!("{}.vert.wgsl", bundle.name), &bundle.vertex)?;
            bundle.fragment =
                read_or_fallback(dir, &format!("{}.frag.wgsl", bundle.name), &bundle.fragment)?;
        }
        let noise_dir = dir.join("noise");
        for (snippet, text) in sources.noise.iter_mut() {
            *text = read_or_fallback(&noise_dir, &format!("{}.wgsl", snippet.name()), text)?;
        }
        Ok(sources)
    }

    pub fn bundle(&self, name: &str) -> Result<&ShaderBundle, ShaderError> {
        self.bundles.get(name).ok_or_else(|| ShaderError::MissingBundle {
            name: name.to_string(),
        })
    }

    pub fn noise(&self, snippet: NoiseSnippet) -> &str {
        self.noise.get(&snippet).map(String::as_str).unwrap_or_default()
    }

    /// Prepend the bundle's noise snippets to its vertex and fragment text.
    pub fn compose(&self, name: &str) -> Result<ComposedShader, ShaderError> {
        let bundle = self.bundle(name)?;
        let prefix: String = noise_prefix(name)
            .iter()
            .map(|&snippet| format!("{}\n", self.noise(snippet)))
            .collect();

        Ok(ComposedShader {
            name: bundle.name.clone(),
            vertex: format!("{prefix}{}", bundle.vertex),
            fragment: format!("{prefix}{}", bundle.fragment),
        })
    }
}

/// Vertex and fragment modules for one surface.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub vertex: Arc<wgpu::ShaderModule>,
    pub fragment: Arc<wgpu::ShaderModule>,
}

/// Cache of compiled shader modules keyed by `<bundle>.vert` / `<bundle>.frag`.
#[derive(Default)]
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile WGSL text and cache it under `name`, replacing any previous module.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        let module = Arc::new(device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        }));

        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{name}'");
        } else {
            info!("Loaded shader '{name}'");
        }
        module
    }

    /// Compile both stages of a composed shader as separate modules.
    pub fn compile(&mut self, device: &wgpu::Device, shader: &ComposedShader) -> CompiledShader {
        CompiledShader {
            vertex: self.load_from_source(device, &format!("{}.vert", shader.name), &shader.vertex),
            fragment: self.load_from_source(
                device,
                &format!("{}.frag", shader.name),
                &shader.fragment,
            ),
        }
    }

    pub fn get(&self, name: &str) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ShaderError::NotLoaded {
                name: name.to_string(),
            })
    }

    /// Both stages of a previously compiled bundle.
    pub fn compiled(&self, bundle: &str) -> Result<CompiledShader, ShaderError> {
        Ok(CompiledShader {
            vertex: self.get(&format!("{bundle}.vert"))?,
            fragment: self.get(&format!("{bundle}.frag"))?,
        })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Reads shader sources once on a background thread.
///
/// The render loop polls each frame; until a result arrives nothing that
/// needs the surface shaders is built.
pub struct ShaderLoader {
    receiver: Receiver<Result<ShaderSources, ShaderError>>,
    finished: bool,
}

impl ShaderLoader {
    /// Start loading from `dir`, or hand back the embedded sources when `None`.
    pub fn spawn(dir: Option<PathBuf>) -> Result<Self, ShaderError> {
        let (sender, receiver) = bounded(1);
        std::thread::Builder::new()
            .name("shader-loader".into())
            .spawn(move || {
                let result = match dir {
                    Some(dir) => ShaderSources::load(&dir),
                    None => Ok(ShaderSources::embedded()),
                };
                // The receiver may already be gone if the window closed first.
                let _ = sender.send(result);
            })?;

        Ok(Self {
            receiver,
            finished: false,
        })
    }

    /// Non-blocking check. Yields the load result exactly once.
    pub fn poll(&mut self) -> Option<Result<ShaderSources, ShaderError>> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Shader loader disconnected");
                self.finished = true;
                Some(Err(ShaderError::LoaderDisconnected))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Block until the result arrives. Used by tests and headless tools.
    pub fn wait(self) -> Result<ShaderSources, ShaderError> {
        self.receiver
            .recv()
            .map_err(|_| ShaderError::LoaderDisconnected)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_has_every_bundle() {
        let sources = ShaderSources::embedded();
        for name in BUNDLE_NAMES {
            let bundle = sources.bundle(name).unwrap();
            assert!(bundle.vertex.contains("fn vs_main"));
            assert!(bundle.fragment.contains("fn fs_main"));
        }
    }

    #[test]
    fn test_missing_bundle_error() {
        let sources = ShaderSources::embedded();
        assert!(matches!(
            sources.bundle("rings"),
            Err(ShaderError::MissingBundle { name }) if name == "rings"
        ));
    }

    #[test]
    fn test_noise_prefix_per_surface() {
        assert_eq!(noise_prefix("planet"), &[NoiseSnippet::ClassicNoise3d]);
        assert_eq!(noise_prefix("moon"), &[NoiseSnippet::ClassicNoise3d]);
        assert_eq!(
            noise_prefix("ocean"),
            &[NoiseSnippet::ClassicNoise3d, NoiseSnippet::CellularNoise3d]
        );
        assert!(noise_prefix("atmosphere").is_empty());
    }

    #[test]
    fn test_compose_prepends_noise_to_both_stages() {
        let sources = ShaderSources::embedded();
        let classic = sources.noise(NoiseSnippet::ClassicNoise3d);
        let cellular = sources.noise(NoiseSnippet::CellularNoise3d);

        let ocean = sources.compose("ocean").unwrap();
        assert!(ocean.vertex.starts_with(classic));
        assert!(ocean.fragment.starts_with(classic));
        assert!(ocean.vertex.contains(cellular));

        let planet = sources.compose("planet").unwrap();
        assert!(planet.vertex.starts_with(classic));
        assert!(!planet.vertex.contains(cellular));

        let atmosphere = sources.compose("atmosphere").unwrap();
        assert_eq!(
            atmosphere.vertex,
            sources.bundle("atmosphere").unwrap().vertex
        );
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            ShaderSources::load(&missing),
            Err(ShaderError::FileNotFound { path }) if path == missing
        ));
    }

    #[test]
    fn test_files_override_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("moon.frag.wgsl"), "// custom moon").unwrap();
        std::fs::create_dir(dir.path().join("noise")).unwrap();
        std::fs::write(
            dir.path().join("noise").join("classic_noise_3d.wgsl"),
            "// custom noise",
        )
        .unwrap();

        let sources = ShaderSources::load(dir.path()).unwrap();
        let embedded = ShaderSources::embedded();
        assert_eq!(sources.bundle("moon").unwrap().fragment, "// custom moon");
        assert_eq!(
            sources.bundle("moon").unwrap().vertex,
            embedded.bundle("moon").unwrap().vertex
        );
        assert!(sources.compose("moon").unwrap().vertex.starts_with("// custom noise\n"));
    }

    #[test]
    fn test_loader_delivers_once() {
        let mut loader = ShaderLoader::spawn(None).unwrap();
        let result = loop {
            if let Some(result) = loader.poll() {
                break result;
            }
            std::thread::yield_now();
        };
        assert!(result.is_ok());
        assert!(loader.is_finished());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_loader_reports_bad_dir() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ShaderLoader::spawn(Some(dir.path().join("missing"))).unwrap();
        assert!(matches!(loader.wait(), Err(ShaderError::FileNotFound { .. })));
    }

    #[test]
    fn test_library_reports_unloaded() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert!(matches!(
            library.compiled("planet"),
            Err(ShaderError::NotLoaded { name }) if name == "planet.vert"
        ));
    }
}

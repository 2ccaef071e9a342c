//! Real-time capture sources.
//!
//! `CaptureSource` produces one `ImageSource` per tick of the monitor loop.
//! Backends are selected from the configured URL:
//! - `stub://<scene>`: synthetic frames encoded as PNG data URLs
//!   (`calm`, `fire`, or `flicker`, which alternates between the two)
//! - anything else: a local directory whose image files are replayed in
//!   sorted order, wrapping around at the end

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use super::source::ImageSource;
use crate::frame::Frame;

/// Frames per phase of the `flicker` scene.
pub const FLICKER_PERIOD: u64 = 5;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Configuration for a capture source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// `stub://<scene>` or a local directory path.
    pub url: String,
    /// Frame width for synthetic scenes.
    pub width: u32,
    /// Frame height for synthetic scenes.
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            url: "stub://calm".to_string(),
            width: 64,
            height: 48,
        }
    }
}

pub struct CaptureSource {
    backend: CaptureBackend,
}

enum CaptureBackend {
    Synthetic(SyntheticCapture),
    Directory(DirectoryCapture),
}

impl CaptureSource {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        let backend = match config.url.strip_prefix("stub://") {
            Some(scene) => {
                let scene = Scene::parse(scene)?;
                CaptureBackend::Synthetic(SyntheticCapture::new(config, scene)?)
            }
            None => CaptureBackend::Directory(DirectoryCapture::new(config)?),
        };
        Ok(Self { backend })
    }

    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            CaptureBackend::Synthetic(source) => source.connect(),
            CaptureBackend::Directory(source) => source.connect(),
        }
    }

    /// Capture the next image.
    pub fn next_image(&mut self) -> Result<ImageSource> {
        match &mut self.backend {
            CaptureBackend::Synthetic(source) => source.next_image(),
            CaptureBackend::Directory(source) => source.next_image(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            CaptureBackend::Synthetic(_) => true,
            CaptureBackend::Directory(source) => source.last_error.is_none(),
        }
    }

    pub fn stats(&self) -> CaptureStats {
        match &self.backend {
            CaptureBackend::Synthetic(source) => CaptureStats {
                frames_captured: source.frame_count,
                url: source.config.url.clone(),
            },
            CaptureBackend::Directory(source) => CaptureStats {
                frames_captured: source.frame_count,
                url: source.config.url.clone(),
            },
        }
    }
}

/// Statistics for a capture source.
#[derive(Clone, Debug)]
pub struct CaptureStats {
    pub frames_captured: u64,
    pub url: String,
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://)
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scene {
    Calm,
    Fire,
    Flicker,
}

impl Scene {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "calm" => Ok(Scene::Calm),
            "fire" => Ok(Scene::Fire),
            "flicker" => Ok(Scene::Flicker),
            other => Err(anyhow!(
                "unknown synthetic scene '{}'; expected calm, fire, or flicker",
                other
            )),
        }
    }
}

struct SyntheticCapture {
    config: CaptureConfig,
    scene: Scene,
    frame_count: u64,
}

impl SyntheticCapture {
    fn new(config: CaptureConfig, scene: Scene) -> Result<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(anyhow!("synthetic capture needs non-zero dimensions"));
        }
        Ok(Self {
            config,
            scene,
            frame_count: 0,
        })
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("CaptureSource: connected to {} (synthetic)", self.config.url);
        Ok(())
    }

    fn next_image(&mut self) -> Result<ImageSource> {
        let burning = match self.scene {
            Scene::Calm => false,
            Scene::Fire => true,
            Scene::Flicker => (self.frame_count / FLICKER_PERIOD) % 2 == 1,
        };
        self.frame_count += 1;
        let frame = self.generate_frame(burning)?;
        ImageSource::from_frame(&frame)
    }

    /// Blue-gray background; a burning frame fills its lower half with
    /// alternating deep-red and orange rows.
    fn generate_frame(&self, burning: bool) -> Result<Frame> {
        let (width, height) = (self.config.width, self.config.height);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            let rgb = if burning && y >= height / 2 {
                if y % 2 == 0 {
                    [235, 40, 20]
                } else {
                    [230, 150, 60]
                }
            } else {
                [40, 60 + (y % 64) as u8, 120]
            };
            for _ in 0..width {
                pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
        }
        Frame::from_rgba(pixels, width, height)
    }
}

// ----------------------------------------------------------------------------
// Directory replay source
// ----------------------------------------------------------------------------

struct DirectoryCapture {
    config: CaptureConfig,
    files: Vec<PathBuf>,
    frame_count: u64,
    last_error: Option<String>,
}

impl DirectoryCapture {
    fn new(config: CaptureConfig) -> Result<Self> {
        if config.url.contains("://") {
            return Err(anyhow!(
                "capture only supports stub:// scenes or local directories, got {}",
                config.url
            ));
        }
        Ok(Self {
            config,
            files: Vec::new(),
            frame_count: 0,
            last_error: None,
        })
    }

    fn connect(&mut self) -> Result<()> {
        let dir = Path::new(&self.config.url);
        let mut files = Vec::new();
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(anyhow!("no image files found in {}", dir.display()));
        }
        files.sort();
        log::info!(
            "CaptureSource: replaying {} image(s) from {}",
            files.len(),
            dir.display()
        );
        self.files = files;
        Ok(())
    }

    fn next_image(&mut self) -> Result<ImageSource> {
        if self.files.is_empty() {
            return Err(anyhow!("capture source is not connected"));
        }
        let index = (self.frame_count % self.files.len() as u64) as usize;
        self.frame_count += 1;
        match ImageSource::from_path(&self.files[index]) {
            Ok(image) => {
                self.last_error = None;
                Ok(image)
            }
            Err(e) => {
                self.last_error = Some(format!("{:#}", e));
                Err(e)
            }
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

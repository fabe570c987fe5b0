//! Template-matching gesture classifier.
//!
//! Frames are summarised as the fraction of foreground (non-zero) pixels in each cell of
//! a fixed `grid x grid` layout. A frame scores against each template by the cosine
//! similarity of the two density vectors, which is 1.0 for identical silhouettes and falls
//! towards 0.0 as they diverge.

use anyhow::{Result, bail, ensure};
use tracing::debug;

use crate::frame_pipeline::frame::{Frame, PixelFormat};
use crate::frame_pipeline::interpretation::{Candidate, GestureClassifier};

/// Default number of cells along each axis.
pub const DEFAULT_GRID_SIZE: usize = 16;

#[derive(Debug, Clone)]
struct Template {
    label: String,
    features: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    grid_size: usize,
    templates: Vec<Template>,
}

impl TemplateClassifier {
    pub fn new(grid_size: usize) -> Result<Self> {
        ensure!(grid_size > 0, "grid size must be at least 1");
        Ok(Self {
            grid_size,
            templates: Vec::new(),
        })
    }

    pub fn builder() -> TemplateClassifierBuilder {
        TemplateClassifierBuilder::default()
    }

    /// Learns `label` from an example GRAYSCALE frame. Several templates may share a label.
    pub fn add_template(&mut self, label: impl Into<String>, example: &Frame) -> Result<()> {
        let label = label.into();
        if example.format() != PixelFormat::Grayscale {
            bail!(
                "template `{label}` must be a GRAYSCALE frame, got {}",
                example.format()
            );
        }
        let features = self.features(example);
        debug!(label = %label, grid = self.grid_size, "Registered gesture template");
        self.templates.push(Template { label, features });
        Ok(())
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.label.as_str()).collect()
    }

    fn features(&self, frame: &Frame) -> Vec<f32> {
        let grid = self.grid_size;
        let width = frame.width();
        let height = frame.height();
        let mut foreground = vec![0u32; grid * grid];
        let mut totals = vec![0u32; grid * grid];

        for (y, row) in frame.data().chunks_exact(width).enumerate() {
            let cy = y * grid / height;
            for (x, &value) in row.iter().enumerate() {
                let cell = cy * grid + x * grid / width;
                totals[cell] += 1;
                if value > 0 {
                    foreground[cell] += 1;
                }
            }
        }

        foreground
            .iter()
            .zip(&totals)
            .map(|(&fg, &total)| if total == 0 { 0.0 } else { fg as f32 / total as f32 })
            .collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

impl GestureClassifier for TemplateClassifier {
    fn classify(&self, frame: &Frame) -> Result<Vec<Candidate>> {
        if frame.format() != PixelFormat::Grayscale {
            bail!("template matching needs a GRAYSCALE frame, got {}", frame.format());
        }
        let features = self.features(frame);
        Ok(self
            .templates
            .iter()
            .map(|t| Candidate::new(t.label.clone(), cosine_similarity(&features, &t.features)))
            .collect())
    }
}

#[derive(Default)]
pub struct TemplateClassifierBuilder {
    grid_size: Option<usize>,
    templates: Vec<(String, Frame)>,
}

impl TemplateClassifierBuilder {
    pub fn grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    pub fn template(mut self, label: impl Into<String>, example: Frame) -> Self {
        self.templates.push((label.into(), example));
        self
    }

    pub fn build(self) -> Result<TemplateClassifier> {
        let mut classifier = TemplateClassifier::new(self.grid_size.unwrap_or(DEFAULT_GRID_SIZE))?;
        for (label, example) in self.templates {
            classifier.add_template(label, &example)?;
        }
        Ok(classifier)
    }
}

//! Classifier boundary: a drawing snapshot goes in, a catalog category comes out.
//!
//! Resampling, normalization and inference all live behind `ClassifierPort`;
//! the game only sees the result or a `ClassifierError`.

use async_trait::async_trait;

use crate::catalog::{Catalog, Category};
use crate::error::ClassifierError;

/// Raw RGBA capture of the drawing surface at its native resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Snapshot {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ClassifierError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(ClassifierError::Inference(format!(
                "snapshot {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Fully transparent snapshot; handy when a drawing surface is unavailable.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionResult {
    pub category: Category,
    pub confidence: Option<f32>,
}

/// Model runtime seam. One outstanding `classify` per round.
#[async_trait(?Send)]
pub trait ClassifierPort {
    /// Resolves once the model is loaded.
    async fn ready(&self) -> Result<(), ClassifierError> {
        Ok(())
    }

    async fn classify(&self, snapshot: &Snapshot) -> Result<PredictionResult, ClassifierError>;
}

/// Untyped answer from a model runtime, before it is mapped onto the catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPrediction {
    pub index: Option<u32>,
    pub label: Option<String>,
    pub confidence: Option<f32>,
}

impl RawPrediction {
    /// Map onto a closed-set catalog category. Index wins over label.
    pub fn resolve(&self, catalog: &Catalog) -> Result<PredictionResult, ClassifierError> {
        let category = match (self.index, self.label.as_deref()) {
            (Some(idx), _) => catalog.get(idx as usize).ok_or_else(|| {
                ClassifierError::Inference(format!("class index {idx} out of range"))
            })?,
            (None, Some(label)) => catalog
                .by_name(label)
                .ok_or_else(|| ClassifierError::Inference(format!("unknown class '{label}'")))?,
            (None, None) => {
                return Err(ClassifierError::Inference("empty prediction".into()));
            }
        };
        let confidence = self.confidence.filter(|c| c.is_finite());
        Ok(PredictionResult {
            category,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_rejects_wrong_buffer_length() {
        assert!(Snapshot::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Snapshot::from_rgba(2, 2, vec![0; 15]),
            Err(ClassifierError::Inference(_))
        ));
        assert!(Snapshot::from_rgba(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn raw_prediction_by_index() {
        let raw = RawPrediction {
            index: Some(5),
            confidence: Some(0.8),
            ..Default::default()
        };
        let p = raw.resolve(&Catalog::builtin()).unwrap();
        assert_eq!(p.category.name, "fish");
        assert_eq!(p.confidence, Some(0.8));
    }

    #[test]
    fn raw_prediction_by_label() {
        let raw = RawPrediction {
            label: Some("ice cream".into()),
            confidence: Some(f32::NAN),
            ..Default::default()
        };
        let p = raw.resolve(&Catalog::builtin()).unwrap();
        assert_eq!(p.category.name, "ice cream");
        assert_eq!(p.confidence, None);
    }

    #[test]
    fn raw_prediction_outside_catalog_is_an_inference_error() {
        let cat = Catalog::builtin();
        let out_of_range = RawPrediction {
            index: Some(15),
            ..Default::default()
        };
        assert!(matches!(out_of_range.resolve(&cat), Err(ClassifierError::Inference(_))));
        let unknown = RawPrediction {
            label: Some("zebra".into()),
            ..Default::default()
        };
        assert!(unknown.resolve(&cat).is_err());
        assert!(RawPrediction::default().resolve(&cat).is_err());
    }
}

//! Upload → prediction pipeline.

use dermadetect_core::PredictionResult;
use tracing::info;

use crate::{ClassifierProvider, DetectError, preprocess};

/// Index and value of the largest probability.
///
/// Ties go to the lowest index and NaN never wins. Returns `None` for an
/// empty slice or one that holds only NaN.
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &p) in probs.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        match best {
            Some((_, bp)) if p <= bp => {}
            _ => best = Some((idx, p)),
        }
    }
    best
}

/// Decode an upload, classify it, and resolve the winning class against the catalog.
pub fn detect(
    classifier: &dyn ClassifierProvider,
    bytes: &[u8],
    filename: &str,
) -> Result<PredictionResult, DetectError> {
    let tensor = preprocess(bytes)?;
    let probs = classifier.classify(&tensor)?;

    let (class_index, confidence) = argmax(&probs).ok_or_else(|| {
        DetectError::Inference(anyhow::anyhow!(
            "classifier returned no usable probabilities (len {})",
            probs.len()
        ))
    })?;

    let result = PredictionResult::new(class_index, confidence, filename);
    info!(
        filename,
        class_index,
        disease = result.record.name,
        accuracy = result.accuracy(),
        "classified upload"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageTensor;
    use crate::preprocess::tests::checkerboard_png;

    /// Always returns the same probability vector.
    struct Fixed(Vec<f32>);

    impl ClassifierProvider for Fixed {
        fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, DetectError> {
            assert_eq!(input.shape, [1, 224, 224, 3]);
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl ClassifierProvider for Broken {
        fn classify(&self, _: &ImageTensor) -> Result<Vec<f32>, DetectError> {
            Err(DetectError::Model(anyhow::anyhow!("model.onnx not found")))
        }
    }

    fn one_hot(class: usize, p: f32) -> Vec<f32> {
        let rest = (1.0 - p) / 19.0;
        (0..20).map(|i| if i == class { p } else { rest }).collect()
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[0.9]), Some((0, 0.9)));
    }

    #[test]
    fn argmax_ties_go_to_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.0]), Some((1, 0.4)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.1]), Some((1, 0.3)));
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), None);
    }

    #[test]
    fn argmax_handles_negative_logits() {
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some((1, -1.0)));
    }

    #[test]
    fn argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn detect_melanoma() {
        let clf = Fixed(one_hot(4, 0.9));
        let result = detect(&clf, &checkerboard_png(), "spot.png").unwrap();
        assert_eq!(result.class_index, 4);
        assert_eq!(result.record.name, "Melanoma");
        assert!(result.record.severe);
        assert_eq!(result.medicine, "Fluorouracil (5-FU)");
        assert_eq!(result.accuracy(), 90.0);
        assert_eq!(result.source_filename, "spot.png");
    }

    #[test]
    fn detect_wider_output_falls_back_to_unknown() {
        let mut probs = vec![0.0; 25];
        probs[22] = 0.8;
        let result = detect(&Fixed(probs), &checkerboard_png(), "x.png").unwrap();
        assert_eq!(result.record.name, "Unknown");
        assert_eq!(result.medicine, "Consult a dermatologist");
    }

    #[test]
    fn detect_empty_output_is_inference_error() {
        let err = detect(&Fixed(vec![]), &checkerboard_png(), "x.png").unwrap_err();
        assert!(matches!(err, DetectError::Inference(_)), "{err:?}");
    }

    #[test]
    fn detect_bad_image_never_reaches_classifier() {
        let err = detect(&Broken, b"GIF89a nope", "x.gif").unwrap_err();
        assert!(matches!(err, DetectError::InvalidImage(_)), "{err:?}");
    }

    #[test]
    fn detect_propagates_model_error() {
        let err = detect(&Broken, &checkerboard_png(), "x.png").unwrap_err();
        assert!(matches!(err, DetectError::Model(_)), "{err:?}");
    }
}

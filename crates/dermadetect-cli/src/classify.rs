//! Offline classification: read an image from disk and run the detection pipeline.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use dermadetect_ai::{ClassifierProvider, detect};
use dermadetect_core::PredictionResult;

pub struct ClassifyOutcome {
    pub prediction: PredictionResult,
    pub elapsed_secs: f64,
}

/// Run the same decode → predict → lookup path the `/detect` endpoint uses.
///
/// The reported filename is the file's name without its directory, the way a
/// browser would send it in a multipart upload.
pub fn classify_file(
    classifier: &dyn ClassifierProvider,
    image_path: &Path,
) -> anyhow::Result<ClassifyOutcome> {
    let start = Instant::now();

    let bytes = std::fs::read(image_path)
        .with_context(|| format!("reading {}", image_path.display()))?;
    let filename = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prediction = detect(classifier, &bytes, &filename)
        .with_context(|| format!("classifying {}", image_path.display()))?;

    Ok(ClassifyOutcome {
        prediction,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

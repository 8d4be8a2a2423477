//! Vertical card display for a prediction.

use std::fmt;

use dermadetect_core::PredictionResult;

/// A prediction rendered as a human-readable card.
pub struct PredictionCard<'a>(pub &'a PredictionResult);

impl fmt::Display for PredictionCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(f, "=== {} ===", p.record.name)?;
        if p.record.severe {
            writeln!(f, "!! severe: see a dermatologist promptly")?;
        }
        writeln!(f)?;

        writeln!(f, "Prediction")?;
        writeln!(f, "  {:<12} {}", "image", p.source_filename)?;
        writeln!(f, "  {:<12} {}", "class", p.class_index)?;
        writeln!(f, "  {:<12} {:.2}%", "accuracy", p.accuracy())?;

        if !p.record.symptoms.is_empty() {
            writeln!(f, "Symptoms")?;
            for s in p.record.symptoms {
                writeln!(f, "  - {s}")?;
            }
        }

        writeln!(f, "Treatment")?;
        writeln!(f, "  {}", p.medicine)
    }
}

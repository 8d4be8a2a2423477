//! Fixed disease catalog and medicine lookup keyed by model class index.
//!
//! The classifier emits one probability per class; index `i` of its output
//! corresponds to entry `i` of [`DISEASES`] and [`MEDICINES`]. Both tables are
//! compile-time constants, so lookups never allocate or fail.

use serde::Serialize;

/// Number of classes the model distinguishes.
pub const CLASS_COUNT: usize = 20;

/// Treatment returned for any index outside the catalog.
pub const DEFAULT_MEDICINE: &str = "Consult a dermatologist";

/// One disease category the model can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseRecord {
    pub name: &'static str,
    /// Typical symptoms, in display order.
    pub symptoms: &'static [&'static str],
    /// Whether the condition warrants urgent medical attention.
    pub severe: bool,
}

/// Fallback record for an index the catalog does not cover.
pub const UNKNOWN_DISEASE: DiseaseRecord = DiseaseRecord {
    name: "Unknown",
    symptoms: &[],
    severe: false,
};

const fn record(
    name: &'static str,
    symptoms: &'static [&'static str],
    severe: bool,
) -> DiseaseRecord {
    DiseaseRecord {
        name,
        symptoms,
        severe,
    }
}

// ── Tables ──

static DISEASES: [DiseaseRecord; CLASS_COUNT] = [
    record("Actinic Keratoses", &["Scaly skin", "Red patches"], false),
    record("Basal Cell Carcinoma", &["Shiny bump", "Sore that won’t heal"], true),
    record("Benign Keratosis", &["Thick, scaly growth", "No pain"], false),
    record("Dermatofibroma", &["Firm, red or brown nodule", "No pain"], false),
    record("Melanoma", &["Irregular dark spots", "Bleeding or itching"], true),
    record("Melanocytic Nevi", &["Flat or raised mole", "Symmetrical shape"], false),
    record("Vascular skin lesion", &["Red or purple patches", "Can be painful"], false),
    record("Squamous Cell Carcinoma", &["Red, scaly patches", "Open sores"], true),
    record("Seborrheic Keratosis", &["Waxy, stuck-on look", "Varied colors"], false),
    record("Lentigo Maligna", &["Flat, irregular dark spots", "Grows slowly"], true),
    record("Tinea Corporis (Ringworm)", &["Circular, red rash", "Itchy skin"], false),
    record("Psoriasis", &["Thick, silvery scales", "Itching or burning"], false),
    record("Eczema", &["Red, dry, itchy skin", "Inflammation"], false),
    record("Lupus Rash", &["Butterfly-shaped rash", "Painful swelling"], true),
    record("Rosacea", &["Facial redness", "Visible blood vessels"], false),
    record("Kaposi Sarcoma", &["Purple or red lesions", "Swelling"], true),
    record("Impetigo", &["Red sores", "Yellow crust"], false),
    record("Cutaneous T-cell Lymphoma", &["Scaly patches", "Swollen lymph nodes"], true),
    record("Neurofibromatosis", &["Soft bumps", "Pigmented spots"], true),
    record("Alopecia Areata", &["Sudden hair loss", "Small bald patches"], false),
];

static MEDICINES: [&str; CLASS_COUNT] = [
    "Fluorouracil",
    "Aldara",
    "Hydrogen Peroxide",
    "Fluorouracil",
    "Fluorouracil (5-FU)",
    "Fluorouracil",
    "Fluorouracil",
    "Imiquimod",
    "Salicylic Acid",
    "Topical Retinoids",
    "Antifungal Cream",
    "Steroid Cream",
    "Moisturizers & Steroids",
    "Hydroxychloroquine",
    "Metronidazole Gel",
    "Chemotherapy",
    "Antibiotics",
    "Radiation Therapy",
    "Genetic Counseling",
    "Corticosteroids",
];

/// Disease record for a class index, or [`UNKNOWN_DISEASE`] when out of range.
pub fn find_disease(class_index: usize) -> &'static DiseaseRecord {
    DISEASES.get(class_index).unwrap_or(&UNKNOWN_DISEASE)
}

/// Treatment for a class index, or [`DEFAULT_MEDICINE`] when out of range.
pub fn find_medicine(class_index: usize) -> &'static str {
    MEDICINES
        .get(class_index)
        .copied()
        .unwrap_or(DEFAULT_MEDICINE)
}

//! Fixed text-to-label vocabularies for the three source collections.
//!
//! Unmapped or unknown text never fails; it falls back to the documented
//! default (`Other`, severity `-1`). That fallback is policy, not an error.

use crate::metadata::DiseaseLabel;

/// Map an ICBHI diagnosis text to the unified vocabulary.
///
/// `LRTI` is deliberately collapsed into `Other`; `Healthy` becomes
/// `Normal`. Anything unrecognized is `Other`.
pub fn map_icbhi_diagnosis(text: &str) -> DiseaseLabel {
    match text {
        "COPD" => DiseaseLabel::Copd,
        "Asthma" => DiseaseLabel::Asthma,
        "Pneumonia" => DiseaseLabel::Pneumonia,
        "Bronchiectasis" => DiseaseLabel::Bronchiectasis,
        "Bronchiolitis" => DiseaseLabel::Bronchiolitis,
        "URTI" => DiseaseLabel::Urti,
        "Healthy" => DiseaseLabel::Normal,
        _ => DiseaseLabel::Other,
    }
}

/// Map a disease folder name (case-insensitive) to the unified vocabulary.
pub fn map_folder_label(name: &str) -> DiseaseLabel {
    match name.to_lowercase().as_str() {
        "healthy" => DiseaseLabel::Normal,
        "copd" => DiseaseLabel::Copd,
        "asthma" => DiseaseLabel::Asthma,
        "bronchiectasis" => DiseaseLabel::Bronchiectasis,
        "bronchiolitis" => DiseaseLabel::Bronchiolitis,
        "pneumonia" => DiseaseLabel::Pneumonia,
        "urti" => DiseaseLabel::Urti,
        _ => DiseaseLabel::Other,
    }
}

/// Classify a severity/diagnosis class string (e.g. `COPD3`).
///
/// Strings starting with `COPD` carry their trailing character as a severity
/// digit; a non-numeric trailing character yields severity `-1`. Everything
/// else maps to `Other` with severity `-1`.
pub fn classify_severity(class: &str) -> (DiseaseLabel, i32) {
    if class.starts_with("COPD") {
        let severity = class
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map_or(-1, |d| i32::try_from(d).unwrap_or(-1));
        (DiseaseLabel::Copd, severity)
    } else {
        (DiseaseLabel::Other, -1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icbhi_map_known_diagnoses() {
        assert_eq!(map_icbhi_diagnosis("COPD"), DiseaseLabel::Copd);
        assert_eq!(map_icbhi_diagnosis("Healthy"), DiseaseLabel::Normal);
        assert_eq!(map_icbhi_diagnosis("URTI"), DiseaseLabel::Urti);
        assert_eq!(map_icbhi_diagnosis("Bronchiolitis"), DiseaseLabel::Bronchiolitis);
    }

    #[test]
    fn test_icbhi_map_lrti_collapses_to_other() {
        assert_eq!(map_icbhi_diagnosis("LRTI"), DiseaseLabel::Other);
    }

    #[test]
    fn test_icbhi_map_unknown_defaults_to_other() {
        assert_eq!(map_icbhi_diagnosis(""), DiseaseLabel::Other);
        assert_eq!(map_icbhi_diagnosis("copd"), DiseaseLabel::Other);
        assert_eq!(map_icbhi_diagnosis("Fibrosis"), DiseaseLabel::Other);
    }

    #[test]
    fn test_folder_map_is_case_insensitive() {
        assert_eq!(map_folder_label("Asthma"), DiseaseLabel::Asthma);
        assert_eq!(map_folder_label("ASTHMA"), DiseaseLabel::Asthma);
        assert_eq!(map_folder_label("Healthy"), DiseaseLabel::Normal);
        assert_eq!(map_folder_label("copd"), DiseaseLabel::Copd);
    }

    #[test]
    fn test_folder_map_unknown_defaults_to_other() {
        assert_eq!(map_folder_label("covid"), DiseaseLabel::Other);
        assert_eq!(map_folder_label(""), DiseaseLabel::Other);
    }

    #[test]
    fn test_classify_severity_copd_with_digit() {
        assert_eq!(classify_severity("COPD0"), (DiseaseLabel::Copd, 0));
        assert_eq!(classify_severity("COPD2"), (DiseaseLabel::Copd, 2));
        assert_eq!(classify_severity("COPD4"), (DiseaseLabel::Copd, 4));
    }

    #[test]
    fn test_classify_severity_non_numeric_trailer_is_unknown() {
        assert_eq!(classify_severity("COPD"), (DiseaseLabel::Copd, -1));
        assert_eq!(classify_severity("COPDX"), (DiseaseLabel::Copd, -1));
    }

    #[test]
    fn test_classify_severity_non_copd_is_other() {
        assert_eq!(classify_severity("Asthma"), (DiseaseLabel::Other, -1));
        assert_eq!(classify_severity(""), (DiseaseLabel::Other, -1));
        assert_eq!(classify_severity("copd3"), (DiseaseLabel::Other, -1));
    }
}

use crate::domain::cooling::types::FeatureVector;

/// Default ordered list of feature names.
/// These match the dataset CSV column names; a trained model stores its own
/// copy and inference always follows the stored order.
pub const FEATURE_NAMES: &[&str] = &["ambient_temp_c", "irradiance_wm2", "panel_temp_c", "hour"];

/// Column names written by older generators, mapped onto current ones.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("AmbientTemp_C", "ambient_temp_c"),
    ("Irradiance_Wm2", "irradiance_wm2"),
    ("panel_temp", "panel_temp_c"),
    ("hour_of_day", "hour"),
];

pub fn canonical_name(name: &str) -> &str {
    LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Looks up one feature value by (possibly legacy) column name.
pub fn feature_value(fv: &FeatureVector, name: &str) -> Option<f64> {
    match canonical_name(name) {
        "ambient_temp_c" => Some(fv.ambient_temp_c),
        "irradiance_wm2" => Some(fv.irradiance_wm2),
        "panel_temp_c" => Some(fv.panel_temp_c),
        "hour" => Some(fv.hour_of_day as f64),
        _ => None,
    }
}

/// Converts features into a row ordered by `names`.
/// Returns the first unknown name on failure.
pub fn features_to_row<S: AsRef<str>>(fv: &FeatureVector, names: &[S]) -> Result<Vec<f64>, String> {
    names
        .iter()
        .map(|n| feature_value(fv, n.as_ref()).ok_or_else(|| n.as_ref().to_string()))
        .collect()
}

//! Parameter file loading
//!
//! Parameters are read from a YAML file when one is given; otherwise the
//! built-in stroke/anticoagulation preset is used. Loaded parameters are
//! always validated before they reach a cohort.

use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use strokesim_core::ModelParameters;

/// Parse and validate parameters from a YAML string
pub fn parse_parameters(yaml: &str) -> color_eyre::Result<ModelParameters> {
    let params: ModelParameters =
        serde_saphyr::from_str(yaml).wrap_err("Failed to parse parameters")?;
    params.validate().wrap_err("Invalid parameters")?;
    Ok(params)
}

/// Serialize parameters to YAML
pub fn parameters_to_yaml(params: &ModelParameters) -> Result<String, serde_saphyr::ser::Error> {
    serde_saphyr::to_string(params)
}

/// Load parameters from `path`, or the preset when `path` is `None`
pub fn load_parameters(path: Option<&Path>) -> color_eyre::Result<ModelParameters> {
    let Some(path) = path else {
        tracing::info!("No parameter file given, using the stroke/anticoagulation preset");
        return Ok(ModelParameters::stroke_anticoagulation());
    };

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read parameters from {}", path.display()))?;
    let params = parse_parameters(&content)
        .wrap_err_with(|| format!("Failed to load parameters from {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        population = params.population_size,
        therapies = params.therapies.len(),
        "Loaded parameters"
    );
    Ok(params)
}

//! URL modeling: source page validation and output filename derivation.

mod path;
mod validate;

pub use path::{basename_from_url_path, output_file_name};
pub use validate::{validate_url, DomainRule, InvalidUrl, SourceUrl};

use crate::config::AcdlConfig;
use std::path::PathBuf;

impl DomainRule {
    pub fn from_config(cfg: &AcdlConfig) -> Self {
        DomainRule::new(cfg.expected_domain.clone(), cfg.expected_suffix.clone())
    }
}

/// Full output path for `source` under the configured output directory.
pub fn output_path(source: &SourceUrl, cfg: &AcdlConfig) -> Result<PathBuf, InvalidUrl> {
    let name = output_file_name(source, cfg.filename_max_chars, &cfg.filename_extension)?;
    Ok(cfg.output_dir.join(name))
}

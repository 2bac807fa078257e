//! Handler configuration.
//!
//! Options can be built in code or extracted from any figment provider stack, e.g. a YAML
//! file overlaid with `ODATA_`-prefixed environment variables:
//!
//! ```rust,ignore
//! use figment::{Figment, providers::{Env, Format, Yaml}};
//!
//! let figment = Figment::new()
//!     .merge(Yaml::file("odata.yaml"))
//!     .merge(Env::prefixed("ODATA_"));
//! let options = FilterOptions::from_figment(&figment)?;
//! ```

use figment::Figment;
use serde::{Deserialize, Serialize};

/// Configuration error for option extraction.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid OData filter options: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Options shared by the filter handlers of one registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOptions {
    /// Percent-encode string filter values before they are inserted into the URL.
    pub encode_url_components: bool,
}

impl FilterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encode_url_components(mut self, enabled: bool) -> Self {
        self.encode_url_components = enabled;
        self
    }

    /// Extract options from the root of `figment`. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if a key has the wrong type or is not recognized.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::{Env, Format, Serialized, Yaml};

    #[test]
    fn test_default_does_not_encode() {
        assert!(!FilterOptions::default().encode_url_components);
        assert!(FilterOptions::new().with_encode_url_components(true).encode_url_components);
    }

    #[test]
    fn test_from_serialized_provider() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "encode_url_components": true
        })));
        let options = FilterOptions::from_figment(&figment).unwrap();
        assert!(options.encode_url_components);
    }

    #[test]
    fn test_empty_figment_uses_defaults() {
        let options = FilterOptions::from_figment(&Figment::new()).unwrap();
        assert_eq!(options, FilterOptions::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "encode_everything": true
        })));
        assert!(FilterOptions::from_figment(&figment).is_err());
    }

    #[test]
    fn test_yaml_overlaid_with_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("odata.yaml", "encode_url_components: false\n")?;
            jail.set_env("ODATA_ENCODE_URL_COMPONENTS", "true");

            let figment = Figment::new()
                .merge(Yaml::file("odata.yaml"))
                .merge(Env::prefixed("ODATA_"));
            let options = FilterOptions::from_figment(&figment).expect("valid options");
            assert!(options.encode_url_components);
            Ok(())
        });
    }
}

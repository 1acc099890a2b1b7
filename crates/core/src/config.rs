//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into controllers as an
//! `Arc<CoreConfig>`. Library code never reads environment variables; the host decides where a
//! configuration document comes from.

use crate::constants::DEFAULT_SUBMIT_DELAY;
use crate::error::{HealthError, HealthResult};
use crate::forms::OptionMap;
use crate::locations::LocationTree;
use crate::regions::{Region, RegionCatalogue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    locations: LocationTree,
    regions: Arc<RegionCatalogue>,
    submit_delay: Duration,
}

impl CoreConfig {
    pub fn new(locations: LocationTree, regions: RegionCatalogue, submit_delay: Duration) -> Self {
        Self {
            locations,
            regions: Arc::new(regions),
            submit_delay,
        }
    }

    /// The dashboard's shipped data set.
    pub fn builtin() -> HealthResult<Self> {
        Ok(Self::new(
            LocationTree::builtin(),
            RegionCatalogue::builtin()?,
            DEFAULT_SUBMIT_DELAY,
        ))
    }

    /// Parse and validate a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::ConfigSchema`] with the failing path if the document does not match
    /// the schema (unknown keys included), and the usual location or region errors if the
    /// tables are inconsistent.
    pub fn from_yaml(yaml_text: &str) -> HealthResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, ConfigWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(HealthError::ConfigSchema {
                    path,
                    message: source.to_string(),
                });
            }
        };

        let locations = LocationTree::new(
            wire.locations.provinces,
            wire.locations.cities.into_iter().collect(),
            wire.locations.districts.into_iter().collect::<OptionMap>(),
        )?;

        let regions = wire
            .regions
            .into_iter()
            .map(|r| {
                Region::new(
                    &r.id,
                    &r.name,
                    [r.area.left, r.area.top, r.area.width, r.area.height],
                    r.tags,
                )
            })
            .collect::<HealthResult<Vec<_>>>()?;

        let submit_delay = wire
            .submit_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SUBMIT_DELAY);

        Ok(Self::new(
            locations,
            RegionCatalogue::new(regions)?,
            submit_delay,
        ))
    }

    /// Read and parse a YAML configuration file.
    pub fn from_file(path: &Path) -> HealthResult<Self> {
        let text = std::fs::read_to_string(path).map_err(HealthError::ConfigRead)?;
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::from_yaml(&text)
    }

    pub fn locations(&self) -> &LocationTree {
        &self.locations
    }

    pub fn regions(&self) -> &Arc<RegionCatalogue> {
        &self.regions
    }

    pub fn submit_delay(&self) -> Duration {
        self.submit_delay
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigWire {
    #[serde(default)]
    submit_delay_ms: Option<u64>,
    locations: LocationsWire,
    regions: Vec<RegionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationsWire {
    provinces: Vec<String>,
    #[serde(default)]
    cities: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    districts: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionWire {
    id: String,
    name: String,
    area: AreaWire,
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AreaWire {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Point;
    use std::io::Write;

    const SMALL: &str = r#"
submit_delay_ms: 250
locations:
  provinces: [北京市]
  cities:
    北京市: [朝阳区, 东城区]
  districts:
    朝阳区: [三里屯, 望京]
regions:
  - id: head
    name: 头部
    area: { left: 40, top: 0, width: 20, height: 20 }
    tags: [头痛, 头晕]
  - id: chest
    name: 胸部
    area: { left: 40, top: 20, width: 20, height: 20 }
    tags: [胸痛]
"#;

    #[test]
    fn builtin_config_matches_dashboard() {
        let cfg = CoreConfig::builtin().expect("builtin");
        assert_eq!(cfg.locations().provinces().len(), 5);
        assert_eq!(cfg.regions().len(), 8);
        assert_eq!(cfg.submit_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn parses_small_document() {
        let cfg = CoreConfig::from_yaml(SMALL).expect("valid config");
        assert_eq!(cfg.submit_delay(), Duration::from_millis(250));
        assert_eq!(cfg.locations().districts_of("朝阳区"), ["三里屯", "望京"]);
        assert!(cfg.locations().districts_of("东城区").is_empty());
        let hit = cfg.regions().resolve(Point::new(50.0, 20.0)).expect("region");
        assert_eq!(hit.id(), "chest");
    }

    #[test]
    fn delay_defaults_when_omitted() {
        let text = SMALL.replace("submit_delay_ms: 250\n", "");
        let cfg = CoreConfig::from_yaml(&text).expect("valid config");
        assert_eq!(cfg.submit_delay(), DEFAULT_SUBMIT_DELAY);
    }

    #[test]
    fn unknown_keys_are_rejected_with_path() {
        let text = SMALL.replace("    tags: [胸痛]", "    tags: [胸痛]\n    colour: red");
        let err = CoreConfig::from_yaml(&text).expect_err("unknown key");
        assert!(
            matches!(&err, HealthError::ConfigSchema { path, message } if path.starts_with("regions") && message.contains("colour")),
            "{err}"
        );
    }

    #[test]
    fn unknown_parent_key_is_rejected() {
        let text = SMALL.replace("    朝阳区: [三里屯, 望京]", "    海淀区: [中关村]");
        let err = CoreConfig::from_yaml(&text).expect_err("district keyed by unknown city");
        assert!(matches!(err, HealthError::UnknownParentKey { field, key } if field == "district" && key == "海淀区"));
    }

    #[test]
    fn invalid_region_layout_is_rejected() {
        let text = SMALL.replace("left: 40, top: 20", "left: 90, top: 20");
        let err = CoreConfig::from_yaml(&text).expect_err("off the diagram");
        assert!(matches!(err, HealthError::InvalidRegionLayout { region, .. } if region == "chest"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SMALL.as_bytes()).expect("write");
        let cfg = CoreConfig::from_file(file.path()).expect("valid file");
        assert_eq!(cfg.regions().len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = CoreConfig::from_file(&dir.path().join("absent.yaml")).expect_err("missing");
        assert!(matches!(err, HealthError::ConfigRead(_)));
    }
}

//! Administrative location hierarchy: province → city → district.
//!
//! The option tables are validated when loaded: every city table must be keyed by a known
//! province and every district table by a known city. A city with no district table simply has
//! no districts.

use crate::constants::{CITIES, DISTRICTS, PROVINCES};
use crate::error::{HealthError, HealthResult};
use crate::forms::OptionMap;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationTree {
    provinces: Vec<String>,
    cities: OptionMap,
    districts: OptionMap,
}

impl LocationTree {
    /// Build a tree from its three levels.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::UnknownParentKey`] if a city table names an unknown province or a
    /// district table names an unknown city, and [`HealthError::InvalidInput`] for blank or
    /// repeated option names.
    pub fn new(provinces: Vec<String>, cities: OptionMap, districts: OptionMap) -> HealthResult<Self> {
        check_level("province", provinces.iter().map(String::as_str))?;
        let province_set: HashSet<&str> = provinces.iter().map(String::as_str).collect();
        for key in cities.keys() {
            if !province_set.contains(key) {
                return Err(HealthError::UnknownParentKey {
                    field: "city".into(),
                    key: key.to_string(),
                });
            }
            check_level("city", cities.get(key).iter().map(String::as_str))?;
        }

        let city_set: HashSet<&str> = cities.all_options().collect();
        for key in districts.keys() {
            if !city_set.contains(key) {
                return Err(HealthError::UnknownParentKey {
                    field: "district".into(),
                    key: key.to_string(),
                });
            }
            check_level("district", districts.get(key).iter().map(String::as_str))?;
        }

        Ok(Self {
            provinces,
            cities,
            districts,
        })
    }

    /// The dashboard's shipped location tables.
    pub fn builtin() -> Self {
        Self {
            provinces: PROVINCES.iter().map(|p| p.to_string()).collect(),
            cities: OptionMap::from_rows(CITIES),
            districts: OptionMap::from_rows(DISTRICTS),
        }
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn cities(&self) -> &OptionMap {
        &self.cities
    }

    pub fn districts(&self) -> &OptionMap {
        &self.districts
    }

    pub fn cities_of(&self, province: &str) -> &[String] {
        self.cities.get(province)
    }

    pub fn districts_of(&self, city: &str) -> &[String] {
        self.districts.get(city)
    }
}

fn check_level<'a>(level: &str, names: impl Iterator<Item = &'a str>) -> HealthResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(HealthError::InvalidInput(format!("{level} name cannot be empty")));
        }
        if !seen.insert(name) {
            return Err(HealthError::InvalidInput(format!(
                "{level} '{name}' is listed twice"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builtin_tree_passes_its_own_validation() {
        let tree = LocationTree::builtin();
        let rebuilt = LocationTree::new(
            tree.provinces().to_vec(),
            tree.cities().clone(),
            tree.districts().clone(),
        )
        .expect("builtin tables are consistent");
        assert_eq!(rebuilt, tree);
        assert_eq!(tree.cities_of("北京市").len(), 4);
        assert_eq!(tree.districts_of("朝阳区"), strings(&["三里屯", "望京", "CBD", "奥运村"]));
        assert!(tree.districts_of("东城区").is_empty());
    }

    #[test]
    fn rejects_city_table_for_unknown_province() {
        let mut cities = OptionMap::new();
        cities.insert("火星", strings(&["基地"]));
        let err = LocationTree::new(strings(&["北京市"]), cities, OptionMap::new())
            .expect_err("unknown province");
        assert!(matches!(err, HealthError::UnknownParentKey { field, key } if field == "city" && key == "火星"));
    }

    #[test]
    fn rejects_district_table_for_unknown_city() {
        let mut cities = OptionMap::new();
        cities.insert("北京市", strings(&["朝阳区"]));
        let mut districts = OptionMap::new();
        districts.insert("浦东新区", strings(&["陆家嘴"]));
        let err = LocationTree::new(strings(&["北京市"]), cities, districts)
            .expect_err("unknown city");
        assert!(matches!(err, HealthError::UnknownParentKey { field, .. } if field == "district"));
    }

    #[test]
    fn rejects_duplicate_province() {
        let err = LocationTree::new(strings(&["北京市", "北京市"]), OptionMap::new(), OptionMap::new())
            .expect_err("duplicate");
        assert!(matches!(err, HealthError::InvalidInput(msg) if msg.contains("listed twice")));
    }
}

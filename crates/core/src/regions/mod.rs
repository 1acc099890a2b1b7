//! Body diagram regions and pointer resolution.
//!
//! Coordinates are percentages of the rendered diagram. A [`BoundingArea`] is half-open, so two
//! regions that merely share an edge never both contain a point.

pub mod records;
pub mod session;

pub use records::{SymptomLog, SymptomRecord};
pub use session::{RegionSession, SessionState, SymptomSelector};

use crate::constants::{RegionRow, BODY_REGIONS};
use crate::error::{HealthError, HealthResult};
use healthdesk_types::{NonEmptyText, Percent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A pointer position on the diagram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingArea {
    pub left: Percent,
    pub top: Percent,
    pub width: Percent,
    pub height: Percent,
}

impl BoundingArea {
    pub fn right(&self) -> f64 {
        self.left.get() + self.width.get()
    }

    pub fn bottom(&self) -> f64 {
        self.top.get() + self.height.get()
    }

    /// `left <= x < right` and `top <= y < bottom`.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left.get()
            && point.x < self.right()
            && point.y >= self.top.get()
            && point.y < self.bottom()
    }

    pub fn overlaps(&self, other: &BoundingArea) -> bool {
        self.left.get() < other.right()
            && other.left.get() < self.right()
            && self.top.get() < other.bottom()
            && other.top.get() < self.bottom()
    }
}

/// A selectable region with its candidate tag vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Region {
    id: NonEmptyText,
    name: NonEmptyText,
    area: BoundingArea,
    tags: Vec<NonEmptyText>,
}

impl Region {
    /// Build a region from `[left, top, width, height]`.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidRegionLayout`] if the id, name or a tag is blank, the tag
    /// list is empty or repeats a tag, or the rectangle has no extent or leaves the `0..=100`
    /// grid.
    pub fn new<T: AsRef<str>>(
        id: &str,
        name: &str,
        [left, top, width, height]: [f64; 4],
        tags: impl IntoIterator<Item = T>,
    ) -> HealthResult<Self> {
        let invalid = |reason: String| HealthError::InvalidRegionLayout {
            region: id.to_string(),
            reason,
        };

        let id_text = NonEmptyText::new(id).map_err(|e| invalid(format!("id: {e}")))?;
        let name = NonEmptyText::new(name).map_err(|e| invalid(format!("name: {e}")))?;

        let percent = |label: &str, v: f64| {
            Percent::new(v).map_err(|e| invalid(format!("{label}: {e}")))
        };
        let area = BoundingArea {
            left: percent("left", left)?,
            top: percent("top", top)?,
            width: percent("width", width)?,
            height: percent("height", height)?,
        };
        if area.width.get() <= 0.0 || area.height.get() <= 0.0 {
            return Err(invalid("width and height must be positive".into()));
        }
        if area.right() > Percent::MAX || area.bottom() > Percent::MAX {
            return Err(invalid("rectangle extends past the diagram".into()));
        }

        let mut seen = HashSet::new();
        let mut tag_list = Vec::new();
        for tag in tags {
            let tag = NonEmptyText::new(tag).map_err(|e| invalid(format!("tag: {e}")))?;
            if !seen.insert(tag.clone()) {
                return Err(invalid(format!("tag '{tag}' listed twice")));
            }
            tag_list.push(tag);
        }
        if tag_list.is_empty() {
            return Err(invalid("no candidate tags".into()));
        }

        Ok(Self {
            id: id_text,
            name,
            area,
            tags: tag_list,
        })
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn area(&self) -> &BoundingArea {
        &self.area
    }

    pub fn tags(&self) -> &[NonEmptyText] {
        &self.tags
    }

    pub fn offers(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == tag)
    }
}

/// The configured regions in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionCatalogue {
    regions: Vec<Region>,
}

impl RegionCatalogue {
    /// Validate a region list.
    ///
    /// Overlapping rectangles are accepted; resolution then prefers the region declared first.
    /// Each overlapping pair is reported with a warning.
    pub fn new(regions: Vec<Region>) -> HealthResult<Self> {
        let mut ids = HashSet::new();
        for region in &regions {
            if !ids.insert(region.id()) {
                return Err(HealthError::DuplicateRegion(region.id().to_string()));
            }
        }

        let catalogue = Self { regions };
        for (first, second) in catalogue.overlaps() {
            tracing::warn!(first, second, "diagram regions overlap; {first} wins on shared points");
        }
        Ok(catalogue)
    }

    pub fn from_rows(rows: &[RegionRow]) -> HealthResult<Self> {
        let regions = rows
            .iter()
            .map(|(id, name, area, tags)| Region::new(id, name, *area, tags.iter()))
            .collect::<HealthResult<Vec<_>>>()?;
        Self::new(regions)
    }

    /// The dashboard's shipped body diagram.
    pub fn builtin() -> HealthResult<Self> {
        Self::from_rows(BODY_REGIONS)
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// First declared region containing `point`.
    pub fn resolve(&self, point: Point) -> Option<&Region> {
        self.regions.iter().find(|r| r.area.contains(point))
    }

    /// Pairs of overlapping region ids, earlier declaration first.
    pub fn overlaps(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (i, a) in self.regions.iter().enumerate() {
            for b in &self.regions[i + 1..] {
                if a.area.overlaps(&b.area) {
                    pairs.push((a.id(), b.id()));
                }
            }
        }
        pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str, left: f64, top: f64) -> Region {
        Region::new(id, id, [left, top, 10.0, 10.0], ["ache"]).expect("valid region")
    }

    #[test]
    fn builtin_catalogue_has_eight_regions_with_four_tags() {
        let catalogue = RegionCatalogue::builtin().expect("builtin regions");
        assert_eq!(catalogue.len(), 8);
        assert!(catalogue.iter().all(|r| r.tags().len() == 4));
        assert_eq!(catalogue.get("head").map(Region::name), Some("头部"));
    }

    #[test]
    fn builtin_overlap_is_reported_and_first_declared_wins() {
        let catalogue = RegionCatalogue::builtin().expect("builtin regions");
        assert_eq!(
            catalogue.overlaps(),
            vec![("chest", "rightArm"), ("abdomen", "rightArm")]
        );
        let hit = catalogue.resolve(Point::new(62.0, 30.0)).expect("a region");
        assert_eq!(hit.id(), "chest");
        let hit = catalogue.resolve(Point::new(67.0, 30.0)).expect("a region");
        assert_eq!(hit.id(), "rightArm");
        let hit = catalogue.resolve(Point::new(62.0, 38.0)).expect("a region");
        assert_eq!(hit.id(), "abdomen");
    }

    #[test]
    fn bounding_area_is_half_open() {
        let catalogue =
            RegionCatalogue::new(vec![square("a", 0.0, 0.0), square("b", 10.0, 0.0)]).expect("catalogue");
        assert_eq!(catalogue.resolve(Point::new(0.0, 0.0)).map(Region::id), Some("a"));
        assert_eq!(catalogue.resolve(Point::new(10.0, 5.0)).map(Region::id), Some("b"));
        assert_eq!(catalogue.resolve(Point::new(20.0, 5.0)), None);
        assert_eq!(catalogue.resolve(Point::new(5.0, 10.0)), None);
        assert!(catalogue.overlaps().is_empty());
    }

    #[test]
    fn point_outside_every_region_resolves_to_none() {
        let catalogue = RegionCatalogue::builtin().expect("builtin regions");
        assert!(catalogue.resolve(Point::new(1.0, 99.0)).is_none());
        assert!(catalogue.resolve(Point::new(-5.0, 30.0)).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = RegionCatalogue::new(vec![square("a", 0.0, 0.0), square("a", 50.0, 50.0)])
            .expect_err("duplicate");
        assert!(matches!(err, HealthError::DuplicateRegion(id) if id == "a"));
    }

    #[test]
    fn rejects_bad_layouts() {
        let err = Region::new("x", "X", [95.0, 0.0, 10.0, 10.0], ["t"]).expect_err("past edge");
        assert!(matches!(err, HealthError::InvalidRegionLayout { reason, .. } if reason.contains("past")));

        let err = Region::new("x", "X", [0.0, 0.0, 0.0, 10.0], ["t"]).expect_err("no width");
        assert!(matches!(err, HealthError::InvalidRegionLayout { .. }));

        let err = Region::new("x", "X", [-1.0, 0.0, 5.0, 5.0], ["t"]).expect_err("negative");
        assert!(matches!(err, HealthError::InvalidRegionLayout { reason, .. } if reason.starts_with("left")));

        let none: [&str; 0] = [];
        let err = Region::new("x", "X", [0.0, 0.0, 5.0, 5.0], none).expect_err("no tags");
        assert!(matches!(err, HealthError::InvalidRegionLayout { reason, .. } if reason.contains("no candidate")));

        let err = Region::new("x", "X", [0.0, 0.0, 5.0, 5.0], ["t", " t "]).expect_err("dup tag");
        assert!(matches!(err, HealthError::InvalidRegionLayout { reason, .. } if reason.contains("twice")));

        let err = Region::new(" ", "X", [0.0, 0.0, 5.0, 5.0], ["t"]).expect_err("blank id");
        assert!(matches!(err, HealthError::InvalidRegionLayout { .. }));
    }
}

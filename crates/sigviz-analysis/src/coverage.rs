//! Spatial coverage classification.
//!
//! Valid samples are indexed in an R-tree of Earth-centred Cartesian
//! coordinates. Straight-line (chord) distance is monotonic in great-circle
//! distance, so the chord-nearest sample is also the haversine-nearest one and
//! a single nearest-neighbour lookup decides coverage without any
//! antimeridian or polar special cases.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;
use sigviz_core::{haversine_m, LocationPoint, EARTH_RADIUS_M};

use crate::percent;

#[derive(Debug, Clone, Copy)]
struct IndexedSample {
    xyz: [f64; 3],
    lat: f64,
    lon: f64,
}

impl RTreeObject for IndexedSample {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for IndexedSample {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

fn to_cartesian(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [
        EARTH_RADIUS_M * lat.cos() * lon.cos(),
        EARTH_RADIUS_M * lat.cos() * lon.sin(),
        EARTH_RADIUS_M * lat.sin(),
    ]
}

/// Nearest-neighbour index over valid sample coordinates.
pub struct SampleIndex {
    tree: RTree<IndexedSample>,
}

impl SampleIndex {
    /// Builds the index from `(latitude, longitude)` pairs in degrees.
    pub fn new(coords: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let samples = coords
            .into_iter()
            .map(|(lat, lon)| IndexedSample {
                xyz: to_cartesian(lat, lon),
                lat,
                lon,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(samples),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Haversine distance in meters to the closest indexed sample.
    #[must_use]
    pub fn nearest_distance_m(&self, lat: f64, lon: f64) -> Option<f64> {
        self.tree
            .nearest_neighbor(&to_cartesian(lat, lon))
            .map(|nearest| haversine_m(lat, lon, nearest.lat, nearest.lon))
    }

    /// Whether any indexed sample lies within `radius_m` (inclusive).
    #[must_use]
    pub fn has_sample_within(&self, lat: f64, lon: f64, radius_m: f64) -> bool {
        self.nearest_distance_m(lat, lon)
            .is_some_and(|dist| dist <= radius_m)
    }
}

/// Coverage verdict for one location point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageClassification {
    /// Index into the location list the classification was computed for.
    pub point_index: usize,
    pub has_signal_within_radius: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub radius_m: f64,
    pub total_points: usize,
    pub covered: usize,
    pub no_signal: usize,
    /// `no_signal / total_points` as a percentage, two decimals.
    pub gap_percent: f64,
    /// Placeholder ("no service") readings seen in the logs.
    pub placeholder_samples: usize,
    /// Placeholder readings with no valid sample within the radius.
    pub placeholder_confirmed: usize,
    #[serde(skip)]
    pub classifications: Vec<CoverageClassification>,
}

impl CoverageSummary {
    /// Indices of location points classified "confirmed no signal".
    pub fn gap_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.classifications
            .iter()
            .filter(|c| !c.has_signal_within_radius)
            .map(|c| c.point_index)
    }
}

/// Classify every location point as covered or "confirmed no signal".
///
/// A point is covered when at least one sample in `index` lies within
/// `radius_m` of it, regardless of band or timestamp. Exactly one
/// classification is produced per point, in input order.
#[must_use]
pub fn classify_coverage(
    locations: &[LocationPoint],
    index: &SampleIndex,
    radius_m: f64,
) -> CoverageSummary {
    let classifications: Vec<CoverageClassification> = locations
        .iter()
        .enumerate()
        .map(|(point_index, point)| CoverageClassification {
            point_index,
            has_signal_within_radius: index.has_sample_within(
                point.latitude,
                point.longitude,
                radius_m,
            ),
        })
        .collect();

    let covered = classifications
        .iter()
        .filter(|c| c.has_signal_within_radius)
        .count();
    let total_points = classifications.len();
    let no_signal = total_points - covered;

    tracing::debug!(
        total = total_points,
        covered,
        no_signal,
        radius_m,
        "coverage classified"
    );

    CoverageSummary {
        radius_m,
        total_points,
        covered,
        no_signal,
        gap_percent: percent(no_signal, total_points),
        placeholder_samples: 0,
        placeholder_confirmed: 0,
        classifications,
    }
}

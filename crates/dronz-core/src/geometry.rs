//! Planar geometry over longitude/latitude degrees.
//!
//! Distances are Euclidean in degree space; the drone moves far too little
//! between waypoints for curvature to matter.
//!
//! Headings follow the compass convention: 0° points north (+lat) and angles
//! grow clockwise, so 90° points east (+lng).

use serde::{Deserialize, Serialize};

use crate::models::{Position, Region, POSITION_EPSILON};

/// Length of a single drone move, in degrees.
pub const MOVE_DISTANCE: f64 = 0.00015;
/// Two positions closer than this are "close"; used as the goal test.
pub const CLOSE_THRESHOLD: f64 = 0.00015;
/// Number of discrete compass headings a move may take.
pub const HEADING_COUNT: usize = 16;
/// Wire value of the hover heading.
pub const HOVER_SENTINEL: f64 = 999.0;

const HEADING_STEP_DEG: f64 = 360.0 / HEADING_COUNT as f64;

/// Direction of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Heading {
    /// One of the `HEADING_COUNT` compass directions, `index * 22.5°`.
    Compass(u8),
    /// Zero displacement.
    Hover,
}

impl Heading {
    /// All compass headings, clockwise from north.
    pub fn compass() -> impl Iterator<Item = Heading> {
        (0..HEADING_COUNT as u8).map(Heading::Compass)
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Heading::Compass(index) => Some(index as usize % HEADING_COUNT),
            Heading::Hover => None,
        }
    }

    /// Degrees clockwise from north, or `HOVER_SENTINEL`.
    pub fn degrees(self) -> f64 {
        match self.index() {
            Some(index) => index as f64 * HEADING_STEP_DEG,
            None => HOVER_SENTINEL,
        }
    }

    /// The heading pointing the opposite way. Hover stays hover.
    pub fn reversed(self) -> Heading {
        match self.index() {
            Some(index) => Heading::Compass(((index + HEADING_COUNT / 2) % HEADING_COUNT) as u8),
            None => Heading::Hover,
        }
    }
}

impl From<Heading> for f64 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

impl TryFrom<f64> for Heading {
    type Error = String;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        if degrees == HOVER_SENTINEL {
            return Ok(Heading::Hover);
        }
        let index = degrees / HEADING_STEP_DEG;
        if !(0.0..360.0).contains(&degrees) || (index - index.round()).abs() > 1e-9 {
            return Err(format!(
                "{degrees} is not a multiple of {HEADING_STEP_DEG} in [0, 360) nor the hover sentinel"
            ));
        }
        Ok(Heading::Compass(index.round() as u8))
    }
}

/// Euclidean distance between two positions, in degrees.
pub fn distance(a: Position, b: Position) -> f64 {
    (a.lng - b.lng).hypot(a.lat - b.lat)
}

pub fn is_close(a: Position, b: Position) -> bool {
    distance(a, b) < CLOSE_THRESHOLD
}

/// Check if a position lies inside a region.
///
/// Uses even-odd ray casting over the closed boundary. A position on an edge
/// or vertex (within `POSITION_EPSILON`) counts as inside, so a no-fly
/// boundary is itself forbidden and a central-area boundary is part of the
/// area.
pub fn is_in_region(p: Position, region: &Region) -> bool {
    let ring = region.ring();
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if distance_to_segment(p, a, b) <= POSITION_EPSILON {
            return true;
        }
        if (a.lat > p.lat) != (b.lat > p.lat)
            && p.lng < (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Move `p` by `MOVE_DISTANCE` along `heading`. Hovering returns `p` untouched.
pub fn project(p: Position, heading: Heading) -> Position {
    if heading == Heading::Hover {
        return p;
    }
    let theta = heading.degrees().to_radians();
    Position::new(
        p.lng + MOVE_DISTANCE * theta.sin(),
        p.lat + MOVE_DISTANCE * theta.cos(),
    )
}

/// Minimum distance from `p` to the segment `a`-`b`, in degrees.
pub fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
    let sx = b.lng - a.lng;
    let sy = b.lat - a.lat;
    let px = p.lng - a.lng;
    let py = p.lat - a.lat;

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq <= f64::EPSILON * f64::EPSILON {
        return px.hypot(py);
    }

    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);
    (px - t * sx).hypot(py - t * sy)
}

/// Check whether two closed segments touch or cross.
pub(crate) fn segments_intersect(a1: Position, a2: Position, b1: Position, b2: Position) -> bool {
    const EPS: f64 = 1e-18;

    fn orient(p: Position, q: Position, r: Position) -> f64 {
        (q.lng - p.lng) * (r.lat - p.lat) - (q.lat - p.lat) * (r.lng - p.lng)
    }

    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - POSITION_EPSILON;
        let max = a.max(b) + POSITION_EPSILON;
        value >= min && value <= max
    }

    fn on_segment(p: Position, q: Position, r: Position) -> bool {
        within(p.lng, q.lng, r.lng) && within(p.lat, q.lat, r.lat)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= EPS && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= EPS && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= EPS && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= EPS && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > EPS && o2 < -EPS) || (o1 < -EPS && o2 > EPS);
    let b_crosses = (o3 > EPS && o4 < -EPS) || (o3 < -EPS && o4 > EPS);
    a_crosses && b_crosses
}

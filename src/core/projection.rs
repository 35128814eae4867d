//! Orthographic projection of the sphere onto the drawing surface.
//!
//! The projection is the textbook orthographic one: the coordinate is first
//! rotated so that the current [`Rotation`] sits at the center of the view,
//! then its east/north components are scaled by `scale` and offset by
//! `translate`. Points on the far hemisphere have no image.

use crate::core::geo::{wrap_longitude, GeoCoordinate, ScreenPoint};
use serde::{Deserialize, Serialize};

/// Slack allowed when inverting a point that lies a hair outside the disc.
const DISC_EPSILON: f64 = 1e-9;

/// Globe orientation in degrees.
///
/// `lambda` spins the globe about its polar axis and `phi` tilts it towards
/// or away from the viewer; together they name the geographic point that
/// faces the viewer, `(lambda, phi)`. `lambda` is kept wrapped to
/// `[-180, 180)` by the view controller, `phi` is left unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
}

impl Rotation {
    pub fn new(lambda: f64, phi: f64) -> Self {
        Self { lambda, phi }
    }

    /// Same rotation with `lambda` wrapped into `[-180, 180)`.
    pub fn wrapped(&self) -> Self {
        Self::new(wrap_longitude(self.lambda), self.phi)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        let (lambda, phi) = crate::core::constants::DEFAULT_ROTATION;
        Self::new(lambda, phi)
    }
}

impl From<(f64, f64)> for Rotation {
    fn from((lambda, phi): (f64, f64)) -> Self {
        Self::new(lambda, phi)
    }
}

/// Current view: orientation, zoom and where the globe center lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionState {
    pub rotation: Rotation,
    /// Globe radius in pixels
    pub scale: f64,
    /// Screen position of the globe center
    pub translate: ScreenPoint,
}

impl ProjectionState {
    pub fn new(rotation: Rotation, scale: f64, translate: ScreenPoint) -> Self {
        Self {
            rotation,
            scale,
            translate,
        }
    }

    /// Projects a coordinate, or `None` if it is behind the horizon.
    pub fn project(&self, coord: GeoCoordinate) -> Option<ScreenPoint> {
        project(coord, self)
    }

    /// Inverse of [`ProjectionState::project`]; `None` outside the globe disc.
    pub fn unproject(&self, point: ScreenPoint) -> Option<GeoCoordinate> {
        unproject(point, self)
    }

    /// The geographic point currently under `translate`, i.e. facing the viewer.
    pub fn view_center(&self) -> GeoCoordinate {
        let facing = Oriented {
            depth: 1.0,
            east: 0.0,
            north: 0.0,
        };
        facing.to_geo(&self.rotation)
    }

    /// Whether a screen point falls on the globe disc.
    pub fn contains_screen_point(&self, point: ScreenPoint) -> bool {
        point.distance_to(&self.translate) <= self.scale
    }
}

impl Default for ProjectionState {
    fn default() -> Self {
        let (width, height) = crate::core::constants::DEFAULT_SURFACE_SIZE;
        Self::new(
            Rotation::default(),
            height / crate::core::constants::DEFAULT_RADIUS_RATIO,
            ScreenPoint::new(width / 2.0, height / 2.0),
        )
    }
}

/// A unit vector expressed in the view frame: `depth` points at the viewer,
/// `east` to the right of the screen and `north` up.
#[derive(Debug, Clone, Copy)]
struct Oriented {
    depth: f64,
    east: f64,
    north: f64,
}

impl Oriented {
    fn from_geo(coord: GeoCoordinate, rotation: &Rotation) -> Self {
        let (sin_phi0, cos_phi0) = rotation.phi.to_radians().sin_cos();
        let (sin_phi, cos_phi) = coord.latitude.to_radians().sin_cos();
        let (sin_dl, cos_dl) = (coord.longitude - rotation.lambda).to_radians().sin_cos();

        // Earth-fixed components, longitude measured from the facing meridian
        let toward = cos_phi * cos_dl;
        let east = cos_phi * sin_dl;
        let up = sin_phi;

        Self {
            depth: cos_phi0 * toward + sin_phi0 * up,
            east,
            north: cos_phi0 * up - sin_phi0 * toward,
        }
    }

    fn to_geo(self, rotation: &Rotation) -> GeoCoordinate {
        let (sin_phi0, cos_phi0) = rotation.phi.to_radians().sin_cos();

        let toward = cos_phi0 * self.depth - sin_phi0 * self.north;
        let up = sin_phi0 * self.depth + cos_phi0 * self.north;
        let east = self.east;

        let latitude = up.atan2(toward.hypot(east)).to_degrees();
        let longitude = wrap_longitude(rotation.lambda + east.atan2(toward).to_degrees());
        GeoCoordinate::new(longitude, latitude)
    }

    fn is_visible(&self) -> bool {
        self.depth >= 0.0
    }

    fn to_screen(self, state: &ProjectionState) -> ScreenPoint {
        ScreenPoint::new(
            state.translate.x + state.scale * self.east,
            state.translate.y - state.scale * self.north,
        )
    }
}

/// Forward orthographic projection. Returns `None` for coordinates on the
/// far hemisphere.
pub fn project(coord: GeoCoordinate, state: &ProjectionState) -> Option<ScreenPoint> {
    let oriented = Oriented::from_geo(coord, &state.rotation);
    oriented
        .is_visible()
        .then(|| oriented.to_screen(state))
}

/// Forward projection without the horizon test. Far-side points land on the
/// disc as if seen through the globe; callers must cull them first.
pub fn project_unclipped(coord: GeoCoordinate, state: &ProjectionState) -> ScreenPoint {
    Oriented::from_geo(coord, &state.rotation).to_screen(state)
}

/// Inverse orthographic projection. Returns `None` for screen points outside
/// the globe disc. The returned longitude is wrapped to `[-180, 180)`.
pub fn unproject(point: ScreenPoint, state: &ProjectionState) -> Option<GeoCoordinate> {
    if !(state.scale > 0.0) {
        return None;
    }

    let east = (point.x - state.translate.x) / state.scale;
    let north = (state.translate.y - point.y) / state.scale;
    let rho_sq = east * east + north * north;
    if rho_sq > 1.0 + DISC_EPSILON {
        return None;
    }

    let oriented = Oriented {
        depth: (1.0 - rho_sq).max(0.0).sqrt(),
        east,
        north,
    };
    Some(oriented.to_geo(&state.rotation))
}

/// A projected boundary ring, always drawn as a closed path.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPath {
    pub points: Vec<ScreenPoint>,
    /// True when part of the outline was cut at the horizon and runs along
    /// the edge of the globe disc
    pub clipped: bool,
}

/// Largest angle between two generated points on the disc edge, in radians.
const LIMB_STEP: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// Point where the great-circle arc from `a` (visible) to `b` (hidden), or
/// the reverse, meets the horizon.
fn horizon_crossing(a: &Oriented, b: &Oriented) -> Oriented {
    let t = a.depth / (a.depth - b.depth);
    let east = a.east + t * (b.east - a.east);
    let north = a.north + t * (b.north - a.north);
    let len = east.hypot(north);
    if len > 0.0 {
        Oriented {
            depth: 0.0,
            east: east / len,
            north: north / len,
        }
    } else {
        // Antipodal endpoints: any horizon point is on the arc
        Oriented {
            depth: 0.0,
            east: 1.0,
            north: 0.0,
        }
    }
}

/// Wraps an angle difference into `(-PI, PI]`.
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

/// Tracks how far a hidden stretch of a ring winds around the view axis,
/// so the cut can be closed along the disc edge in the same direction.
struct LimbWalk {
    start: f64,
    last: f64,
    sweep: f64,
}

impl LimbWalk {
    fn new(exit: &Oriented) -> Self {
        let start = exit.north.atan2(exit.east);
        Self {
            start,
            last: start,
            sweep: 0.0,
        }
    }

    fn visit(&mut self, vertex: &Oriented) {
        // Points straight behind the center have no azimuth
        if vertex.east.hypot(vertex.north) < 1e-12 {
            return;
        }
        let angle = vertex.north.atan2(vertex.east);
        self.sweep += wrap_angle(angle - self.last);
        self.last = angle;
    }

    /// Emits the disc-edge points strictly between the exit and `entry`.
    fn finish(mut self, entry: &Oriented, state: &ProjectionState, out: &mut Vec<ScreenPoint>) {
        self.visit(entry);
        let steps = (self.sweep.abs() / LIMB_STEP).ceil() as usize;
        for k in 1..steps {
            let angle = self.start + self.sweep * k as f64 / steps as f64;
            let (north, east) = angle.sin_cos();
            out.push(
                Oriented {
                    depth: 0.0,
                    east,
                    north,
                }
                .to_screen(state),
            );
        }
    }
}

/// Projects a ring of coordinates, clipping it to the visible hemisphere.
///
/// A fully visible ring is projected vertex by vertex. A ring crossing the
/// horizon is cut where its edges meet the horizon, and each hidden stretch
/// is replaced by an arc of the disc edge that winds the same way, so the
/// result is still a closed outline that can be filled. Returns `None` when
/// no vertex is visible.
pub fn project_ring(ring: &[GeoCoordinate], state: &ProjectionState) -> Option<ProjectedPath> {
    let mut oriented: Vec<Oriented> = ring
        .iter()
        .map(|coord| Oriented::from_geo(*coord, &state.rotation))
        .collect();

    if oriented.iter().all(Oriented::is_visible) {
        if oriented.len() < 2 {
            return None;
        }
        return Some(ProjectedPath {
            points: oriented.iter().map(|o| o.to_screen(state)).collect(),
            clipped: false,
        });
    }

    // Work on the open cycle of vertices
    if ring.len() > 1 && ring.first() == ring.last() {
        oriented.pop();
    }
    let len = oriented.len();
    let exit = (0..len)
        .find(|&i| oriented[i].is_visible() && !oriented[(i + 1) % len].is_visible())?;

    // Start on the first hidden stretch and end on the edge that opened it
    let first_exit = horizon_crossing(&oriented[exit], &oriented[(exit + 1) % len]);
    let mut limb = Some(LimbWalk::new(&first_exit));
    let mut points = Vec::new();

    for offset in 1..len {
        let a = &oriented[(exit + offset) % len];
        let b = &oriented[(exit + offset + 1) % len];
        match (a.is_visible(), b.is_visible()) {
            (false, false) => {
                if let Some(walk) = limb.as_mut() {
                    walk.visit(a);
                }
            }
            (false, true) => {
                let entry = horizon_crossing(a, b);
                if let Some(mut walk) = limb.take() {
                    walk.visit(a);
                    walk.finish(&entry, state, &mut points);
                }
                points.push(entry.to_screen(state));
                points.push(b.to_screen(state));
            }
            (true, true) => points.push(b.to_screen(state)),
            (true, false) => {
                let crossing = horizon_crossing(a, b);
                points.push(crossing.to_screen(state));
                limb = Some(LimbWalk::new(&crossing));
            }
        }
    }
    points.push(first_exit.to_screen(state));

    (points.len() >= 3).then_some(ProjectedPath {
        points,
        clipped: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::angular_distance;

    fn scenario_state() -> ProjectionState {
        ProjectionState::new(
            Rotation::new(0.0, -25.0),
            250.0,
            ScreenPoint::new(250.0, 250.0),
        )
    }

    fn assert_close(a: f64, b: f64, tolerance: f64) {
        assert!((a - b).abs() < tolerance, "{} != {} (±{})", a, b, tolerance);
    }

    #[test]
    fn test_facing_point_projects_to_translate() {
        let state = scenario_state();
        let point = state
            .project(GeoCoordinate::new(0.0, -25.0))
            .expect("facing point is visible");
        assert_close(point.x, 250.0, 1e-9);
        assert_close(point.y, 250.0, 1e-9);
    }

    #[test]
    fn test_far_side_has_no_projection() {
        let state = scenario_state();
        assert!(state.project(GeoCoordinate::new(180.0, -25.0)).is_none());
        assert!(state.project(GeoCoordinate::new(180.0, 25.0)).is_none());
    }

    #[test]
    fn test_north_is_up_and_east_is_right() {
        let state = equator_state();

        let north = state.project(GeoCoordinate::new(0.0, 90.0)).expect("pole on horizon");
        assert_close(north.x, 0.0, 1e-9);
        assert_close(north.y, -100.0, 1e-9);

        let east = state.project(GeoCoordinate::new(90.0, 0.0)).expect("limb is visible");
        assert_close(east.x, 100.0, 1e-9);
        assert_close(east.y, 0.0, 1e-9);
    }

    #[test]
    fn test_view_center_matches_rotation() {
        let state = scenario_state();
        let center = state.view_center();
        assert_close(center.longitude, 0.0, 1e-12);
        assert_close(center.latitude, -25.0, 1e-12);

        let unprojected = state.unproject(state.translate).expect("center is on the disc");
        assert_eq!(unprojected, center);
    }

    #[test]
    fn test_round_trip_on_visible_hemisphere() {
        let states = [
            scenario_state(),
            ProjectionState::new(
                Rotation::new(123.0, 40.0),
                180.0,
                ScreenPoint::new(400.0, 300.0),
            ),
            ProjectionState::new(
                Rotation::new(-170.0, -80.0),
                600.0,
                ScreenPoint::new(10.0, 20.0),
            ),
        ];

        for state in &states {
            for lon in (-180..180).step_by(15) {
                for lat in (-85..=85).step_by(10) {
                    let coord = GeoCoordinate::new(lon as f64, lat as f64);
                    if let Some(point) = state.project(coord) {
                        let back = state.unproject(point).expect("projected point is on the disc");
                        assert!(
                            angular_distance(coord, back) < 1e-9,
                            "{:?} -> {:?} -> {:?}",
                            coord,
                            point,
                            back
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_unproject_outside_disc() {
        let state = scenario_state();
        assert!(state.unproject(ScreenPoint::new(250.0, 0.0 - 1.0)).is_none());
        assert!(state.unproject(ScreenPoint::new(0.0, 0.0)).is_none());
        assert!(state.unproject(ScreenPoint::new(250.0, 0.0)).is_some());
    }

    #[test]
    fn test_zero_scale_never_unprojects() {
        let state = ProjectionState::new(Rotation::default(), 0.0, ScreenPoint::new(0.0, 0.0));
        assert!(state.unproject(ScreenPoint::new(0.0, 0.0)).is_none());
    }

    fn equator_state() -> ProjectionState {
        ProjectionState::new(Rotation::new(0.0, 0.0), 100.0, ScreenPoint::new(0.0, 0.0))
    }

    fn ring(coords: &[[f64; 2]]) -> Vec<GeoCoordinate> {
        coords.iter().copied().map(GeoCoordinate::from).collect()
    }

    #[test]
    fn test_fully_visible_ring_is_projected_as_is() {
        let square = ring(&[
            [-10.0, -10.0],
            [10.0, -10.0],
            [10.0, 10.0],
            [-10.0, 10.0],
            [-10.0, -10.0],
        ]);

        let path = project_ring(&square, &equator_state()).expect("square is visible");
        assert!(!path.clipped);
        assert_eq!(path.points.len(), 5);
    }

    #[test]
    fn test_hidden_ring_draws_nothing() {
        let far = ring(&[[170.0, -10.0], [-170.0, -10.0], [-170.0, 10.0], [170.0, 10.0]]);
        assert!(project_ring(&far, &equator_state()).is_none());
    }

    #[test]
    fn test_ring_crossing_horizon_is_closed_along_the_limb() {
        let state = equator_state();
        let band = ring(&[
            [60.0, -10.0],
            [120.0, -10.0],
            [120.0, 10.0],
            [60.0, 10.0],
            [60.0, -10.0],
        ]);

        let path = project_ring(&band, &state).expect("western half is visible");
        assert!(path.clipped);
        assert!(path.points.len() > 4);

        // Nothing leaves the disc, and the cut follows its edge
        for point in &path.points {
            assert!(point.distance_to(&state.translate) <= 100.0 + 1e-9);
        }
        let on_limb = path
            .points
            .iter()
            .filter(|p| (p.distance_to(&state.translate) - 100.0).abs() < 1e-9)
            .count();
        assert!(on_limb >= 3, "{:?}", path.points);

        // Both visible corners survive
        let west = 100.0 * 60.0_f64.to_radians().sin() * 10.0_f64.to_radians().cos();
        let corners = path.points.iter().filter(|p| (p.x - west).abs() < 1e-9).count();
        assert_eq!(corners, 2);

        // The limb arc stays on the eastern edge, between the two crossings
        assert!(path.points.iter().all(|p| p.x > 0.0));
    }

    #[test]
    fn test_limb_arc_follows_hidden_winding() {
        let state = equator_state();
        // Crosses the back of the globe westwards through the north, returns through the south
        let wide = ring(&[
            [80.0, 0.0],
            [100.0, 60.0],
            [180.0, 60.0],
            [-100.0, 60.0],
            [-80.0, 0.0],
            [-100.0, -60.0],
            [180.0, -60.0],
            [100.0, -60.0],
            [80.0, 0.0],
        ]);

        let path = project_ring(&wide, &state).expect("both ends are visible");
        assert!(path.clipped);
        // Each hidden stretch spans about a quarter of the disc edge
        assert!(path.points.len() > 2 * 90 / 5);
        for point in &path.points {
            assert!(point.distance_to(&state.translate) <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn test_wrap_angle() {
        use std::f64::consts::PI;
        assert_close(wrap_angle(1.5 * PI), -0.5 * PI, 1e-12);
        assert_close(wrap_angle(-1.5 * PI), 0.5 * PI, 1e-12);
        assert_eq!(wrap_angle(-PI), PI);
    }
}

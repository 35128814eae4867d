use crate::{
    core::{
        constants::HORIZON,
        geo::{angular_distance, GeoCoordinate, ScreenPoint},
        projection::{project_unclipped, ProjectionState},
    },
    data::geojson::MarkerPoint,
};

/// Whether `coord` lies on the hemisphere facing the viewer.
///
/// The horizon itself counts as visible.
pub fn on_near_side(coord: GeoCoordinate, view_center: GeoCoordinate) -> bool {
    angular_distance(coord, view_center) <= HORIZON
}

/// Lazily yields the markers on the near hemisphere with their screen
/// position, in input order. Cloning restarts from the current position.
#[derive(Debug, Clone)]
pub struct VisibleMarkers<'a> {
    markers: std::slice::Iter<'a, MarkerPoint>,
    state: ProjectionState,
    center: GeoCoordinate,
}

impl<'a> Iterator for VisibleMarkers<'a> {
    type Item = (&'a MarkerPoint, ScreenPoint);

    fn next(&mut self) -> Option<Self::Item> {
        let center = self.center;
        let state = self.state;
        self.markers
            .by_ref()
            .find(|marker| on_near_side(marker.coordinate, center))
            .map(|marker| (marker, project_unclipped(marker.coordinate, &state)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.markers.size_hint().1)
    }
}

/// Filters `markers` to those visible under `state`.
///
/// Nothing is computed until the iterator is advanced, and the markers are
/// only borrowed, so the same slice can be culled again for every frame.
pub fn visible_markers<'a>(
    markers: &'a [MarkerPoint],
    state: &ProjectionState,
) -> VisibleMarkers<'a> {
    VisibleMarkers {
        markers: markers.iter(),
        state: *state,
        center: state.view_center(),
    }
}

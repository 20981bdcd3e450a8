//! Property tests: accelerated queries agree with the linear scan.

#![allow(clippy::unwrap_used)]

use dental_spatial::{BruteForceQuery, BvhQuery, PointGrid, QueryParams, SpatialQuery};
use dental_types::{Point3, ScanMesh};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point3<f64>> {
    (-30.0..30.0f64, -30.0..30.0f64, -10.0..10.0f64).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn mesh() -> impl Strategy<Value = ScanMesh> {
    prop::collection::vec(point(), 3..40).prop_flat_map(|vertices| {
        #[allow(clippy::cast_possible_truncation)]
        let n = vertices.len() as u32;
        prop::collection::vec((0..n, 0..n, 0..n), 0..60).prop_map(move |faces| {
            let faces = faces.into_iter().map(|(a, b, c)| [a, b, c]).collect();
            ScanMesh::from_parts(vertices.clone(), faces).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn bvh_agrees_with_brute_force(
        mesh in mesh(),
        probes in prop::collection::vec(point(), 1..20),
        leaf in 1usize..6,
    ) {
        let bvh = BvhQuery::build(&mesh, QueryParams::default().with_max_leaf_size(leaf));
        let brute = BruteForceQuery::new(&mesh);
        let a = bvh.nearest_surface(&probes);
        let b = brute.nearest_surface(&probes);
        prop_assert_eq!(a.len(), probes.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert!(*x >= 0.0);
            prop_assert!((x - y).abs() < 1e-9, "{} vs {}", x, y);
        }
    }

    #[test]
    fn grid_radius_agrees_with_scan(
        points in prop::collection::vec(point(), 0..80),
        center in point(),
        radius in 0.1..40.0f64,
        cell in 0.5..20.0f64,
    ) {
        let grid = PointGrid::build(&points, cell).unwrap();
        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| (*p - center).norm() < radius)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(grid.within_radius(&center, radius), expected);
    }

    #[test]
    fn grid_nearest_agrees_with_scan(
        points in prop::collection::vec(point(), 1..80),
        query in point(),
        cell in 0.5..20.0f64,
    ) {
        let grid = PointGrid::build(&points, cell).unwrap();
        let (_, d) = grid.nearest(&query).unwrap();
        let expected = points.iter().map(|p| (p - query).norm()).fold(f64::INFINITY, f64::min);
        prop_assert!((d - expected).abs() < 1e-12);
    }
}

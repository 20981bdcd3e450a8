//! Margin-based tooth/gum vertex classification.

use dental_spatial::PointGrid;
use dental_transform::DEFAULT_VALIDATION_TOLERANCE;
use dental_types::{Case, Margin, Point3, ScanMesh, Tooth, VertexLabel};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ClassifyError, ClassifyResult};
use crate::params::ClassifyParams;
use crate::result::{Classification, LabelSummary, ToothOutcome};

/// Provisional labels one tooth proposes for some vertices.
type Claims = Vec<(u32, VertexLabel)>;

/// Label every mesh vertex as tooth, gum or unlabeled.
///
/// For each tooth with at least three margin points:
///
/// 1. the design-space margin centroid is mapped into scanner space and
///    vertices strictly within `prune_radius` of it become candidates;
/// 2. candidates are mapped into design space and kept if their planar
///    radius is strictly below `footprint_buffer` times the margin's largest
///    planar radius;
/// 3. each kept vertex is compared with the planar-nearest margin point
///    (first one on ties): strictly higher is tooth, otherwise gum.
///
/// Claims from all teeth are merged with [`VertexLabel::merge`], so the result
/// does not depend on tooth order. `teeth` should contain only teeth of the
/// mesh's jaw.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidParameter`] if `params` fail validation.
///
/// # Example
///
/// ```
/// use dental_classify::{classify_vertices, ClassifyParams};
/// use dental_types::{Point3, ScanMesh, Tooth, VertexLabel};
///
/// let margin: Vec<Point3<f64>> = (0..8)
///     .map(|k| {
///         let t = std::f64::consts::TAU * f64::from(k) / 8.0;
///         Point3::new(5.0 * t.cos(), 5.0 * t.sin(), 0.0)
///     })
///     .collect();
/// let tooth = Tooth::new(11).unwrap().with_margin(margin);
///
/// let mesh = ScanMesh::point_cloud(vec![
///     Point3::new(2.0, 0.0, 1.0),
///     Point3::new(2.0, 0.0, -1.0),
///     Point3::new(20.0, 0.0, 0.0),
/// ]);
///
/// let result = classify_vertices(&mesh, &[tooth], &ClassifyParams::default()).unwrap();
/// assert_eq!(
///     result.labels,
///     vec![VertexLabel::Tooth, VertexLabel::Gum, VertexLabel::Unlabeled]
/// );
/// ```
pub fn classify_vertices(
    mesh: &ScanMesh,
    teeth: &[Tooth],
    params: &ClassifyParams,
) -> ClassifyResult<Classification> {
    params.validate()?;

    info!(
        vertices = mesh.vertex_count(),
        teeth = teeth.len(),
        prune_radius = params.prune_radius,
        "Starting vertex classification"
    );

    let grid = PointGrid::build(mesh.vertices(), params.prune_radius)
        .map_err(|_| ClassifyError::invalid_parameter("prune_radius", params.prune_radius))?;

    let per_tooth: Vec<(ToothOutcome, Claims)> = if params.parallel {
        teeth
            .par_iter()
            .map(|tooth| tooth_claims(&grid, mesh, tooth, params))
            .collect()
    } else {
        teeth
            .iter()
            .map(|tooth| tooth_claims(&grid, mesh, tooth, params))
            .collect()
    };

    let mut labels = vec![VertexLabel::Unlabeled; mesh.vertex_count()];
    let mut outcomes = Vec::with_capacity(per_tooth.len());
    for (outcome, claims) in per_tooth {
        for (index, label) in claims {
            let slot = &mut labels[index as usize];
            *slot = slot.merge(label);
        }
        outcomes.push(outcome);
    }

    let summary = LabelSummary::of(&labels);
    info!(
        tooth = summary.tooth,
        gum = summary.gum,
        unlabeled = summary.unlabeled,
        "Vertex classification complete"
    );

    Ok(Classification {
        labels,
        outcomes,
        summary,
    })
}

/// Classify the mesh of `case` using the teeth of the mesh's jaw.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidParameter`] if `params` fail validation.
pub fn classify_case(case: &Case, params: &ClassifyParams) -> ClassifyResult<Classification> {
    let teeth: Vec<Tooth> = case.teeth_for_jaw().cloned().collect();
    debug!(case = %case.id, jaw = %case.jaw, teeth = teeth.len(), "classifying case");
    classify_vertices(&case.mesh, &teeth, params)
}

#[allow(clippy::cast_possible_truncation)] // vertex indices fit in u32
fn tooth_claims(
    grid: &PointGrid<'_>,
    mesh: &ScanMesh,
    tooth: &Tooth,
    params: &ClassifyParams,
) -> (ToothOutcome, Claims) {
    let number = tooth.number();
    let margin = tooth.margin();

    let Some(centroid) = margin.centroid().filter(|_| margin.has_geometry()) else {
        debug!(tooth = %number, points = margin.len(), "margin too short, skipping");
        return (
            ToothOutcome::Skipped {
                tooth: number,
                margin_points: margin.len(),
            },
            Vec::new(),
        );
    };

    let transform = tooth.transform();
    for warning in transform.validate(DEFAULT_VALIDATION_TOLERANCE) {
        warn!(tooth = %number, %warning, "suspicious design transform");
    }

    let scanner_centroid = match transform.to_scanner(&[centroid]) {
        Ok(points) => points[0],
        Err(error) => {
            warn!(tooth = %number, %error, "cannot invert transform, skipping tooth");
            return (
                ToothOutcome::Failed {
                    tooth: number,
                    error,
                },
                Vec::new(),
            );
        }
    };

    let nearby = grid.within_radius(&scanner_centroid, params.prune_radius);
    let nearby_points: Vec<Point3<f64>> = nearby.iter().map(|&i| mesh.vertices()[i]).collect();
    let design = transform.to_design(&nearby_points);

    let max_radius = margin.max_planar_radius() * params.footprint_buffer;
    let mut claims = Claims::new();
    let (mut tooth_claims, mut gum_claims) = (0, 0);

    for (&index, p) in nearby.iter().zip(&design) {
        if p.x.hypot(p.y) >= max_radius {
            continue;
        }
        let label = if p.z > nearest_planar(margin, p).z {
            tooth_claims += 1;
            VertexLabel::Tooth
        } else {
            gum_claims += 1;
            VertexLabel::Gum
        };
        claims.push((index as u32, label));
    }

    debug!(
        tooth = %number,
        candidates = nearby.len(),
        in_footprint = claims.len(),
        tooth_claims,
        gum_claims,
        "classified tooth footprint"
    );

    (
        ToothOutcome::Classified {
            tooth: number,
            candidates: nearby.len(),
            in_footprint: claims.len(),
            tooth_claims,
            gum_claims,
        },
        claims,
    )
}

/// Margin point with the smallest planar distance to `p`; first one on ties.
fn nearest_planar(margin: &Margin, p: &Point3<f64>) -> Point3<f64> {
    let mut best = margin.points()[0];
    let mut best_d = f64::INFINITY;
    for m in margin.points() {
        let d = (m.x - p.x).hypot(m.y - p.y);
        if d < best_d {
            best_d = d;
            best = *m;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dental_transform::DesignTransform;
    use dental_types::VertexLabel::{Gum, Tooth as ToothLabel, Unlabeled};
    use dental_types::{Jaw, ToothNumber, Vector3};

    /// Eight points on a circle of radius `r` at height `z`.
    fn ring(r: f64, z: f64) -> Vec<Point3<f64>> {
        (0..8)
            .map(|k| {
                let t = std::f64::consts::TAU * f64::from(k) / 8.0;
                Point3::new(r * t.cos(), r * t.sin(), z)
            })
            .collect()
    }

    fn tooth(n: u8, margin: Vec<Point3<f64>>) -> Tooth {
        Tooth::new(n).unwrap().with_margin(margin)
    }

    #[test]
    fn test_elevation_classification() {
        let mesh = ScanMesh::point_cloud(vec![
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, -1.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(20.0, 0.0, 0.0),
        ]);
        let result =
            classify_vertices(&mesh, &[tooth(11, ring(5.0, 0.0))], &ClassifyParams::default())
                .unwrap();
        // z equal to the margin is gum.
        assert_eq!(result.labels, vec![ToothLabel, Gum, Gum, Unlabeled]);
        assert_eq!(
            result.outcomes[0],
            ToothOutcome::Classified {
                tooth: ToothNumber::new(11).unwrap(),
                candidates: 3,
                in_footprint: 3,
                tooth_claims: 1,
                gum_claims: 2,
            }
        );
    }

    #[test]
    fn test_footprint_buffer_is_strict() {
        // Max margin radius 5, buffer 1.2 -> footprint radius 6.
        let mesh = ScanMesh::point_cloud(vec![
            Point3::new(5.9, 0.0, 1.0),
            Point3::new(6.05, 0.0, 1.0),
        ]);
        let result =
            classify_vertices(&mesh, &[tooth(11, ring(5.0, 0.0))], &ClassifyParams::default())
                .unwrap();
        assert_eq!(result.labels, vec![ToothLabel, Unlabeled]);
    }

    #[test]
    fn test_prune_radius_uses_scanner_centroid() {
        // Transform shifts design space by +30 in x: scanner centroid at (-30, 0, 0).
        let t = tooth(11, ring(5.0, 0.0))
            .with_transform(DesignTransform::from_translation(Vector3::new(30.0, 0.0, 0.0)));
        let mesh = ScanMesh::point_cloud(vec![
            Point3::new(-29.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ]);
        let result = classify_vertices(&mesh, &[t], &ClassifyParams::default()).unwrap();
        assert_eq!(result.labels, vec![ToothLabel, Unlabeled]);
    }

    #[test]
    fn test_conflict_priority_both_orders() {
        // Tooth A's margin sits at z = 2 (vertex is gum for A),
        // tooth B's at z = -2 (vertex is tooth for B).
        let a = tooth(11, ring(5.0, 2.0));
        let b = tooth(12, ring(5.0, -2.0));
        let mesh = ScanMesh::point_cloud(vec![Point3::new(1.0, 0.0, 0.0)]);

        for params in [ClassifyParams::default(), ClassifyParams::default().with_parallel(false)] {
            let ab = classify_vertices(&mesh, &[a.clone(), b.clone()], &params).unwrap();
            let ba = classify_vertices(&mesh, &[b.clone(), a.clone()], &params).unwrap();
            assert_eq!(ab.labels, vec![ToothLabel]);
            assert_eq!(ba.labels, vec![ToothLabel]);
        }
    }

    #[test]
    fn test_gum_beats_unlabeled_regardless_of_order() {
        let near = tooth(11, ring(5.0, 2.0));
        let far = tooth(12, ring(5.0, 0.0))
            .with_transform(DesignTransform::from_translation(Vector3::new(-100.0, 0.0, 0.0)));
        let mesh = ScanMesh::point_cloud(vec![Point3::new(1.0, 0.0, 0.0)]);
        let params = ClassifyParams::default();
        assert_eq!(
            classify_vertices(&mesh, &[near.clone(), far.clone()], &params).unwrap().labels,
            vec![Gum]
        );
        assert_eq!(
            classify_vertices(&mesh, &[far, near], &params).unwrap().labels,
            vec![Gum]
        );
    }

    #[test]
    fn test_degenerate_margin_contributes_nothing() {
        let mesh = ScanMesh::point_cloud(vec![Point3::new(0.5, 0.0, 1.0)]);
        let short = tooth(
            11,
            vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        );
        let result = classify_vertices(&mesh, &[short], &ClassifyParams::default()).unwrap();
        assert_eq!(result.labels, vec![Unlabeled]);
        assert_eq!(
            result.outcomes,
            vec![ToothOutcome::Skipped {
                tooth: ToothNumber::new(11).unwrap(),
                margin_points: 2
            }]
        );
    }

    #[test]
    fn test_empty_mesh_and_no_teeth() {
        let result =
            classify_vertices(&ScanMesh::new(), &[tooth(11, ring(5.0, 0.0))], &ClassifyParams::default())
                .unwrap();
        assert!(result.labels.is_empty());
        assert_eq!(result.summary.total(), 0);

        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let result = classify_vertices(&mesh, &[], &ClassifyParams::default()).unwrap();
        assert_eq!(result.labels, vec![Unlabeled]);
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_singular_transform_is_isolated() {
        let bad = tooth(11, ring(5.0, 0.0))
            .with_transform(DesignTransform::from_cells([(2, 2, 0.0)]).unwrap());
        let good = tooth(12, ring(5.0, 0.0));
        let mesh = ScanMesh::point_cloud(vec![Point3::new(1.0, 0.0, 1.0)]);
        let result = classify_vertices(&mesh, &[bad, good], &ClassifyParams::default()).unwrap();
        assert!(matches!(result.outcomes[0], ToothOutcome::Failed { .. }));
        assert!(result.outcomes[1].is_classified());
        assert_eq!(result.labels, vec![ToothLabel]);
    }

    #[test]
    fn test_nearest_planar_ignores_z_and_takes_first() {
        let margin = Margin::new(vec![
            Point3::new(1.0, 0.0, 10.0),
            Point3::new(-1.0, 0.0, -10.0),
            Point3::new(1.0, 0.0, 99.0),
        ]);
        let p = Point3::new(0.9, 0.0, -50.0);
        assert_relative_eq!(nearest_planar(&margin, &p).z, 10.0);
        // Equidistant from the first two: first wins.
        assert_relative_eq!(nearest_planar(&margin, &Point3::origin()).z, 10.0);
    }

    #[test]
    fn test_classify_case_filters_jaw() {
        let mesh = ScanMesh::point_cloud(vec![Point3::new(1.0, 0.0, 1.0)]);
        let case = Case::new("c", Jaw::Lower, mesh).with_tooth(tooth(11, ring(5.0, 0.0)));
        let result = classify_case(&case, &ClassifyParams::default()).unwrap();
        assert_eq!(result.labels, vec![Unlabeled]);
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_invalid_params() {
        let mesh = ScanMesh::new();
        let err = classify_vertices(&mesh, &[], &ClassifyParams::new().with_prune_radius(0.0));
        assert!(matches!(err, Err(ClassifyError::InvalidParameter { name: "prune_radius", .. })));
    }
}

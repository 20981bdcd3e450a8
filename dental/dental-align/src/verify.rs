//! Alignment verification: margin curves against the scan surface.

use dental_spatial::{BvhQuery, PointGrid, SpatialQuery};
use dental_transform::DEFAULT_VALIDATION_TOLERANCE;
use dental_types::{Case, Point3, ScanMesh, Tooth, ToothNumber};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{AlignError, AlignResult};
use crate::params::AlignParams;
use crate::report::{
    CaseVerification, DistanceReport, MarginProximity, NotVerifiableReason, Verification,
};

/// Verify one tooth's margin against `mesh`.
///
/// Maps the design-space margin into scanner space with the inverse of the
/// tooth transform and measures, for every margin point, the distance to the
/// closest point on the mesh surface. Neither input is modified.
///
/// # Errors
///
/// Returns [`AlignError::Transform`] if the transform cannot be inverted.
///
/// # Example
///
/// ```
/// use dental_align::{verify_alignment, AlignParams, Grade, Verification};
/// use dental_transform::DesignTransform;
/// use dental_types::{Point3, ScanMesh, Tooth, Vector3};
///
/// let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
/// let tooth = Tooth::new(11)
///     .unwrap()
///     .with_margin(vec![Point3::new(10.0, 0.0, 0.0)])
///     .with_transform(DesignTransform::from_translation(Vector3::new(10.0, 0.0, 0.0)));
///
/// let Verification::Verified(report) = verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap() else {
///     panic!("expected a report");
/// };
/// assert!(report.mean < 1e-12);
/// assert_eq!(report.grade, Grade::Excellent);
/// ```
pub fn verify_alignment(
    mesh: &ScanMesh,
    tooth: &Tooth,
    params: &AlignParams,
) -> AlignResult<Verification> {
    if tooth.margin().is_empty() {
        return Ok(not_verifiable(tooth, NotVerifiableReason::EmptyMargin));
    }
    let query = BvhQuery::build(mesh, params.query);
    verify_alignment_with(&query, mesh, tooth, params)
}

/// [`verify_alignment`] with a caller-supplied spatial index over `mesh`.
///
/// Any non-empty margin is measured. One- and two-point margins still get a
/// [`DistanceReport`], unlike the classifier, which skips margins with fewer
/// than three points.
///
/// # Errors
///
/// Returns [`AlignError::Transform`] if the transform cannot be inverted.
pub fn verify_alignment_with<Q: SpatialQuery + ?Sized>(
    query: &Q,
    mesh: &ScanMesh,
    tooth: &Tooth,
    params: &AlignParams,
) -> AlignResult<Verification> {
    if tooth.margin().is_empty() {
        debug!(tooth = %tooth.number(), "no margin points, skipping verification");
        return Ok(not_verifiable(tooth, NotVerifiableReason::EmptyMargin));
    }
    if mesh.is_empty() {
        debug!(tooth = %tooth.number(), "empty mesh, skipping verification");
        return Ok(not_verifiable(tooth, NotVerifiableReason::EmptyMesh));
    }

    log_transform_warnings(tooth);

    let scanner_margin = tooth
        .transform()
        .to_scanner(tooth.margin().points())
        .map_err(|e| AlignError::transform(tooth.number(), e))?;

    let hits = query.closest_points(&scanner_margin);
    let (distances, closest_points): (Vec<f64>, Vec<Point3<f64>>) = hits
        .iter()
        .zip(&scanner_margin)
        .map(|(hit, p)| hit.map_or((f64::INFINITY, *p), |h| (h.distance, h.point)))
        .unzip();

    let stats = Stats::of(&distances);
    let grade = params.grade(stats.mean);

    debug!(
        tooth = %tooth.number(),
        points = distances.len(),
        mean = stats.mean,
        max = stats.max,
        grade = %grade,
        "verified margin alignment"
    );

    Ok(Verification::Verified(DistanceReport {
        tooth: tooth.number(),
        distances,
        scanner_margin,
        closest_points,
        mean: stats.mean,
        max: stats.max,
        min: stats.min,
        std_dev: stats.std_dev,
        grade,
    }))
}

/// Verify every tooth in `teeth` against one mesh, building one index.
///
/// A tooth whose transform fails is recorded in
/// [`CaseVerification::failures`]; the remaining teeth are still verified.
pub fn verify_teeth<'a>(
    mesh: &ScanMesh,
    teeth: impl IntoIterator<Item = &'a Tooth>,
    params: &AlignParams,
) -> CaseVerification {
    let query = BvhQuery::build(mesh, params.query);
    let mut result = CaseVerification::default();

    for tooth in teeth {
        match verify_alignment_with(&query, mesh, tooth, params) {
            Ok(verification) => result.verifications.push(verification),
            Err(e) => {
                warn!(tooth = %tooth.number(), error = %e, "tooth verification failed");
                result.failures.push(e);
            }
        }
    }

    let (excellent, pass, fail) = result.grade_counts();
    info!(
        vertices = mesh.vertex_count(),
        teeth = result.verifications.len() + result.failures.len(),
        excellent,
        pass,
        fail,
        failures = result.failures.len(),
        "alignment verification complete"
    );
    result
}

/// Verify the teeth of `case` that belong to the mesh's jaw.
pub fn verify_case(case: &Case, params: &AlignParams) -> CaseVerification {
    debug!(case = %case.id, jaw = %case.jaw, "verifying case");
    verify_teeth(&case.mesh, case.teeth_for_jaw(), params)
}

/// Distance from every mesh vertex to the closest scanner-space margin point.
///
/// All teeth contribute their margins; a vertex is attributed to the tooth
/// owning its closest margin point. Teeth with unusable transforms are
/// skipped with a warning.
///
/// # Errors
///
/// Returns [`AlignError::InvalidCellSize`] if
/// [`AlignParams::proximity_cell_size`] is not finite and positive.
pub fn vertex_margin_distances<'a>(
    mesh: &ScanMesh,
    teeth: impl IntoIterator<Item = &'a Tooth>,
    params: &AlignParams,
) -> AlignResult<MarginProximity> {
    let mut points = Vec::new();
    let mut owners: Vec<ToothNumber> = Vec::new();

    for tooth in teeth {
        match tooth.transform().to_scanner(tooth.margin().points()) {
            Ok(scanner) => {
                owners.extend(std::iter::repeat_n(tooth.number(), scanner.len()));
                points.extend(scanner);
            }
            Err(e) => warn!(tooth = %tooth.number(), error = %e, "skipping margin"),
        }
    }

    let grid = PointGrid::build(&points, params.proximity_cell_size)
        .map_err(|_| AlignError::InvalidCellSize(params.proximity_cell_size))?;

    let nearest = |v: &Point3<f64>| {
        grid.nearest(v)
            .map_or((f64::INFINITY, None), |(i, d)| (d, Some(owners[i])))
    };
    let pairs: Vec<(f64, Option<ToothNumber>)> = if params.query.use_parallel(mesh.vertex_count())
    {
        mesh.vertices().par_iter().map(nearest).collect()
    } else {
        mesh.vertices().iter().map(nearest).collect()
    };
    let (distances, nearest_tooth) = pairs.into_iter().unzip();

    Ok(MarginProximity {
        distances,
        nearest_tooth,
    })
}

fn not_verifiable(tooth: &Tooth, reason: NotVerifiableReason) -> Verification {
    Verification::NotVerifiable {
        tooth: tooth.number(),
        reason,
    }
}

fn log_transform_warnings(tooth: &Tooth) {
    for warning in tooth.transform().validate(DEFAULT_VALIDATION_TOLERANCE) {
        warn!(tooth = %tooth.number(), %warning, "suspicious design transform");
    }
}

struct Stats {
    mean: f64,
    max: f64,
    min: f64,
    std_dev: f64,
}

impl Stats {
    #[allow(clippy::cast_precision_loss)]
    fn of(values: &[f64]) -> Self {
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            std_dev: variance.sqrt(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::report::Grade;
    use approx::assert_relative_eq;
    use dental_transform::DesignTransform;
    use dental_types::{Jaw, Vector3};

    fn translated(n: u8, margin: Vec<Point3<f64>>, t: Vector3<f64>) -> Tooth {
        Tooth::new(n)
            .unwrap()
            .with_margin(margin)
            .with_transform(DesignTransform::from_translation(t))
    }

    fn report(v: Verification) -> DistanceReport {
        match v {
            Verification::Verified(r) => r,
            other @ Verification::NotVerifiable { .. } => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_translation_only_exact() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let tooth = translated(11, vec![Point3::new(10.0, 0.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        let r = report(verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap());
        assert_relative_eq!(r.distances[0], 0.0, epsilon = 1e-12);
        assert_eq!(r.grade, Grade::Excellent);
    }

    #[test]
    fn test_translation_only_offset() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let tooth = translated(11, vec![Point3::new(12.0, 0.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        let r = report(verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap());
        assert_relative_eq!(r.distances[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(r.mean, 2.0, epsilon = 1e-12);
        assert_relative_eq!(r.std_dev, 0.0, epsilon = 1e-12);
        assert_eq!(r.grade, Grade::Fail);
        assert_relative_eq!(r.scanner_margin[0], Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(r.closest_points[0], Point3::origin());
    }

    #[test]
    fn test_statistics() {
        // Flat square at z = 0; margin points at heights 0.0, 0.02, 0.04.
        let mesh = ScanMesh::from_parts(
            vec![
                Point3::new(-5.0, -5.0, 0.0),
                Point3::new(5.0, -5.0, 0.0),
                Point3::new(5.0, 5.0, 0.0),
                Point3::new(-5.0, 5.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        let tooth = Tooth::new(21).unwrap().with_margin(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.02),
            Point3::new(0.0, 1.0, 0.04),
        ]);
        let r = report(verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap());
        assert_relative_eq!(r.mean, 0.02, epsilon = 1e-12);
        assert_relative_eq!(r.max, 0.04, epsilon = 1e-12);
        assert_relative_eq!(r.min, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.std_dev, (0.0008f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(r.grade, Grade::Pass);
    }

    #[test]
    fn test_empty_margin_and_empty_mesh() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let pontic = Tooth::new(12).unwrap();
        assert_eq!(
            verify_alignment(&mesh, &pontic, &AlignParams::default()).unwrap(),
            Verification::NotVerifiable {
                tooth: pontic.number(),
                reason: NotVerifiableReason::EmptyMargin
            }
        );

        let tooth = Tooth::new(12).unwrap().with_margin(vec![Point3::origin()]);
        let v = verify_alignment(&ScanMesh::new(), &tooth, &AlignParams::default()).unwrap();
        assert!(matches!(
            v,
            Verification::NotVerifiable {
                reason: NotVerifiableReason::EmptyMesh,
                ..
            }
        ));
    }

    #[test]
    fn test_short_margin_is_still_verified() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let tooth = Tooth::new(13)
            .unwrap()
            .with_margin(vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)]);
        let r = report(verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap());
        assert_eq!(r.point_count(), 2);
    }

    #[test]
    fn test_collapsed_face_gives_finite_distance() {
        let mesh = ScanMesh::from_parts(
            vec![Point3::origin(), Point3::new(2.0, 0.0, 0.0)],
            vec![[0, 0, 1]],
        )
        .unwrap();
        let tooth = Tooth::new(21).unwrap().with_margin(vec![Point3::new(1.0, 3.0, 0.0)]);
        let r = report(verify_alignment(&mesh, &tooth, &AlignParams::default()).unwrap());
        assert_relative_eq!(r.distances[0], 3.0);
        assert_relative_eq!(r.mean, 3.0);
        assert_eq!(r.grade, Grade::Fail);
    }

    #[test]
    fn test_singular_transform_fails_only_that_tooth() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let bad = Tooth::new(14)
            .unwrap()
            .with_margin(vec![Point3::origin()])
            .with_transform(DesignTransform::from_cells([(0, 0, 0.0)]).unwrap());
        let good = translated(15, vec![Point3::new(1.0, 0.0, 0.0)], Vector3::new(1.0, 0.0, 0.0));

        assert!(matches!(
            verify_alignment(&mesh, &bad, &AlignParams::default()),
            Err(AlignError::Transform { .. })
        ));

        let result = verify_teeth(&mesh, [&bad, &good], &AlignParams::default());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].tooth(), bad.number().into());
        assert_eq!(result.verifications.len(), 1);
        assert_eq!(result.verifications[0].tooth(), good.number());
    }

    #[test]
    fn test_verify_case_uses_mesh_jaw() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let case = Case::new("c", Jaw::Upper, mesh)
            .with_tooth(translated(11, vec![Point3::origin()], Vector3::zeros()))
            .with_tooth(translated(36, vec![Point3::origin()], Vector3::zeros()));
        let result = verify_case(&case, &AlignParams::default());
        assert_eq!(result.verifications.len(), 1);
        assert_eq!(result.verifications[0].tooth().get(), 11);
        assert!(result.all_acceptable());
    }

    #[test]
    fn test_multi_tooth_vertex_proximity() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin(), Point3::new(100.0, 0.0, 0.0)]);
        let t1 = translated(11, vec![Point3::new(10.0, 0.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        let t2 = translated(12, vec![Point3::new(150.0, 0.0, 0.0)], Vector3::new(50.0, 0.0, 0.0));

        let p = vertex_margin_distances(&mesh, [&t1, &t2], &AlignParams::default()).unwrap();
        assert_relative_eq!(p.distances[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.distances[1], 0.0, epsilon = 1e-12);
        assert_eq!(p.nearest_tooth, vec![Some(t1.number()), Some(t2.number())]);

        // Each tooth's own report is also exact.
        let result = verify_teeth(&mesh, [&t1, &t2], &AlignParams::default());
        assert!(result.reports().all(|r| r.mean < 1e-12));
    }

    #[test]
    fn test_proximity_without_margins() {
        let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
        let p = vertex_margin_distances(&mesh, std::iter::empty::<&Tooth>(), &AlignParams::default()).unwrap();
        assert_eq!(p.distances, vec![f64::INFINITY]);
        assert_eq!(p.nearest_tooth, vec![None]);

        let bad = AlignParams::default().with_proximity_cell_size(-1.0);
        assert!(vertex_margin_distances(&mesh, std::iter::empty::<&Tooth>(), &bad).is_err());
    }
}

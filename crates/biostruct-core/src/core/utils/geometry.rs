use nalgebra::{Matrix3, Point3, SymmetricEigen, Unit, Vector3};

/// Signed torsion angle `p1-p2-p3-p4` in degrees, in `(-180, 180]`.
///
/// Returns NaN when three consecutive points are collinear.
pub fn torsion_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    if n1.norm_squared() < f64::EPSILON || n2.norm_squared() < f64::EPSILON {
        return f64::NAN;
    }

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x).to_degrees()
}

pub fn calculate_hn_position(
    n_pos: &Point3<f64>,
    ca_pos: &Point3<f64>,
    prev_c_pos: &Point3<f64>,
    bond_length: f64,
) -> Point3<f64> {
    let n_ca = (ca_pos - n_pos).normalize();
    let n_c_prev = (prev_c_pos - n_pos).normalize();

    let hn_dir = -(n_ca + n_c_prev).normalize();

    n_pos + hn_dir * bond_length
}

/// Unit normal of the plane through three points, or `None` if they are collinear.
pub fn plane_normal(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<Unit<Vector3<f64>>> {
    Unit::try_new((b - a).cross(&(c - a)), f64::EPSILON)
}

/// Signed distance of `point` from the plane through `origin` with unit `normal`.
pub fn distance_to_plane(
    normal: &Unit<Vector3<f64>>,
    origin: &Point3<f64>,
    point: &Point3<f64>,
) -> f64 {
    normal.dot(&(point - origin))
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Least-squares line through `points`: their centroid and the principal
/// direction of their covariance, oriented from the first point to the last.
pub fn best_fit_line(points: &[Point3<f64>]) -> Option<(Point3<f64>, Unit<Vector3<f64>>)> {
    if points.len() < 2 {
        return None;
    }
    let center = centroid(points)?;
    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - center;
        acc + d * d.transpose()
    });
    let eigen = SymmetricEigen::new(covariance);
    let (principal, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
    let mut direction: Vector3<f64> = eigen.eigenvectors.column(principal).into_owned();

    let span = points[points.len() - 1] - points[0];
    if direction.dot(&span) < 0.0 {
        direction = -direction;
    }
    Some((center, Unit::try_new(direction, f64::EPSILON)?))
}

/// Orthogonal projection of `point` onto the line through `origin` along `direction`.
pub fn project_onto_line(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    direction: &Unit<Vector3<f64>>,
) -> Point3<f64> {
    origin + direction.into_inner() * direction.dot(&(point - origin))
}

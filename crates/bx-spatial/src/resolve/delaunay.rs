//! Planar Delaunay triangulation (Bowyer-Watson)

/// Point in the (azimuth, elevation) plane
pub type Point = [f64; 2];

/// Relative slack for the circumcircle test; cocircular points are not "inside"
const CIRCUMCIRCLE_EPS: f64 = 1e-10;

/// Barycentric slack so queries on an edge or vertex are contained
const LOCATE_EPS: f64 = 1e-9;

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    pub fn contains_vertex(&self, v: usize) -> bool {
        self.a == v || self.b == v || self.c == v
    }
}

#[derive(Clone, Copy)]
struct Working {
    tri: Triangle,
    center: Point,
    radius_sq: f64,
}

impl Working {
    fn new(points: &[Point], tri: Triangle) -> Self {
        let (center, radius_sq) = circumcircle(points[tri.a], points[tri.b], points[tri.c]);
        Self {
            tri,
            center,
            radius_sq,
        }
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let t = self.tri;
        [(t.a, t.b), (t.b, t.c), (t.c, t.a)]
    }

    fn encloses(&self, p: Point) -> bool {
        let dx = p[0] - self.center[0];
        let dy = p[1] - self.center[1];
        dx * dx + dy * dy < self.radius_sq * (1.0 - CIRCUMCIRCLE_EPS)
    }
}

/// Delaunay triangulation of distinct points
///
/// Returns triangles as indices into `points`. Fewer than three points, or
/// all points collinear, gives no triangles.
pub fn triangulate(points: &[Point]) -> Vec<Triangle> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut all_points: Vec<Point> = points.to_vec();
    all_points.extend_from_slice(&super_triangle(points));

    let mut triangles = vec![Working::new(&all_points, Triangle::new(n, n + 1, n + 2))];

    for i in 0..n {
        let point = all_points[i];

        let bad: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, tri)| tri.encloses(point))
            .map(|(ti, _)| ti)
            .collect();

        // Cavity boundary = edges used by exactly one bad triangle
        let mut polygon: Vec<(usize, usize)> = Vec::new();
        for &ti in &bad {
            for edge in triangles[ti].edges() {
                let shared = bad.iter().any(|&other| {
                    other != ti
                        && triangles[other]
                            .edges()
                            .iter()
                            .any(|&(p, q)| (p, q) == edge || (q, p) == edge)
                });
                if !shared {
                    polygon.push(edge);
                }
            }
        }

        // bad is ascending, so removing from the back keeps indices valid
        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }

        for (e1, e2) in polygon {
            triangles.push(Working::new(&all_points, Triangle::new(e1, e2, i)));
        }
    }

    triangles
        .into_iter()
        .map(|w| w.tri)
        .filter(|t| t.a < n && t.b < n && t.c < n)
        .collect()
}

/// First triangle containing the query (edges and vertices inclusive)
pub fn locate(points: &[Point], triangles: &[Triangle], query: Point) -> Option<Triangle> {
    triangles
        .iter()
        .copied()
        .find(|t| contains_point(points[t.a], points[t.b], points[t.c], query))
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn contains_point(a: Point, b: Point, c: Point, p: Point) -> bool {
    let area = cross(a, b, c);
    if area.abs() < 1e-12 {
        return false;
    }

    let l1 = cross(p, b, c) / area;
    let l2 = cross(a, p, c) / area;
    let l3 = cross(a, b, p) / area;

    l1 >= -LOCATE_EPS && l2 >= -LOCATE_EPS && l3 >= -LOCATE_EPS
}

/// Large triangle enclosing every point
fn super_triangle(points: &[Point]) -> [Point; 3] {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min = [min[0].min(p[0]), min[1].min(p[1])];
        max = [max[0].max(p[0]), max[1].max(p[1])];
    }

    let delta = (max[0] - min[0]).max(max[1] - min[1]).max(1.0);
    let mid_x = (min[0] + max[0]) / 2.0;
    let mid_y = (min[1] + max[1]) / 2.0;

    [
        [mid_x - 100.0 * delta, mid_y - 50.0 * delta],
        [mid_x, mid_y + 100.0 * delta],
        [mid_x + 100.0 * delta, mid_y - 50.0 * delta],
    ]
}

/// Circumcircle center and squared radius
fn circumcircle(a: Point, b: Point, c: Point) -> (Point, f64) {
    let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));

    if d.abs() < 1e-12 {
        // Collinear: nothing can be strictly inside
        return ([0.0, 0.0], 0.0);
    }

    let a_sq = a[0] * a[0] + a[1] * a[1];
    let b_sq = b[0] * b[0] + b[1] * b[1];
    let c_sq = c[0] * c[0] + c[1] * c[1];

    let ux = (a_sq * (b[1] - c[1]) + b_sq * (c[1] - a[1]) + c_sq * (a[1] - b[1])) / d;
    let uy = (a_sq * (c[0] - b[0]) + b_sq * (a[0] - c[0]) + c_sq * (b[0] - a[0])) / d;

    let dx = a[0] - ux;
    let dy = a[1] - uy;
    ([ux, uy], dx * dx + dy * dy)
}

/// A planar triangle in (lat, lon) degree space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [(f64, f64); 3],
}

impl Triangle {
    pub fn new(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64)) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Edge vectors from the first vertex: (v1 - v0, v2 - v0)
    pub fn edges(&self) -> ((f64, f64), (f64, f64)) {
        let [v0, v1, v2] = self.vertices;
        ((v1.0 - v0.0, v1.1 - v0.1), (v2.0 - v0.0, v2.1 - v0.1))
    }

    /// Unsigned area from the cross product of the edge vectors
    pub fn area(&self) -> f64 {
        let (a, b) = self.edges();
        0.5 * (a.0 * b.1 - a.1 * b.0).abs()
    }

    /// Point at `v0 + s * (v1 - v0) + t * (v2 - v0)`
    pub fn point_at(&self, s: f64, t: f64) -> (f64, f64) {
        let v0 = self.vertices[0];
        let (a, b) = self.edges();
        (v0.0 + s * a.0 + t * b.0, v0.1 + s * a.1 + t * b.1)
    }

    /// Barycentric (s, t) of a point relative to the edge vectors
    #[cfg(test)]
    pub(crate) fn barycentric(&self, p: (f64, f64)) -> Option<(f64, f64)> {
        let v0 = self.vertices[0];
        let (a, b) = self.edges();
        let det = a.0 * b.1 - a.1 * b.0;
        if det == 0.0 {
            return None;
        }

        let dx = p.0 - v0.0;
        let dy = p.1 - v0.1;
        let s = (dx * b.1 - dy * b.0) / det;
        let t = (a.0 * dy - a.1 * dx) / det;
        Some((s, t))
    }

    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|&(x, y)| x.is_finite() && y.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_area() {
        let tri = Triangle::new((0.0, 0.0), (2.0, 0.0), (0.0, 3.0));
        assert_eq!(tri.area(), 3.0);

        // Orientation does not matter
        let flipped = Triangle::new((0.0, 0.0), (0.0, 3.0), (2.0, 0.0));
        assert_eq!(flipped.area(), 3.0);
    }

    #[test]
    fn test_point_at_and_barycentric() {
        let tri = Triangle::new((1.0, 1.0), (3.0, 1.0), (1.0, 5.0));
        let p = tri.point_at(0.25, 0.5);
        assert_eq!(p, (1.5, 3.0));

        let (s, t) = tri.barycentric(p).unwrap();
        assert!((s - 0.25).abs() < 1e-12);
        assert!((t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_barycentric() {
        let tri = Triangle::new((0.0, 0.0), (1.0, 1.0), (2.0, 2.0));
        assert_eq!(tri.area(), 0.0);
        assert!(tri.barycentric((0.5, 0.5)).is_none());
    }
}

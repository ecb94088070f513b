#[derive(Clone, Copy, Debug, PartialEq)]
pub struct C {
    pub re: f64,
    pub im: f64,
}

impl C {
    pub fn new(re: f64, im: f64) -> Self {
        C { re, im }
    }

    pub fn real(re: f64) -> Self {
        C::new(re, 0.0)
    }

    pub fn abs_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn abs(&self) -> f64 {
        self.abs_sq().sqrt()
    }

    pub fn add(&self, other: C) -> C {
        C::new(self.re + other.re, self.im + other.im)
    }

    pub fn sub(&self, other: C) -> C {
        C::new(self.re - other.re, self.im - other.im)
    }

    pub fn mul(&self, other: C) -> C {
        C::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re
        )
    }

    pub fn scale(&self, k: f64) -> C {
        C::new(self.re * k, self.im * k)
    }

    pub fn div(&self, other: C) -> C {
        let d = other.abs_sq();
        C::new(
            (self.re * other.re + self.im * other.im) / d,
            (self.im * other.re - self.re * other.im) / d
        )
    }

    /// `base^(-self)` for a positive real base: `exp(-s ln base)`.
    pub fn real_pow_neg(&self, base: f64) -> C {
        let ln = base.ln();
        let mag = (-self.re * ln).exp();
        let angle = -self.im * ln;
        C::new(mag * angle.cos(), mag * angle.sin())
    }
}

/// `n` evenly spaced samples over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            // endpoint pinned exactly
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `n` logarithmically spaced samples over `[start, end]` (both > 0).
pub fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let mut xs: Vec<f64> = linspace(start.log10(), end.log10(), n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect();
    if let [first, .., last] = xs.as_mut_slice() {
        *first = start;
        *last = end;
    }
    xs
}

#[cfg(test)]
pub fn distance3(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Rotate a point about the Z axis, then tilt about X. Used for the default
/// oblique camera.
pub fn rotate_view(p: [f64; 3], azimuth: f64, elevation: f64) -> [f64; 3] {
    let (sa, ca) = azimuth.sin_cos();
    let x = p[0] * ca - p[1] * sa;
    let y = p[0] * sa + p[1] * ca;
    let (se, ce) = elevation.sin_cos();
    [x, y * ce - p[2] * se, y * se + p[2] * ce]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let xs = linspace(0.0, 1.0, 5);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn logspace_spans_decades() {
        let xs = logspace(1.0, 1000.0, 4);
        for (got, want) in xs.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn complex_division_inverts_multiplication() {
        let a = C::new(1.5, -2.0);
        let b = C::new(0.25, 3.0);
        let q = a.mul(b).div(b);
        assert!((q.re - a.re).abs() < 1e-12);
        assert!((q.im - a.im).abs() < 1e-12);
    }

    #[test]
    fn real_pow_neg_matches_real_power() {
        let s = C::real(2.0);
        let v = s.real_pow_neg(3.0);
        assert!((v.re - 1.0 / 9.0).abs() < 1e-12);
        assert!(v.im.abs() < 1e-12);
    }

    #[test]
    fn rotate_view_preserves_length() {
        let p = [1.0, -2.0, 0.5];
        let q = rotate_view(p, 0.7, -0.4);
        assert!((distance3(p, [0.0; 3]) - distance3(q, [0.0; 3])).abs() < 1e-12);
    }
}

//! Direction projection and angular-separation helpers.
//!
//! Every reconstructed object the pipeline touches exposes an (η, φ)
//! direction. Keeping the projection behind a trait lets the
//! deduplication routine in `dimu-select` work over any object type
//! without caring about the rest of its four-momentum.

use std::f64::consts::PI;

/// Direction projection: pseudorapidity and azimuthal angle.
pub trait Direction {
    /// Pseudorapidity η.
    fn eta(&self) -> f64;

    /// Azimuthal angle φ, in radians.
    fn phi(&self) -> f64;
}

/// Difference of two azimuthal angles, wrapped into [−π, π].
pub fn delta_phi(phi_a: f64, phi_b: f64) -> f64 {
    let mut dphi = phi_a - phi_b;
    while dphi > PI {
        dphi -= 2.0 * PI;
    }
    while dphi < -PI {
        dphi += 2.0 * PI;
    }
    dphi
}

/// Angular separation ΔR = sqrt(Δη² + Δφ²) between two directions.
pub fn delta_r<A: Direction + ?Sized, B: Direction + ?Sized>(a: &A, b: &B) -> f64 {
    let deta = a.eta() - b.eta();
    let dphi = delta_phi(a.phi(), b.phi());
    (deta * deta + dphi * dphi).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Dir(f64, f64);

    impl Direction for Dir {
        fn eta(&self) -> f64 {
            self.0
        }
        fn phi(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_delta_phi_wraps() {
        assert_relative_eq!(delta_phi(0.1, -0.1), 0.2, epsilon = 1e-12);
        // 3.0 and -3.0 are close through the branch cut, not through zero
        assert_relative_eq!(delta_phi(3.0, -3.0), 6.0 - 2.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(delta_phi(-3.0, 3.0), 2.0 * PI - 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_r() {
        let a = Dir(0.0, 0.0);
        let b = Dir(3.0, 4.0 - 2.0 * PI);
        // Δφ wraps back to 4.0 − 2π ≈ −2.283, so ΔR uses the wrapped value
        let expected = (9.0 + (4.0 - 2.0 * PI) * (4.0 - 2.0 * PI)).sqrt();
        assert_relative_eq!(delta_r(&a, &b), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_r_identical_directions() {
        let a = Dir(1.5, -2.0);
        assert_relative_eq!(delta_r(&a, &a), 0.0, epsilon = 1e-12);
    }
}

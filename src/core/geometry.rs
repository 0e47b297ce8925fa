//! Geometry primitives for hardpoint survey data
//!
//! Hardpoints are plain 3D points in the survey frame:
//! - X: fore/aft
//! - Y: lateral (left negative, right positive)
//! - Z: vertical

use nalgebra::Vector3;

/// A surveyed hardpoint or derived mount position
pub type Point3 = Vector3<f64>;

/// Euclidean distance between two points
///
/// ```text
/// d = sqrt((a.x - b.x)² + (a.y - b.y)² + (a.z - b.z)²)
/// ```
///
/// Any NaN component yields NaN; callers filter incomplete records downstream.
pub fn distance3(a: &Point3, b: &Point3) -> f64 {
    (a - b).norm()
}

/// Elementwise midpoint of two points
pub fn midpoint3(a: &Point3, b: &Point3) -> Point3 {
    (a + b) / 2.0
}

/// Median of the non-NaN values in `values`
///
/// NaN entries are skipped. Even-length inputs average the two middle values.
/// Returns `None` when no non-NaN value remains.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut present: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return None;
    }

    present.sort_by(|a, b| a.total_cmp(b));
    let mid = present.len() / 2;
    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_axis_aligned() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((distance3(&a, &b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point3::new(1.5, -2.0, 7.25);
        let b = Point3::new(-4.0, 3.5, 0.5);
        assert!((distance3(&a, &b) - distance3(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_distance_zero_for_coincident_points() {
        let a = Point3::new(10.0, 20.0, 30.0);
        assert_eq!(distance3(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_propagates_nan() {
        let a = Point3::new(f64::NAN, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        assert!(distance3(&a, &b).is_nan());
    }

    #[test]
    fn test_midpoint() {
        let a = Point3::new(0.0, 2.0, -4.0);
        let b = Point3::new(10.0, 4.0, 4.0);
        assert_eq!(midpoint3(&a, &b), Point3::new(5.0, 3.0, 0.0));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_median_skips_nan() {
        assert_eq!(median([f64::NAN, 5.0, 1.0, f64::NAN, 3.0]), Some(3.0));
        assert_eq!(median([f64::NAN]), None);
        assert_eq!(median(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_median_keeps_infinite_values() {
        assert_eq!(median([f64::INFINITY, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([f64::NEG_INFINITY, f64::NAN]), Some(f64::NEG_INFINITY));
    }
}

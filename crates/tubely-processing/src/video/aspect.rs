//! Aspect-ratio classification.

use tubely_core::models::AspectRatio;

/// Tolerance for treating a near-16:9 (or near-9:16) frame as that class.
///
/// Catches encodes like 1366x768 or 854x480 whose reduced ratio is not exactly 16:9.
const FUZZY_TOLERANCE: f64 = 0.01;

const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Bucket a frame size into landscape, portrait or other.
///
/// An exact 16:9 or 9:16 ratio after reducing by the GCD always wins; otherwise the
/// numeric ratio is compared against both targets. Zero dimensions are `Other`.
pub fn classify(width: u32, height: u32) -> AspectRatio {
    if width == 0 || height == 0 {
        return AspectRatio::Other;
    }

    let divisor = gcd(width, height);
    match (width / divisor, height / divisor) {
        (16, 9) => return AspectRatio::Landscape,
        (9, 16) => return AspectRatio::Portrait,
        _ => {}
    }

    let ratio = f64::from(width) / f64::from(height);
    if (ratio - LANDSCAPE).abs() < FUZZY_TOLERANCE {
        AspectRatio::Landscape
    } else if (ratio - PORTRAIT).abs() < FUZZY_TOLERANCE {
        AspectRatio::Portrait
    } else {
        AspectRatio::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_ratios() {
        assert_eq!(classify(1920, 1080), AspectRatio::Landscape);
        assert_eq!(classify(1280, 720), AspectRatio::Landscape);
        assert_eq!(classify(1080, 1920), AspectRatio::Portrait);
        assert_eq!(classify(16, 9), AspectRatio::Landscape);
    }

    #[test]
    fn test_near_ratios_are_fuzzy_matched() {
        // 1366/768 = 1.7786, 854/480 = 1.7792
        assert_eq!(classify(1366, 768), AspectRatio::Landscape);
        assert_eq!(classify(854, 480), AspectRatio::Landscape);
        // 480/854 = 0.5621
        assert_eq!(classify(480, 854), AspectRatio::Portrait);
    }

    #[test]
    fn test_everything_else_is_other() {
        assert_eq!(classify(640, 480), AspectRatio::Other);
        assert_eq!(classify(1080, 1080), AspectRatio::Other);
        assert_eq!(classify(2560, 1080), AspectRatio::Other);
        assert_eq!(classify(0, 1080), AspectRatio::Other);
    }

    #[test]
    fn test_exactly_one_class_for_any_size() {
        for width in (1..4000).step_by(37) {
            for height in (1..4000).step_by(41) {
                let class = classify(width, height);
                let ratio = f64::from(width) / f64::from(height);
                match class {
                    AspectRatio::Landscape => assert!((ratio - LANDSCAPE).abs() < FUZZY_TOLERANCE),
                    AspectRatio::Portrait => assert!((ratio - PORTRAIT).abs() < FUZZY_TOLERANCE),
                    AspectRatio::Other => {
                        assert!((ratio - LANDSCAPE).abs() >= FUZZY_TOLERANCE);
                        assert!((ratio - PORTRAIT).abs() >= FUZZY_TOLERANCE);
                    }
                }
            }
        }
    }
}

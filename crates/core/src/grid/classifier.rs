//! Surface classification of false-color vegetation-index samples
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. all channels zero → unknown
//! 2. water: blue dominates both other channels by more than 50 and exceeds 150
//! 3. forest: green dominates both other channels by more than 30 and exceeds 120
//! 4. sand: bright red and green (> 180, > 160), weak blue (< 100), red/green within 60
//! 5. soil: red dominates both other channels by more than 50 and exceeds 150
//! 6. farmland: green and blue above 120, red at least 30 below both
//! 7. anything else → unknown

use crate::core_types::SurfaceType;

/// Classify one RGB sample. Pure and total.
pub fn classify(r: u8, g: u8, b: u8) -> SurfaceType {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

    if r + g + b == 0 {
        return SurfaceType::Unknown;
    }
    if b > r + 50 && b > g + 50 && b > 150 {
        return SurfaceType::Water;
    }
    if g > r + 30 && g > b + 30 && g > 120 {
        return SurfaceType::Forest;
    }
    if r > 180 && g > 160 && b < 100 && (r - g).abs() < 60 {
        return SurfaceType::Sand;
    }
    if r > g + 50 && r > b + 50 && r > 150 {
        return SurfaceType::Soil;
    }
    if g > 120 && b > 120 && r < g - 30 && r < b - 30 {
        return SurfaceType::Farmland;
    }
    SurfaceType::Unknown
}

/// Classify an `[r, g, b]` triple
#[inline]
pub fn classify_rgb([r, g, b]: [u8; 3]) -> SurfaceType {
    classify(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_is_unknown() {
        assert_eq!(classify(0, 0, 0), SurfaceType::Unknown);
    }

    #[test]
    fn test_reference_colours() {
        assert_eq!(classify(20, 40, 200), SurfaceType::Water);
        assert_eq!(classify(30, 160, 40), SurfaceType::Forest);
        assert_eq!(classify(220, 200, 60), SurfaceType::Sand);
        assert_eq!(classify(200, 90, 60), SurfaceType::Soil);
        assert_eq!(classify(60, 160, 170), SurfaceType::Farmland);
        assert_eq!(classify(128, 128, 128), SurfaceType::Unknown);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // b == r + 50 is not enough for water
        assert_eq!(classify(100, 0, 150), SurfaceType::Unknown);
        assert_eq!(classify(100, 0, 151), SurfaceType::Water);
        // g must exceed 120 for forest
        assert_eq!(classify(0, 120, 0), SurfaceType::Unknown);
        assert_eq!(classify(0, 121, 0), SurfaceType::Forest);
        // r must exceed 150 for soil
        assert_eq!(classify(150, 0, 0), SurfaceType::Unknown);
        assert_eq!(classify(151, 0, 0), SurfaceType::Soil);
    }

    #[test]
    fn test_rule_order_farmland_vs_water() {
        // Satisfies both water (b > g + 50) and farmland; water is checked first
        assert_eq!(classify(10, 130, 200), SurfaceType::Water);
        // Without the blue margin it falls through to farmland
        assert_eq!(classify(10, 170, 200), SurfaceType::Farmland);
    }

    #[test]
    fn test_rule_order_sand_vs_soil() {
        // r - g of 55 satisfies both sand and soil; sand is checked first
        assert_eq!(classify(240, 185, 20), SurfaceType::Sand);
        // r - g of 85 breaks sand's |r-g| < 60, soil matches
        assert_eq!(classify(255, 170, 40), SurfaceType::Soil);
        // green too low for sand
        assert_eq!(classify(250, 120, 40), SurfaceType::Soil);
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        let mut seen = std::collections::HashSet::new();
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(5) {
                for b in (0..=255u8).step_by(5) {
                    let first = classify(r, g, b);
                    assert_eq!(first, classify(r, g, b));
                    assert!(SurfaceType::ALL.contains(&first));
                    seen.insert(first);
                }
            }
        }
        assert_eq!(seen.len(), SurfaceType::ALL.len());
    }

    #[test]
    fn test_classify_rgb_matches_classify() {
        assert_eq!(classify_rgb([20, 40, 200]), classify(20, 40, 200));
    }
}

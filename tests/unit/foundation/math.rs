use super::*;

#[test]
fn saturate_rounds_and_clamps() {
    assert_eq!(saturate_u8(-3.0), 0);
    assert_eq!(saturate_u8(254.6), 255);
    assert_eq!(saturate_u8(300.0), 255);
    assert_eq!(saturate_u8(10.4), 10);
    assert_eq!(saturate_u8(f32::NAN), 0);
}

#[test]
fn reflect101_mirrors_without_repeating_edge() {
    let len = 5;
    assert_eq!(reflect101(-1, len), 1);
    assert_eq!(reflect101(-2, len), 2);
    assert_eq!(reflect101(0, len), 0);
    assert_eq!(reflect101(4, len), 4);
    assert_eq!(reflect101(5, len), 3);
    assert_eq!(reflect101(6, len), 2);
    assert_eq!(reflect101(3, 1), 0);
}

#[test]
fn add_weighted_matches_linear_blend() {
    assert_eq!(add_weighted_u8(100, 0.9, 20, 0.1), 92);
    assert_eq!(add_weighted_u8(200, 1.5, 100, -0.5), 250);
    assert_eq!(add_weighted_u8(250, 1.5, 100, -0.5), 255);
    assert_eq!(add_weighted_u8(10, 1.5, 100, -0.5), 0);
}

use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Raster {
    Raster::filled(w, h, px).unwrap()
}

#[test]
fn shade_adds_weighted_gradient_and_keeps_alpha() {
    let src = solid(2, 2, [10, 100, 200, 77]);
    let grad = solid(2, 2, [100, 100, 100, 0]);
    let out = shade(&src, &grad, 0.5).unwrap();
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(out.pixel(x, y), Some([60, 150, 250, 77]));
        }
    }
}

#[test]
fn shade_saturates_at_255() {
    let src = solid(1, 1, [200, 250, 0, 255]);
    let grad = solid(1, 1, [255, 255, 255, 255]);
    let out = shade(&src, &grad, DEFAULT_GRADIENT_WEIGHT).unwrap();
    // 0.55 * 255 = 140.25
    assert_eq!(out.pixel(0, 0), Some([255, 255, 140, 255]));
}

#[test]
fn zero_weight_is_identity() {
    let src = Raster::from_rgba8(2, 1, vec![1, 2, 3, 4, 250, 251, 252, 253]).unwrap();
    let grad = solid(2, 1, [255, 255, 255, 255]);
    assert_eq!(shade(&src, &grad, 0.0).unwrap(), src);
}

#[test]
fn negative_bias_darkens_and_clamps_at_zero() {
    let src = solid(1, 1, [10, 100, 255, 9]);
    let grad = solid(1, 1, [0, 0, 0, 0]);
    let w = ShadeWeights {
        source: 1.0,
        gradient: 0.0,
        bias: -50.0,
    };
    assert_eq!(shade_weighted(&src, &grad, w).unwrap().pixel(0, 0), Some([0, 50, 205, 9]));
}

#[test]
fn shade_matches_channelwise_formula_on_a_gradient() {
    let src = solid(3, 8, [30, 60, 90, 128]);
    let grad = crate::effects::gradient::vertical_gradient(
        3,
        8,
        crate::foundation::core::Rgb8::WHITE,
        crate::foundation::core::Rgb8::BLACK,
    )
    .unwrap();
    let w = 0.55f32;
    let out = shade(&src, &grad, w).unwrap();
    for y in 0..8 {
        let g = grad.pixel(0, y).unwrap();
        let s = src.pixel(0, y).unwrap();
        let o = out.pixel(2, y).unwrap();
        for c in 0..3 {
            let expected = (f32::from(s[c]) + w * f32::from(g[c]))
                .round_ties_even()
                .clamp(0.0, 255.0) as u8;
            assert_eq!(o[c], expected);
        }
        assert_eq!(o[3], 128);
    }
}

#[test]
fn exact_halves_round_to_even() {
    let src = Raster::from_rgba8(3, 1, vec![0, 0, 0, 255, 0, 1, 0, 255, 0, 0, 0, 255]).unwrap();
    let grad = Raster::from_rgba8(3, 1, vec![30, 70, 110, 255, 10, 5, 0, 255, 0, 0, 0, 255])
        .unwrap();
    let out = shade(&src, &grad, DEFAULT_GRADIENT_WEIGHT).unwrap();
    // 16.5 -> 16, 38.5 -> 38, 60.5 -> 60
    assert_eq!(out.pixel(0, 0), Some([16, 38, 60, 255]));
    // 5.5 -> 6, 1 + 2.75 = 3.75 -> 4
    assert_eq!(out.pixel(1, 0), Some([6, 4, 0, 255]));
}

#[test]
fn dimension_mismatch_and_non_finite_weights_fail() {
    let src = solid(2, 2, [0; 4]);
    assert!(shade(&src, &solid(2, 3, [0; 4]), 0.5).is_err());
    assert!(shade(&src, &solid(2, 2, [0; 4]), f32::INFINITY).is_err());
}

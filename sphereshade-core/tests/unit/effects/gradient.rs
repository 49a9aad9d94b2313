use super::*;

fn column(img: &Raster, c: usize) -> Vec<u8> {
    (0..img.height())
        .map(|y| img.pixel(0, y).unwrap()[c])
        .collect()
}

#[test]
fn black_to_white_over_four_rows_truncates() {
    let img = vertical_gradient(2, 4, Rgb8::BLACK, Rgb8::WHITE).unwrap();
    assert_eq!(img.dimensions(), (2, 4));
    for c in 0..3 {
        assert_eq!(column(&img, c), vec![0, 63, 127, 191]);
    }
}

#[test]
fn white_to_black_descends_without_reaching_end() {
    let img = vertical_gradient(1, 4, Rgb8::WHITE, Rgb8::BLACK).unwrap();
    assert_eq!(column(&img, 0), vec![255, 191, 127, 63]);
}

#[test]
fn rows_are_constant_and_opaque() {
    let img = vertical_gradient(7, 5, Rgb8::new(10, 200, 30), Rgb8::new(250, 0, 90)).unwrap();
    for y in 0..img.height() {
        let first = img.pixel(0, y).unwrap();
        assert_eq!(first[3], 255);
        for x in 1..img.width() {
            assert_eq!(img.pixel(x, y).unwrap(), first);
        }
    }
}

#[test]
fn first_row_is_start_and_last_row_within_one_step_of_end() {
    let (start, end) = (Rgb8::new(10, 200, 30), Rgb8::new(250, 0, 90));
    let h = 9u32;
    let img = vertical_gradient(3, h, start, end).unwrap();

    let first = img.pixel(0, 0).unwrap();
    assert_eq!(&first[..3], &start.channels());

    let last = img.pixel(0, h - 1).unwrap();
    for c in 0..3 {
        let step = (f64::from(end.channels()[c]) - f64::from(start.channels()[c])).abs()
            / f64::from(h);
        let gap = (f64::from(last[c]) - f64::from(end.channels()[c])).abs();
        assert!(gap <= step + 1.0, "channel {c}: gap {gap} > step {step}");
    }
}

#[test]
fn channels_are_monotonic_in_the_direction_of_end() {
    let img = vertical_gradient(1, 37, Rgb8::new(0, 255, 100), Rgb8::new(255, 0, 100)).unwrap();
    let r = column(&img, 0);
    let g = column(&img, 1);
    let b = column(&img, 2);
    assert!(r.windows(2).all(|w| w[0] <= w[1]));
    assert!(g.windows(2).all(|w| w[0] >= w[1]));
    assert!(b.iter().all(|&v| v == 100));
}

#[test]
fn single_row_is_start_color() {
    let img = vertical_gradient(3, 1, Rgb8::new(1, 2, 3), Rgb8::WHITE).unwrap();
    assert_eq!(img.pixel(2, 0), Some([1, 2, 3, 255]));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(vertical_gradient(0, 4, Rgb8::BLACK, Rgb8::WHITE).is_err());
    assert!(vertical_gradient(4, 0, Rgb8::BLACK, Rgb8::WHITE).is_err());
}

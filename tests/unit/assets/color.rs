use super::*;

#[test]
fn parses_hex_with_and_without_hash() {
    assert_eq!(Rgb8::parse_hex("#ff0000").unwrap(), Rgb8::new(255, 0, 0));
    assert_eq!(Rgb8::parse_hex("1C1C1C").unwrap(), Rgb8::new(28, 28, 28));
    assert_eq!(Rgb8::parse_hex("#FfD700").unwrap(), Rgb8::new(255, 215, 0));
}

#[test]
fn rejects_short_and_garbage_forms() {
    assert!(Rgb8::parse_hex("#fff").is_err());
    assert!(Rgb8::parse_hex("#gg0000").is_err());
    assert!(Rgb8::parse_hex("red").is_err());
    assert!(Rgb8::parse_hex("#ééé").is_err());
}

#[test]
fn lenient_parse_falls_back_to_black() {
    assert_eq!(Rgb8::from_hex_or_black("not a color"), Rgb8::BLACK);
    assert_eq!(Rgb8::from_hex_or_black("#020617"), Rgb8::new(2, 6, 23));
}

#[test]
fn alpha_is_clamped_and_rendered_as_css() {
    let c = Rgb8::new(1, 2, 3).with_alpha(1.5);
    assert_eq!(c.alpha, 1.0);
    assert_eq!(c.to_string(), "rgba(1, 2, 3, 1)");
    assert_eq!(Rgb8::BLACK.with_alpha(-0.3).alpha, 0.0);
    assert_eq!(clamp_unit(f64::NAN), 0.0);
}

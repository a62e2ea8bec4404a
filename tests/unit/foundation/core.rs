use super::*;

#[test]
fn origin_new_clamps_each_axis() {
    assert_eq!(Origin::new(-2.0, 0.25), Origin { x: -0.5, y: 0.25 });
    assert_eq!(Origin::default(), Origin::TOP_LEFT);
}

#[test]
fn premultiply_rounds_to_nearest() {
    let c = Rgba8::new(255, 128, 0, 128).premultiplied();
    assert_eq!(c, Rgba8Premul { r: 128, g: 64, b: 0, a: 128 });
    assert_eq!(Rgba8::new(9, 9, 9, 0).premultiplied(), Rgba8Premul::transparent());
}

#[test]
fn css_and_number_formatting_trim_noise() {
    assert_eq!(Rgba8::new(1, 2, 3, 255).to_css(), "rgba(1,2,3,1)");
    assert_eq!(fmt_num(0.1 + 0.2), "0.3");
    assert_eq!(fmt_num(-0.0000001), "0");
    assert_eq!(fmt_num(12.5), "12.5");
}

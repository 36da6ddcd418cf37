use super::*;

#[test]
fn renders_solid_background_opaque() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4" viewBox="0 0 8 4">
<rect x="0" y="0" width="8" height="4" fill="#12141c"/>
<circle cx="6" cy="2" r="1.5" fill="#22c55e"/>
</svg>"##;
    let frame = SvgRasterizer::without_fonts().render(svg).unwrap();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert_eq!(frame.pixel(0, 0), Some([0x12, 0x14, 0x1c, 255]));
    assert_eq!(frame.pixel(6, 2).map(|p| p[3]), Some(255));
    assert_eq!(frame.pixel(8, 0), None);
}

#[test]
fn invalid_svg_is_an_error() {
    assert!(SvgRasterizer::without_fonts().render("<svg").is_err());
}

#[test]
fn frame_encodes_to_png() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 255],
    };
    let png = frame.to_png().unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

use super::*;
use crate::foundation::core::Point;
use crate::sampler::surface::FOREGROUND;

fn surface() -> DrawingSurface {
    DrawingSurface::new(Canvas::new(28, 28).unwrap())
}

#[test]
fn encode_produces_png_data_url() {
    let p = Payload::encode(&surface()).unwrap();
    assert!(p.as_str().starts_with(DATA_URL_PREFIX));
    let bytes = p.png_bytes().unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(p.source_revision(), Some(0));
}

#[test]
fn encode_is_deterministic() {
    let mut a = surface();
    let mut b = surface();
    for s in [&mut a, &mut b] {
        s.stamp_disc(Point::new(4.0, 9.5), 1.5, FOREGROUND);
        s.stamp_disc(Point::new(20.25, 3.0), 1.5, FOREGROUND);
    }
    assert_eq!(Payload::encode(&a).unwrap(), Payload::encode(&b).unwrap());
}

#[test]
fn decode_surface_restores_quantized_cells() {
    let mut s = surface();
    s.stamp_disc(Point::new(12.0, 12.0), 1.5, FOREGROUND);
    let p = Payload::encode(&s).unwrap();
    let back = p.decode_surface().unwrap();
    assert_eq!(back.size(), s.size());
    assert_eq!(back.to_gray8(), s.to_gray8());
}

#[test]
fn from_data_url_rejects_foreign_schemes() {
    assert!(Payload::from_data_url("data:image/jpeg;base64,AAAA").is_err());
    assert!(Payload::from_data_url("data:image/png;base64,@@@").is_err());
    let ok = Payload::encode(&surface()).unwrap();
    let again = Payload::from_data_url(ok.as_str()).unwrap();
    assert_eq!(again, ok);
    assert_eq!(again.source_revision(), None);
}

#[test]
fn from_png_bytes_matches_encoded_payload() {
    let p = Payload::encode(&surface()).unwrap();
    let bytes = p.png_bytes().unwrap();
    assert_eq!(Payload::from_png_bytes(&bytes).unwrap(), p);
    assert!(Payload::from_png_bytes(b"not a png").is_err());
}

#[test]
fn preview_is_nearest_neighbor() {
    let mut s = surface();
    s.stamp_disc(Point::new(0.5, 0.5), 0.5, FOREGROUND);
    let cell = s.to_gray8()[0];
    let preview = render_preview(&s, Canvas::new(280, 280).unwrap()).unwrap();
    assert_eq!(preview.dimensions(), (280, 280));
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(preview.get_pixel(x, y).0, [cell, cell, cell, 255]);
        }
    }
    assert_eq!(preview.get_pixel(15, 15).0, [0, 0, 0, 255]);
}

use super::*;

fn surface() -> DrawingSurface {
    DrawingSurface::new(Canvas::new(28, 28).unwrap())
}

#[test]
fn new_surface_is_background() {
    let s = surface();
    assert!(s.is_blank());
    assert_eq!(s.cells().len(), 784);
    assert_eq!(s.revision(), 0);
}

#[test]
fn stamp_covers_center_cell_fully() {
    let mut s = surface();
    assert!(s.stamp_disc(Point::new(10.5, 10.5), 1.5, FOREGROUND));
    assert_eq!(s.get(10, 10), Some(FOREGROUND));
    // Cells outside the bounding box of the disc stay untouched.
    assert_eq!(s.get(13, 10), Some(BACKGROUND));
    assert_eq!(s.get(10, 7), Some(BACKGROUND));
    // Diagonal neighbours are only partially covered.
    let corner = s.get(9, 9).unwrap();
    assert!(corner > 0.0 && corner < 1.0);
}

#[test]
fn overlapping_stamps_keep_maximum() {
    let mut s = surface();
    s.stamp_disc(Point::new(5.5, 5.5), 1.5, FOREGROUND);
    let before = s.cells().to_vec();
    let rev = s.revision();
    assert!(!s.stamp_disc(Point::new(5.5, 5.5), 1.5, 0.5));
    assert_eq!(s.cells(), &before[..]);
    assert_eq!(s.revision(), rev);
}

#[test]
fn stamps_are_clipped_at_edges() {
    let mut s = surface();
    assert!(s.stamp_disc(Point::new(0.0, 0.0), 1.5, FOREGROUND));
    assert!(s.get(0, 0).unwrap() > 0.0);
    assert!(!s.stamp_disc(Point::new(-10.0, -10.0), 1.5, FOREGROUND));
}

#[test]
fn invalid_stamps_are_ignored() {
    let mut s = surface();
    assert!(!s.stamp_disc(Point::new(3.0, 3.0), 0.0, FOREGROUND));
    assert!(!s.stamp_disc(Point::new(f64::NAN, 3.0), 1.5, FOREGROUND));
    assert!(s.is_blank());
}

#[test]
fn clear_restores_background_and_bumps_revision() {
    let mut s = surface();
    s.stamp_disc(Point::new(14.0, 14.0), 1.5, FOREGROUND);
    let rev = s.revision();
    s.clear();
    assert!(s.is_blank());
    assert!(s.revision() > rev);
    assert_eq!(s.cells(), surface().cells());
}

#[test]
fn gray8_roundtrip_preserves_quantized_values() {
    let mut s = surface();
    s.stamp_disc(Point::new(7.2, 19.9), 1.5, FOREGROUND);
    let gray = s.to_gray8();
    let back = DrawingSurface::from_gray8(s.size(), &gray).unwrap();
    assert_eq!(back.to_gray8(), gray);
    assert!(DrawingSurface::from_gray8(s.size(), &gray[1..]).is_err());
}

#[test]
fn rgba8_is_opaque_gray() {
    let mut s = surface();
    s.stamp_disc(Point::new(1.5, 1.5), 1.5, FOREGROUND);
    let rgba = s.to_rgba8();
    assert_eq!(rgba.len(), 784 * 4);
    for px in rgba.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
    let center = (28 + 1) * 4;
    assert_eq!(&rgba[center..center + 4], &[255, 255, 255, 255]);
}

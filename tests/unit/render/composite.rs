use super::*;
use crate::render::target::{PixelFormat, RenderTarget, TargetDesc};

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn letterbox_centers_smaller_target() {
    let vp = letterbox_viewport((800, 450), (1920, 1080));
    assert_eq!(
        vp,
        Viewport {
            x: 560,
            y: 315,
            width: 800,
            height: 450
        }
    );
}

#[test]
fn oversized_target_gets_negative_origin() {
    let vp = letterbox_viewport((2000, 1080), (1920, 1080));
    assert_eq!(vp.x, -40);
    assert_eq!(vp.y, 0);
}

#[test]
fn composite_leaves_bars_at_clear_color() {
    let mut t = RenderTarget::new(TargetDesc::new(2, 2, PixelFormat::Rgba8Unorm)).unwrap();
    t.write().fill([1.0, 1.0, 1.0, 1.0]);
    let mut out = FrameRGBA::new(canvas(4, 2), Rgba8Premul::opaque_black());

    let vp = composite_letterboxed(t.read(), &mut out);
    assert_eq!((vp.x, vp.y), (1, 0));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(2, 1), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(3, 1), Some([0, 0, 0, 255]));
}

#[test]
fn composite_crops_oversized_source() {
    let mut t = RenderTarget::new(TargetDesc::new(4, 1, PixelFormat::Rgba32Float)).unwrap();
    for x in 0..4 {
        t.write().put(x, 0, [x as f32 / 3.0, 0.0, 0.0, 1.0]);
    }
    let mut out = FrameRGBA::new(canvas(2, 1), Rgba8Premul::transparent());
    let vp = composite_letterboxed(t.read(), &mut out);
    assert_eq!(vp.x, -1);
    assert_eq!(out.pixel(0, 0), Some([85, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([170, 0, 0, 255]));
}

#[test]
fn blit_frame_into_target_centers() {
    let src = FrameRGBA::new(canvas(2, 2), Rgba8Premul::opaque_black());
    let mut t = RenderTarget::new(TargetDesc::new(4, 4, PixelFormat::Rgba32Float)).unwrap();
    let vp = blit_frame_into(&src, &mut t.write());
    assert_eq!((vp.x, vp.y), (1, 1));
    assert_eq!(t.read().fetch(1, 1), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(t.read().fetch(0, 0), [0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn save_png_writes_file() {
    let frame = FrameRGBA::new(canvas(3, 2), Rgba8Premul::from_straight_rgba(255, 0, 0, 128));
    let path = std::env::temp_dir().join(format!("demoseq_png_{}.png", std::process::id()));
    frame.save_png(&path).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0[3], 128);
    let _ = std::fs::remove_file(path);
}

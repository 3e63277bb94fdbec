use super::*;
use crate::{
    animation::ease::Ease,
    config::Theme,
    race::{
        keyframe::{Keyframe, RankedEntry},
        layout::{LayoutConfig, RaceLayout},
        scene::SceneBuilder,
    },
    render::svg::SvgWriter,
};

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn bars_and_background_land_on_expected_pixels() {
    let layout = RaceLayout::new(LayoutConfig::default(), 8).unwrap();
    let theme = Theme::default();
    let keyframe = Keyframe {
        time: 1960.0,
        ranking: vec![RankedEntry {
            name: "Ferrari".to_string(),
            value: 3.0,
            rank: 0,
        }],
        exact: true,
    };
    let scene = SceneBuilder::new(&layout, &theme, 1.0, Ease::Linear).settled(&keyframe);
    let doc = SvgWriter::new(&layout, &theme).unwrap().write(&scene).unwrap();

    let frame = Rasterizer::new(None).rasterize(&doc).unwrap();
    assert_eq!((frame.width, frame.height), (900, 500));
    assert_eq!(frame.data.len(), 900 * 500 * 4);
    assert!(frame.premultiplied);

    assert_eq!(pixel(&frame, 3, 3), [0x15, 0x15, 0x1e, 255]);
    let bar_y = (layout.y.position(0) + layout.y.bandwidth() / 2.0) as u32;
    assert_eq!(pixel(&frame, 143, bar_y), [0xdc, 0x00, 0x00, 255]);
}

#[test]
fn transparent_background_when_theme_has_none() {
    let layout = RaceLayout::new(LayoutConfig::default(), 2).unwrap();
    let theme = Theme {
        background: None,
        ..Theme::default()
    };
    let scene = SceneBuilder::new(&layout, &theme, 1.0, Ease::Linear).settled(&Keyframe {
        time: 1958.0,
        ranking: Vec::new(),
        exact: true,
    });
    let doc = SvgWriter::new(&layout, &theme).unwrap().write(&scene).unwrap();
    let frame = Rasterizer::new(None).rasterize(&doc).unwrap();
    assert_eq!(pixel(&frame, 3, 3), [0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let mut data = vec![0, 0, 0, 0, 10, 20, 30, 255, 64, 32, 0, 128];
    unpremultiply(&mut data);
    assert_eq!(&data[..8], &[0, 0, 0, 0, 10, 20, 30, 255]);
    assert_eq!(&data[8..], &[128, 64, 0, 128]);
}

use super::*;
use crate::foundation::core::Fps;

#[test]
fn transparent_pixels_take_the_background() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_onto(&mut dst, &src, Rgb8::new(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opaque_pixels_pass_through() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_onto(&mut dst, &src, Rgb8::new(10, 20, 30)).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn half_alpha_blends_with_background() {
    let src = vec![100u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_onto(&mut dst, &src, Rgb8::WHITE).unwrap();
    assert_eq!(dst, vec![227, 127, 127, 255]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_onto(&mut dst, &[0u8; 4], Rgb8::WHITE).is_err());
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(255, 127), 127);
    assert_eq!(mul_div255(0, 200), 0);
}

#[test]
fn odd_frame_size_is_rejected_before_spawning() {
    let out = std::env::temp_dir().join(format!("podium_odd_{}.mp4", std::process::id()));
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out), Rasterizer::new(None));
    let err = sink
        .begin(SinkConfig {
            width: 901,
            height: 500,
            fps: Fps::default(),
        })
        .unwrap_err();
    assert!(matches!(err, PodiumError::Validation(_)));
}

#[test]
fn end_without_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"), Rasterizer::new(None));
    assert!(sink.end().is_err());
}

#[test]
fn args_pass_rational_rate_before_input() {
    let mut opts = FfmpegSinkOpts::new("out/race.mp4");
    opts.overwrite = false;
    let sink = FfmpegSink::new(opts, Rasterizer::new(None));
    let args = sink.encoder_args(SinkConfig {
        width: 900,
        height: 500,
        fps: Fps::new(30000, 1001).unwrap(),
    });

    assert_eq!(args[0], "-n");
    let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[pos("-s") + 1], "900x500");
    assert_eq!(args[pos("-r") + 1], "30000/1001");
    assert!(pos("-r") < pos("-i"));
    assert_eq!(args.last().map(String::as_str), Some("out/race.mp4"));
}

#[test]
fn dropping_an_unstarted_sink_is_quiet() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"), Rasterizer::new(None));
    drop(sink);
}

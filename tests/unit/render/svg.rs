use super::*;
use crate::{
    animation::ease::Ease,
    race::{
        keyframe::{Keyframe, RankedEntry},
        layout::LayoutConfig,
        scene::SceneBuilder,
    },
};

fn frame(entries: &[(&str, f64)]) -> Keyframe {
    Keyframe {
        time: 1975.0,
        ranking: entries
            .iter()
            .enumerate()
            .map(|(rank, (name, value))| RankedEntry {
                name: name.to_string(),
                value: *value,
                rank,
            })
            .collect(),
        exact: true,
    }
}

fn render(theme: &Theme, entries: &[(&str, f64)]) -> SvgDocument {
    let layout = RaceLayout::new(LayoutConfig::default(), 8).unwrap();
    let scene = SceneBuilder::new(&layout, theme, 1.0, Ease::Linear).settled(&frame(entries));
    SvgWriter::new(&layout, theme).unwrap().write(&scene).unwrap()
}

#[test]
fn document_has_chart_size() {
    let doc = render(&Theme::default(), &[("Ferrari", 3.0)]);
    assert_eq!((doc.width, doc.height), (900, 500));
    assert!(doc.as_str().starts_with("<svg "));
    assert!(doc.as_str().ends_with("</svg>"));
    assert!(doc.as_str().contains(r#"viewBox="0 0 900 500""#));
}

#[test]
fn chrome_is_drawn() {
    let doc = render(&Theme::default(), &[]);
    let svg = doc.as_str();
    for tick in ["0", "5", "10", "15", "20"] {
        assert!(svg.contains(&format!(">{tick}</text>")), "missing tick {tick}");
    }
    assert!(svg.contains(">Title Wins</text>"));
    assert!(svg.contains(">Constructor</text>"));
    assert!(svg.contains(r#"stroke-dasharray="4,4""#));
    assert!(svg.contains(r#"class="finish" x="769" y="55""#));
    assert!(svg.contains(r##"fill="#15151e""##));
}

#[test]
fn elements_follow_the_scene() {
    let doc = render(
        &Theme::default(),
        &[("Ferrari", 3.0), ("Lotus", 2.0), ("Vanwall", 0.0)],
    );
    let svg = doc.as_str();
    assert_eq!(svg.matches(r#"class="bar""#).count(), 3);
    assert_eq!(svg.matches(r#"class="label""#).count(), 2);
    assert_eq!(svg.matches(r#"class="icon-group""#).count(), 2);
    assert_eq!(svg.matches(r#"class="value""#).count(), 2);
    assert!(svg.contains(r##"fill="#dc0000""##));
    assert!(svg.contains(r##"fill="#888888""##));
    assert!(svg.contains(r#"class="ticker""#));
    assert!(svg.contains(">1975</text>"));
}

#[test]
fn bars_are_drawn_before_text() {
    let doc = render(&Theme::default(), &[("Ferrari", 3.0)]);
    let svg = doc.as_str();
    let bar = svg.find(r#"class="bar""#).unwrap();
    let label = svg.find(r#"class="label""#).unwrap();
    let value = svg.find(r#"class="value""#).unwrap();
    let ticker = svg.find(r#"class="ticker""#).unwrap();
    assert!(bar < label && label < value && value < ticker);
}

#[test]
fn names_are_escaped() {
    let doc = render(&Theme::default(), &[("Brabham <\"BT\"> & Co", 2.0)]);
    assert!(
        doc.as_str()
            .contains(">Brabham &lt;&quot;BT&quot;&gt; &amp; Co</text>")
    );
}

#[test]
fn theme_controls_background_and_icon() {
    let theme = Theme {
        background: None,
        icon_href: Some("car.png".to_string()),
        ..Theme::default()
    };
    let doc = render(&theme, &[("Ferrari", 3.0)]);
    let svg = doc.as_str();
    assert!(!svg.contains(r#"class="background""#));
    assert!(svg.contains(r#"xlink:href="car.png""#));
    assert!(svg.contains(r#"transform="rotate(90)""#));
}

#[test]
fn coordinates_are_compact() {
    assert_eq!(num(140.0), "140");
    assert_eq!(num(218.754), "218.75");
    assert_eq!(num(-0.001), "0");
    assert_eq!(escape("a'b"), "a&apos;b");
}

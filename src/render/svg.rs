use std::fmt::{self, Write as _};

use crate::{
    config::Theme,
    foundation::core::{Point, Rgb8},
    foundation::error::{PodiumError, PodiumResult},
    race::{
        layout::{RaceLayout, format_tick},
        scene::SceneFrame,
    },
};

const LABEL_FONT_PX: f64 = 12.0;
const VALUE_FONT_PX: f64 = 14.0;
const TICK_FONT_PX: f64 = 14.0;
const TITLE_FONT_PX: f64 = 12.0;
const TICKER_FONT_PX: f64 = 30.0;
/// Baseline shift that vertically centers a text line on its anchor.
const CENTER_DY_EM: f64 = 0.35;

/// A complete, standalone SVG document for one video frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    markup: String,
}

impl SvgDocument {
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn into_string(self) -> String {
        self.markup
    }
}

/// Writes sampled scenes as SVG.
///
/// The static chart chrome (background, axis, titles, finish line) is built once
/// and shared by every frame.
#[derive(Clone, Debug)]
pub struct SvgWriter<'a> {
    layout: &'a RaceLayout,
    theme: &'a Theme,
    width: u32,
    height: u32,
    chrome: String,
}

impl<'a> SvgWriter<'a> {
    pub fn new(layout: &'a RaceLayout, theme: &'a Theme) -> PodiumResult<Self> {
        let width = layout.width().ceil() as u32;
        let height = layout.height.ceil() as u32;
        if width == 0 || height == 0 {
            return Err(PodiumError::render("svg document must be non-empty"));
        }

        let mut chrome = String::new();
        write_chrome(&mut chrome, layout, theme)
            .map_err(|e| PodiumError::render(format!("write chart chrome: {e}")))?;

        Ok(Self {
            layout,
            theme,
            width,
            height,
            chrome,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn write(&self, frame: &SceneFrame) -> PodiumResult<SvgDocument> {
        let mut markup = String::with_capacity(self.chrome.len() + 4096);
        self.write_document(&mut markup, frame)
            .map_err(|e| PodiumError::render(format!("write svg frame: {e}")))?;
        Ok(SvgDocument {
            width: self.width,
            height: self.height,
            markup,
        })
    }

    fn write_document(&self, out: &mut String, frame: &SceneFrame) -> fmt::Result {
        let theme = self.theme;
        let layout = self.layout;
        write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = self.width,
            h = self.height,
        )?;
        out.push_str(&self.chrome);

        for bar in &frame.bars {
            write!(
                out,
                r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                num(bar.rect.x0),
                num(bar.rect.y0),
                num(bar.rect.width().max(0.0)),
                num(bar.rect.height()),
                bar.color,
            )?;
        }

        for label in &frame.labels {
            write_text(
                out,
                "label",
                label.anchor,
                &label.text,
                TextStyle {
                    anchor: "end",
                    size: LABEL_FONT_PX,
                    bold: true,
                    fill: theme.text,
                    centered: true,
                },
            )?;
        }

        for icon in &frame.icons {
            write!(
                out,
                r#"<g class="icon-group" transform="translate({},{})">"#,
                num(icon.center.x),
                num(icon.center.y),
            )?;
            write_icon(out, layout, theme)?;
            out.push_str("</g>");
        }

        for value in &frame.values {
            write_text(
                out,
                "value",
                value.anchor,
                &value.text,
                TextStyle {
                    anchor: "start",
                    size: VALUE_FONT_PX,
                    bold: true,
                    fill: theme.text,
                    centered: true,
                },
            )?;
        }

        write_text(
            out,
            "ticker",
            layout.ticker_anchor(),
            &frame.year.to_string(),
            TextStyle {
                anchor: "end",
                size: TICKER_FONT_PX,
                bold: false,
                fill: theme.ticker,
                centered: false,
            },
        )?;

        out.push_str("</svg>");
        Ok(())
    }
}

fn write_chrome(out: &mut String, layout: &RaceLayout, theme: &Theme) -> fmt::Result {
    let cfg = &layout.config;
    let m = cfg.margin;

    if let Some(bg) = theme.background {
        write!(
            out,
            r#"<rect class="background" x="0" y="0" width="{}" height="{}" fill="{bg}"/>"#,
            num(layout.width()),
            num(layout.height),
        )?;
    }

    // Top axis.
    let (x0, x1) = layout.x.range;
    let size = num(cfg.tick_size);
    write!(
        out,
        r#"<g class="axis" transform="translate(0,{})"><path class="domain" d="M{},-{size}V0H{}V-{size}" fill="none" stroke="{}"/>"#,
        num(layout.axis_y()),
        num(x0),
        num(x1),
        theme.text,
    )?;
    let label_y = -(cfg.tick_size + cfg.tick_padding);
    for (value, x) in layout.x_ticks() {
        write!(
            out,
            r#"<g class="tick" transform="translate({},0)"><line y2="-{size}" stroke="{}" stroke-width="2"/>"#,
            num(x),
            theme.text,
        )?;
        write_text(
            out,
            "",
            Point::new(0.0, label_y),
            &format_tick(value),
            TextStyle {
                anchor: "middle",
                size: TICK_FONT_PX,
                bold: true,
                fill: theme.text,
                centered: false,
            },
        )?;
        out.push_str("</g>");
    }
    write_text(
        out,
        "axis-label",
        Point::new(
            (cfg.width - m.left - m.right) / 2.0 + m.left,
            -2.5 * TITLE_FONT_PX,
        ),
        &theme.value_axis_title,
        TextStyle {
            anchor: "middle",
            size: TITLE_FONT_PX,
            bold: false,
            fill: theme.text,
            centered: false,
        },
    )?;
    out.push_str("</g>");

    // Rotated category axis title.
    out.push_str(r#"<g transform="rotate(-90)">"#);
    write_text(
        out,
        "axis-label",
        Point::new(-(layout.height - m.top - m.bottom) / 2.0, 80.0),
        &theme.category_axis_title,
        TextStyle {
            anchor: "middle",
            size: TITLE_FONT_PX,
            bold: false,
            fill: theme.text,
            centered: true,
        },
    )?;
    out.push_str("</g>");

    let finish = layout.finish_line();
    write!(
        out,
        r#"<rect class="finish" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="2" stroke-dasharray="4,4"/>"#,
        num(finish.x0),
        num(finish.y0),
        num(finish.width()),
        num(finish.height()),
        theme.text,
    )
}

#[derive(Clone, Copy)]
struct TextStyle {
    anchor: &'static str,
    size: f64,
    bold: bool,
    fill: Rgb8,
    /// Shift the baseline so the line is centered on the anchor.
    centered: bool,
}

fn write_text(
    out: &mut String,
    class: &str,
    at: Point,
    text: &str,
    style: TextStyle,
) -> fmt::Result {
    let y = if style.centered {
        at.y + CENTER_DY_EM * style.size
    } else {
        at.y
    };
    out.push_str("<text");
    if !class.is_empty() {
        write!(out, r#" class="{class}""#)?;
    }
    write!(
        out,
        r#" x="{}" y="{}" text-anchor="{}" font-size="{}" fill="{}""#,
        num(at.x),
        num(y),
        style.anchor,
        num(style.size),
        style.fill,
    )?;
    if style.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    write!(out, ">{}</text>", escape(text))
}

/// The bar-end icon, drawn around the origin and rotated a quarter turn.
fn write_icon(out: &mut String, layout: &RaceLayout, theme: &Theme) -> fmt::Result {
    let w = layout.icon_width;
    let h = layout.icon_height;
    match &theme.icon_href {
        Some(href) => write!(
            out,
            r#"<image class="icon" x="{}" y="{}" width="{}" height="{}" transform="rotate(90)" preserveAspectRatio="none" xlink:href="{}"/>"#,
            num(-w / 2.0),
            num(-h / 2.0),
            num(w),
            num(h),
            escape(href),
        ),
        None => write_car_glyph(out, w, h, theme.text),
    }
}

/// Top-down race car fitted to a `w` x `h` box, nose pointing up before rotation.
fn write_car_glyph(out: &mut String, w: f64, h: f64, fill: Rgb8) -> fmt::Result {
    let (left, top) = (-w / 2.0, -h / 2.0);
    write!(out, r#"<g class="icon" transform="rotate(90)" fill="{fill}">"#)?;
    let parts = [
        // Chassis.
        (0.35, 0.05, 0.30, 0.90),
        // Front and rear wings.
        (0.05, 0.02, 0.90, 0.08),
        (0.10, 0.88, 0.80, 0.10),
        // Wheels.
        (0.0, 0.18, 0.25, 0.18),
        (0.75, 0.18, 0.25, 0.18),
        (0.0, 0.64, 0.25, 0.20),
        (0.75, 0.64, 0.25, 0.20),
    ];
    for (px, py, pw, ph) in parts {
        write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"/>"#,
            num(left + px * w),
            num(top + py * h),
            num(pw * w),
            num(ph * h),
            num(0.08 * w),
        )?;
    }
    out.push_str("</g>");
    Ok(())
}

/// Coordinates rounded to 1/100 px, without trailing zeros.
fn num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r.fract() == 0.0 {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;

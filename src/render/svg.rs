//! SVG serialization of a measured [`FlyerTree`].

use std::fmt::Write as _;

use crate::assets::color::{Rgb8, Rgba};
use crate::foundation::error::{FlyerError, FlyerResult};
use crate::layout::tree::{BackgroundLayer, CtaEmphasis, Element, FlyerTree, TextShadow};
use crate::render::measure::{BoxLayout, PlacedElement};

const PLACEHOLDER_GRAY: Rgb8 = Rgb8::new(0x6B, 0x72, 0x80);

/// Emit a standalone SVG document for `tree` laid out as `layout`.
pub fn to_svg(tree: &FlyerTree, layout: &BoxLayout) -> FlyerResult<String> {
    let mut out = String::with_capacity(4096);
    write_svg(&mut out, tree, layout).map_err(|e| FlyerError::export(format!("svg write: {e}")))?;
    Ok(out)
}

fn write_svg(out: &mut String, tree: &FlyerTree, layout: &BoxLayout) -> std::fmt::Result {
    let (w, h) = (tree.canvas.width, tree.canvas.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;

    out.push_str("<defs>\n");
    writeln!(
        out,
        r#"<linearGradient id="backdrop" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
        tree.backdrop.top.to_hex(),
        tree.backdrop.bottom.to_hex()
    )?;
    // Offsets are measured from the bottom edge, so the gradient runs upward.
    out.push_str(r#"<linearGradient id="overlay" x1="0" y1="1" x2="0" y2="0">"#);
    for stop in &tree.overlay.stops {
        write!(
            out,
            r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
            stop.offset,
            stop.color.rgb.to_hex(),
            stop.color.alpha
        )?;
    }
    out.push_str("</linearGradient>\n");
    writeln!(
        out,
        r#"<clipPath id="canvas"><rect x="0" y="0" width="{w}" height="{h}"/></clipPath>"#
    )?;

    let bar = tree
        .content
        .zones
        .iter()
        .zip(&layout.zones)
        .find_map(|(z, r)| z.fill.map(|f| (f, *r)));
    if let Some((fill, r)) = bar {
        writeln!(
            out,
            r#"<clipPath id="bar"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath><filter id="bar-blur" x="-10%" y="-10%" width="120%" height="120%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            fill.blur_px
        )?;
    }
    let mut shadow_ids = Vec::new();
    for el in tree.content.elements() {
        if let Some(s) = el.style.shadow
            && !shadow_ids.contains(&shadow_key(&s))
        {
            let key = shadow_key(&s);
            writeln!(
                out,
                r#"<filter id="shadow-{key}" x="-20%" y="-20%" width="140%" height="140%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
                s.blur / 2.0
            )?;
            shadow_ids.push(key);
        }
    }
    out.push_str("</defs>\n");

    out.push_str(r#"<g clip-path="url(#canvas)">"#);
    out.push('\n');
    writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="url(#backdrop)"/>"#
    )?;

    match &tree.background {
        BackgroundLayer::Image { url } => {
            writeln!(out, "{}", image_tag(url, w, h, None))?;
        }
        BackgroundLayer::Placeholder { label } => {
            let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
            writeln!(
                out,
                r#"<g opacity="0.3" stroke="{}" stroke-width="2" fill="none" stroke-linecap="round" stroke-linejoin="round"><path d="M{} {} v-28 m-12 12 l12 -12 l12 12"/><path d="M{} {} v8 h40 v-8"/></g>"#,
                PLACEHOLDER_GRAY.to_hex(),
                cx,
                cy,
                cx - 20.0,
                cy + 4.0
            )?;
            writeln!(
                out,
                r#"<text x="{cx}" y="{}" font-family="Inter, sans-serif" font-size="18" fill="{}" text-anchor="middle">{}</text>"#,
                cy + 40.0,
                PLACEHOLDER_GRAY.to_hex(),
                escape(label)
            )?;
        }
    }

    writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="url(#overlay)"/>"#
    )?;

    if let Some((fill, r)) = bar {
        if let Some(url) = tree.background.image_url() {
            writeln!(
                out,
                r#"<g clip-path="url(#bar)">{}</g>"#,
                image_tag(url, w, h, Some("bar-blur"))
            )?;
        }
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            fill.color.rgb.to_hex(),
            fill.color.alpha
        )?;
    }

    for placed in &layout.elements {
        let Some(el) = tree
            .content
            .zones
            .get(placed.zone)
            .and_then(|z| z.elements.get(placed.index))
        else {
            continue;
        };
        write_element(out, el, placed)?;
    }

    out.push_str("</g>\n</svg>\n");
    Ok(())
}

fn write_element(
    out: &mut String,
    el: &Element,
    placed: &PlacedElement,
) -> std::fmt::Result {
    let r = placed.rect;
    if let Some(chrome) = &el.chrome {
        let class = match chrome.emphasis {
            Some(CtaEmphasis::Pulse) => r#" class="cta-pulse""#,
            Some(CtaEmphasis::HoverScale) => r#" class="cta-hover""#,
            None => "",
        };
        writeln!(
            out,
            r#"<rect{class} x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            chrome.radius,
            chrome.fill.to_hex()
        )?;
    }

    let style = &el.style;
    let pad_y = el.chrome.as_ref().map(|c| c.padding_y).unwrap_or(0.0) as f64;
    let line_h = (style.font_size * style.line_height) as f64;
    let cx = (r.x0 + r.x1) / 2.0;
    for (i, line) in placed.lines.iter().enumerate() {
        // Baseline sits roughly where a browser puts it inside the line box.
        let baseline = r.y0
            + pad_y
            + line_h * i as f64
            + (line_h - style.font_size as f64) / 2.0
            + style.font_size as f64 * 0.8;
        if let Some(shadow) = &style.shadow {
            write_text(
                out,
                line,
                cx + shadow.dx as f64,
                baseline + shadow.dy as f64,
                el,
                shadow.color,
                Some(shadow),
            )?;
        }
        write_text(out, line, cx, baseline, el, style.color.with_alpha(1.0), None)?;
    }
    Ok(())
}

fn write_text(
    out: &mut String,
    line: &str,
    x: f64,
    y: f64,
    el: &Element,
    color: Rgba,
    shadow: Option<&TextShadow>,
) -> std::fmt::Result {
    let style = &el.style;
    let filter = shadow
        .map(|s| format!(r#" filter="url(#shadow-{})""#, shadow_key(s)))
        .unwrap_or_default();
    writeln!(
        out,
        r#"<text x="{x}" y="{y}" font-family="{}, sans-serif" font-size="{}" font-weight="{}" letter-spacing="{}" fill="{}" fill-opacity="{}" text-anchor="middle"{filter}>{}</text>"#,
        escape(style.font_family),
        style.font_size,
        style.font_weight,
        style.letter_spacing * style.font_size,
        color.rgb.to_hex(),
        color.alpha,
        escape(line)
    )
}

fn image_tag(url: &str, w: u32, h: u32, filter: Option<&str>) -> String {
    let filter = filter
        .map(|f| format!(r#" filter="url(#{f})""#))
        .unwrap_or_default();
    format!(
        r#"<image x="0" y="0" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice" xlink:href="{}"{filter}/>"#,
        escape(url)
    )
}

fn shadow_key(s: &TextShadow) -> String {
    format!("{}", (s.blur * 10.0).round() as u32)
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            // Not representable in XML 1.0.
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;

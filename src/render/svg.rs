use crate::foundation::core::Rgba8;
use crate::render::view::{DiagramStyle, DiagramView};

/// Caption font size in SVG user units.
pub const CAPTION_FONT_SIZE: f64 = 22.0;

/// Serialize `view` as a standalone SVG document.
///
/// Draw order is background, edges, nodes, caption. Coordinates are emitted with two decimals,
/// which keeps output stable across platforms.
pub fn diagram_svg(view: &DiagramView, style: &DiagramStyle) -> String {
    let w = view.bounds.width();
    let h = view.bounds.height();
    let mut out = String::with_capacity(64 * (view.edges.len() + view.nodes.len()) + 512);

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="{x:.2} {y:.2} {w:.2} {h:.2}">"#,
        x = view.bounds.x0,
        y = view.bounds.y0,
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{w:.2}" height="{h:.2}" fill="{}"/>"#,
        view.bounds.x0,
        view.bounds.y0,
        style.background.to_hex()
    ));
    out.push('\n');

    out.push_str("<g id=\"edges\" stroke-width=\"1\">\n");
    for e in &view.edges {
        out.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"{}/>"#,
            e.from.x,
            e.from.y,
            e.to.x,
            e.to.y,
            e.color.to_hex(),
            opacity_attr("stroke-opacity", e.color),
        ));
        out.push('\n');
    }
    out.push_str("</g>\n");

    out.push_str("<g id=\"nodes\">\n");
    for n in &view.nodes {
        out.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"{}/>"#,
            n.center.x,
            n.center.y,
            view.node_radius * n.scale_factor,
            n.color.to_hex(),
            opacity_attr("fill-opacity", n.color),
        ));
        out.push('\n');
    }
    out.push_str("</g>\n");

    if let Some(caption) = view.caption {
        let cx = view.bounds.x0 + w / 2.0;
        let cy = view.bounds.y1 - 24.0;
        out.push_str(&format!(
            r#"<text x="{cx:.2}" y="{cy:.2}" font-family="sans-serif" font-size="{CAPTION_FONT_SIZE:.0}" font-weight="bold" text-anchor="middle" fill="{}" opacity="{:.3}" transform="translate({cx:.2} {cy:.2}) scale({:.3}) translate({:.2} {:.2})">Predicted: {}</text>"#,
            style.caption.to_hex(),
            caption.opacity,
            caption.scale,
            -cx,
            -cy,
            caption.label,
        ));
        out.push('\n');
    }

    out.push_str("</svg>\n");
    out
}

fn opacity_attr(name: &str, c: Rgba8) -> String {
    if c.a == 255 {
        String::new()
    } else {
        format!(r#" {name}="{:.3}""#, f64::from(c.a) / 255.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;

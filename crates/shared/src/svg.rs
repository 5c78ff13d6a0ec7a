use crate::models::Rgb;
use crate::render::{Canvas, Stroke};
use crate::viewport::Bitmap;

/// Uniform scale plus translation: `p' = p * s + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    s: f64,
    tx: f64,
    ty: f64,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        s: 1.0,
        tx: 0.0,
        ty: 0.0,
    };
}

/// A [`Canvas`] that builds an SVG document as a string.
///
/// Every element carries the transform that was current when it was drawn,
/// so save/restore needs no nesting in the output.
#[derive(Debug)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
    current: Affine,
    stack: Vec<Affine>,
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

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        SvgCanvas {
            width,
            height,
            body: String::with_capacity(4096),
            current: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// The drawn elements without the `<svg>` wrapper.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    fn transform_attr(&self) -> String {
        if self.current == Affine::IDENTITY {
            String::new()
        } else {
            let Affine { s, tx, ty } = self.current;
            format!(r#" transform="matrix({s} 0 0 {s} {tx} {ty})""#)
        }
    }
}

impl Canvas for SvgCanvas {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        self.current = self.stack.pop().unwrap_or(Affine::IDENTITY);
    }

    fn scale(&mut self, s: f64) {
        self.current.s *= s;
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.current.tx += self.current.s * dx;
        self.current.ty += self.current.s * dy;
    }

    fn fill(&mut self, color: Rgb) {
        self.body.push_str(&format!(
            r#"<rect x="0" y="0" width="100%" height="100%" fill="{}"/>"#,
            color.to_hex()
        ));
    }

    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgb) {
        let tf = self.transform_attr();
        self.body.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-size="{size}" fill="{}"{tf}>{}</text>"#,
            color.to_hex(),
            escape(text)
        ));
    }

    fn image(&mut self, bitmap: &Bitmap, x: f64, y: f64) {
        let tf = self.transform_attr();
        self.body.push_str(&format!(
            r#"<image href="{}" x="{x}" y="{y}" width="{}" height="{}"{tf}/>"#,
            escape(&bitmap.source),
            bitmap.width,
            bitmap.height
        ));
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke) {
        let tf = self.transform_attr();
        self.body.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{tf}/>"#,
            from.0,
            from.1,
            to.0,
            to.1,
            stroke.color.to_hex(),
            stroke.width
        ));
    }

    fn rect(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: Rgb) {
        let tf = self.transform_attr();
        self.body.push_str(&format!(
            r#"<rect x="{left}" y="{top}" width="{}" height="{}" fill="{}"{tf}/>"#,
            right - left,
            bottom - top,
            color.to_hex()
        ));
    }

    fn circle(&mut self, center: (f64, f64), radius: f64, color: Rgb) {
        let tf = self.transform_attr();
        self.body.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"{tf}/>"#,
            center.0,
            center.1,
            color.to_hex()
        ));
    }

    fn polygon(&mut self, points: &[(f64, f64)], color: Rgb) {
        let tf = self.transform_attr();
        let pts = points
            .iter()
            .map(|(x, y)| format!("{x},{y}"))
            .collect::<Vec<_>>()
            .join(" ");
        self.body.push_str(&format!(
            r#"<polygon points="{pts}" fill="{}"{tf}/>"#,
            color.to_hex()
        ));
    }
}

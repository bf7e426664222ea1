//! SVG output of the map: one line per arc, one dot per tag.

use crate::config::SvgConfig;
use crate::error::MapResult;
use crate::graph::{Arc, TagMap};
use std::fmt::Write;

/// How an arc is drawn. Only tree membership matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcColor {
    Tree,
    Other,
}

impl ArcColor {
    pub fn of(arc: &Arc) -> Self {
        if arc.in_tree { ArcColor::Tree } else { ArcColor::Other }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArcColor::Tree => "red",
            ArcColor::Other => "green",
        }
    }
}

/// An SVG document over a map-coordinate bounding box. Map `y` points up.
pub struct Svg {
    config: SvgConfig,
    min: (f64, f64),
    max: (f64, f64),
    body: String,
}

impl Svg {
    pub fn new(min: (f64, f64), max: (f64, f64), config: SvgConfig) -> Self {
        Self { config, min, max, body: String::new() }
    }

    fn project(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (x - self.min.0) * self.config.scale + self.config.margin,
            (self.max.1 - y) * self.config.scale + self.config.margin,
        )
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str) {
        let (x1, y1) = self.project(from);
        let (x2, y2) = self.project(to);
        let _ = writeln!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            x1, y1, x2, y2, color, self.config.stroke_width
        );
    }

    pub fn dot(&mut self, at: (f64, f64), label: &str) {
        let (x, y) = self.project(at);
        let r = self.config.stroke_width * 2.0;
        let _ = writeln!(self.body, "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"black\"/>", x, y, r);
        let _ = writeln!(self.body, "<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{}\">{}</text>", x + r, y - r, r * 3.0, label);
    }

    pub fn finish(self) -> String {
        let width = (self.max.0 - self.min.0) * self.config.scale + 2.0 * self.config.margin;
        let height = (self.max.1 - self.min.1) * self.config.scale + 2.0 * self.config.margin;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.2}\" height=\"{:.2}\">\n{}</svg>\n",
            width, height, self.body
        )
    }
}

/// Draws one arc between its tags' positions.
pub fn render_arc(arc: &Arc, map: &TagMap, svg: &mut Svg) -> MapResult<()> {
    let from = map.tag_lookup(arc.low())?.position();
    let to = map.tag_lookup(arc.high())?.position();
    svg.line(from, to, ArcColor::of(arc).as_str());
    Ok(())
}

/// Renders every arc (identity order) and then every tag.
pub fn render_map(map: &TagMap, config: &SvgConfig) -> MapResult<String> {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for tag in map.tags() {
        min = (min.0.min(tag.x), min.1.min(tag.y));
        max = (max.0.max(tag.x), max.1.max(tag.y));
    }
    if map.tag_count() == 0 {
        min = (0.0, 0.0);
        max = (0.0, 0.0);
    }

    let mut svg = Svg::new(min, max, config.clone());
    for id in map.arc_ids_by_identity() {
        render_arc(map.arc(id), map, &mut svg)?;
    }
    for tag in map.tags() {
        svg.dot(tag.position(), &tag.id.to_string());
    }
    Ok(svg.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TagId;

    fn config() -> SvgConfig {
        SvgConfig { scale: 10.0, margin: 5.0, stroke_width: 1.0 }
    }

    #[test]
    fn test_color_depends_only_on_tree_membership() {
        let mut arc = Arc::create(TagId(1), 0.3, 2.0, TagId(2), 0.1, 5.0).unwrap();
        assert_eq!(ArcColor::of(&arc), ArcColor::Other);
        arc.in_tree = true;
        assert_eq!(ArcColor::of(&arc).as_str(), "red");
    }

    #[test]
    fn test_render_arc_draws_between_tags() {
        let mut map = TagMap::new();
        map.add_tag(TagId(1), 0.0, 0.0).unwrap();
        map.add_tag(TagId(2), 2.0, 1.0).unwrap();
        let id = map.create_arc(TagId(2), 0.0, 2.2, TagId(1), 0.0, 1.0).unwrap();

        let mut svg = Svg::new((0.0, 0.0), (2.0, 1.0), config());
        render_arc(map.arc(id), &map, &mut svg).unwrap();
        let out = svg.finish();
        assert!(out.contains("<line x1=\"5.00\" y1=\"15.00\" x2=\"25.00\" y2=\"5.00\" stroke=\"green\""));
        assert!(out.contains("width=\"30.00\" height=\"20.00\""));
    }

    #[test]
    fn test_render_map() {
        let mut map = TagMap::new();
        map.add_tag(TagId(1), 0.0, 0.0).unwrap();
        map.add_tag(TagId(2), 1.0, 0.0).unwrap();
        let id = map.create_arc(TagId(1), 0.0, 1.0, TagId(2), 0.0, 1.0).unwrap();
        map.arc_mut(id).in_tree = true;

        let out = render_map(&map, &config()).unwrap();
        assert_eq!(out.matches("<line").count(), 1);
        assert_eq!(out.matches("<circle").count(), 2);
        assert!(out.contains("stroke=\"red\""));
        assert!(render_map(&TagMap::new(), &config()).unwrap().starts_with("<svg"));
    }
}

use crate::graph::{ArcId, TagId, TagMap};
use std::collections::HashSet;
use std::fmt::Write;

/// Formats the current spanning tree as an indented text tree rooted at `root`.
pub fn format_tree(map: &TagMap, root: TagId) -> String {
    let mut tracer = Tracer { map, visited: HashSet::new(), output: String::new() };

    match map.tag(root) {
        Some(tag) => {
            let _ = writeln!(tracer.output, "SPANNING TREE from tag '{}':", root);
            let _ = writeln!(tracer.output, "--------------------------------------------------");
            let _ = writeln!(tracer.output, "[H{}] Tag {} ({:.3}, {:.3})", tag.hop_count, tag.id, tag.x, tag.y);
            tracer.visited.insert(root);
            tracer.recurse_children(root, "");
        }
        None => {
            let _ = writeln!(tracer.output, "Error: Unknown tag {}", root);
        }
    }
    tracer.output
}

struct Tracer<'a> {
    map: &'a TagMap,
    visited: HashSet<TagId>,
    output: String,
}

impl<'a> Tracer<'a> {
    /// Tree arcs leading away from `tag`, sorted by child id.
    fn children(&self, tag: TagId) -> Vec<(TagId, ArcId)> {
        let Some(node) = self.map.tag(tag) else { return Vec::new() };
        let mut children: Vec<(TagId, ArcId)> = node
            .arcs
            .iter()
            .filter(|&&id| self.map.arc(id).in_tree)
            .filter_map(|&id| self.map.arc(id).other_end(tag).map(|child| (child, id)))
            .filter(|(child, _)| !self.visited.contains(child))
            .collect();
        children.sort();
        children
    }

    fn recurse_children(&mut self, tag: TagId, stem: &str) {
        let children = self.children(tag);
        for (i, &(child, arc_id)) in children.iter().enumerate() {
            if !self.visited.insert(child) {
                continue;
            }
            let is_last = i == children.len() - 1;
            let connector = if is_last { "`--" } else { "|--" };
            let arc = self.map.arc(arc_id);
            let quality = arc.quality().map_or_else(|| "unset".to_string(), |q| format!("{:.3}", q));
            if let Some(node) = self.map.tag(child) {
                let _ = writeln!(
                    self.output,
                    "{}{} [H{}] Tag {} ({:.3}, {:.3}) d={:.3} q={}",
                    stem, connector, node.hop_count, node.id, node.x, node.y, arc.distance(), quality
                );
            }
            let child_stem = format!("{}{}", stem, if is_last { "    " } else { "|   " });
            self.recurse_children(child, &child_stem);
        }
    }
}

//! Debug utilities for inspecting the tree's edge structure.

use std::collections::HashSet;
use std::fmt::Write;

use crate::node::NodeId;
use crate::radix::RadixMap;

impl RadixMap {
    /// Renders one line per node, `- label = value`, indented four spaces
    /// per level. Value-less branch points omit the `= value` part.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        let root = &self.nodes[NodeId::ROOT];
        if let Some(value) = root.value {
            let _ = writeln!(out, "-  = {}", value);
        }

        let mut stack: Vec<(NodeId, usize)> = root.child.map(|c| (c, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            let _ = write!(
                out,
                "{}- {}",
                " ".repeat(4 * depth),
                String::from_utf8_lossy(&node.label)
            );
            if let Some(value) = node.value {
                let _ = write!(out, " = {}", value);
            }
            out.push('\n');

            if let Some(next) = node.next {
                stack.push((next, depth));
            }
            if let Some(child) = node.child {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Print the tree structure for debugging.
    pub fn debug_print(&self) {
        println!(
            "=== RadixMap ({} keys, {} nodes) ===",
            self.len(),
            self.node_count()
        );
        print!("{}", self.render_tree());
    }

    /// Verify tree integrity - returns list of issues found.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let root = &self.nodes[NodeId::ROOT];
        if !root.label.is_empty() {
            issues.push(format!("root has label {:?}", root.label.as_slice()));
        }
        if root.next.is_some() {
            issues.push("root has a sibling".to_string());
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut values = 0usize;
        let mut stack = vec![NodeId::ROOT];
        seen.insert(NodeId::ROOT);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.value.is_some() {
                values += 1;
            }

            let mut first_bytes = HashSet::new();
            let mut children = 0usize;
            for child in self.nodes.siblings(node.child) {
                if !seen.insert(child) {
                    issues.push(format!("{child:?} is reachable twice"));
                    break;
                }
                children += 1;
                stack.push(child);

                match self.nodes[child].first_byte() {
                    None => issues.push(format!("{child:?} has an empty label")),
                    Some(b) if !first_bytes.insert(b) => {
                        issues.push(format!("{id:?} has two children starting with {b:#04x}"))
                    }
                    Some(_) => {}
                }
            }

            if id != NodeId::ROOT && node.value.is_none() {
                match children {
                    0 => issues.push(format!("{id:?} is a value-less leaf")),
                    1 => issues.push(format!("{id:?} is a value-less node with one child")),
                    _ => {}
                }
            }
        }

        if values != self.len() {
            issues.push(format!("{} values reachable, len is {}", values, self.len()));
        }
        if seen.len() != self.nodes.live() {
            issues.push(format!(
                "{} nodes reachable, {} slots live",
                seen.len(),
                self.nodes.live()
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let mut t = RadixMap::new();
        for (k, v) in [("test", 5), ("team", 9), ("te", 11), ("hello", 7)] {
            t.put(k.as_bytes(), v).unwrap();
        }
        let expected = "\
- te = 11
    - st = 5
    - am = 9
- hello = 7
";
        assert_eq!(t.render_tree(), expected);
    }

    #[test]
    fn test_render_empty_key() {
        let mut t = RadixMap::new();
        assert_eq!(t.render_tree(), "");
        t.put(b"", 3).unwrap();
        t.put(b"a", 1).unwrap();
        assert_eq!(t.render_tree(), "-  = 3\n- a = 1\n");
    }

    #[test]
    fn test_verify_detects_uncompressed_branch() {
        let mut t = RadixMap::new();
        t.put(b"team", 1).unwrap();
        t.put(b"test", 2).unwrap();
        assert!(t.verify_integrity().is_empty());

        // Detach "am" by hand, leaving "te" with a single child.
        let te = t.nodes[NodeId::ROOT].child.unwrap();
        let st = t.nodes[te].child.unwrap();
        assert_eq!(t.nodes[st].label.as_slice(), b"st");
        t.nodes[st].next = None;

        let issues = t.verify_integrity();
        assert!(issues.iter().any(|i| i.contains("one child")), "{issues:?}");
        assert!(issues.iter().any(|i| i.contains("values reachable")), "{issues:?}");
    }
}

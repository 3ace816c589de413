use colored::Colorize;
use vfs_tree::{NodeId, NodeValue, Tree};

/// Draws the subtree under `node` with box-drawing connectors, one node per
/// line.
pub fn render(tree: &Tree, node: NodeId, use_color: bool) -> String {
    let mut out = String::new();
    out.push_str(&label(tree, node, use_color));
    out.push('\n');
    render_children(tree, node, "", use_color, &mut out);
    out
}

fn render_children(tree: &Tree, node: NodeId, prefix: &str, use_color: bool, out: &mut String) {
    let children = tree.children(node);

    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == children.len();
        let (connector, extension) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&label(tree, *child, use_color));
        out.push('\n');

        render_children(tree, *child, &format!("{prefix}{extension}"), use_color, out);
    }
}

fn label(tree: &Tree, node: NodeId, use_color: bool) -> String {
    match tree.value(node) {
        NodeValue::Directory(directory) => {
            let name = format!("{}/", directory.filename());
            if use_color {
                name.blue().bold().to_string()
            } else {
                name
            }
        }
        NodeValue::File(file) => {
            let mime = format!("({})", file.mime());
            if use_color {
                format!("{} {}", file.filename(), mime.dimmed())
            } else {
                format!("{} {}", file.filename(), mime)
            }
        }
    }
}

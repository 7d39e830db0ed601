//! WordprocessingML helpers on top of `roxmltree`.

use roxmltree::Node;

/// Namespace of the WordprocessingML main part.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Check if a node is a `w:` element with the given local name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tehui_extractor::adapter::xml::is_w;
///
/// let xml = r#"<w:p xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert!(is_w(doc.root_element(), "p"));
/// assert!(!is_w(doc.root_element(), "r"));
/// ```
pub fn is_w(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().namespace() == Some(W_NS) && node.tag_name().name() == tag
}

/// Find the first `w:` child element with the given local name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_w(*child, tag))
}

/// Find a descendant element matching a slash-separated path of `w:` names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use tehui_extractor::adapter::xml::{find_by_path, w_attribute};
///
/// let xml = r#"<w:p xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
///     <w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
/// </w:p>"#;
/// let doc = Document::parse(xml).unwrap();
/// let style = find_by_path(doc.root_element(), "pPr/pStyle").unwrap();
/// assert_eq!(w_attribute(style, "val"), Some("Heading1"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Get a `w:`-qualified attribute value.
pub fn w_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((W_NS, name))
}

/// Visible text of a `w:p` paragraph.
///
/// Concatenates `w:t` runs and renders `w:tab` as a tab character. Runs of
/// paragraphs nested inside this one (text boxes) are left to the nested
/// paragraph.
pub fn paragraph_text(paragraph: Node<'_, '_>) -> String {
    let mut text = String::new();
    for node in paragraph.descendants().skip(1) {
        if !node.is_element() || owning_paragraph(node) != Some(paragraph) {
            continue;
        }
        if is_w(node, "t") {
            text.push_str(node.text().unwrap_or_default());
        } else if is_w(node, "tab") {
            text.push('\t');
        }
    }
    text
}

fn owning_paragraph<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.ancestors().skip(1).find(|a| is_w(*a, "p"))
}

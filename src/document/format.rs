//! Whitespace formatting applied to head/body children before serialization.

use crate::dom::{Dom, NodeData, NodeId};

/// Conditional comments (`<!--[if IE]>...<![endif]-->`) survive compaction.
fn is_conditional_comment(text: &str) -> bool {
    text.starts_with("[if ")
}

/// Strip whitespace-only text and non-conditional comments below `parent`,
/// trimming every remaining text node.
pub(crate) fn compact(dom: &mut Dom, parent: NodeId) {
    let children: Vec<NodeId> = dom.children(parent).collect();

    for child in children {
        let Some(node) = dom.get_mut(child) else {
            continue;
        };

        let remove = match &mut node.data {
            NodeData::Text(text) => {
                if text.trim().len() != text.len() {
                    *text = text.trim().to_string();
                }
                text.is_empty()
            }
            NodeData::Comment(text) => !is_conditional_comment(text),
            _ => false,
        };
        let is_element = matches!(node.data, NodeData::Element { .. });

        if remove {
            dom.detach(child);
        } else if is_element {
            compact(dom, child);
        }
    }
}

/// Remove whitespace-only text nodes directly under `parent`.
pub(crate) fn strip_blank_text(dom: &mut Dom, parent: NodeId) {
    let blank: Vec<NodeId> = dom
        .children(parent)
        .filter(|&c| dom.text(c).is_some_and(|t| t.trim().is_empty()))
        .collect();
    for child in blank {
        dom.detach(child);
    }
}

/// Put every non-text child of `parent` on its own line.
///
/// The list is walked from its end, where injected nodes are appended, and
/// the walk stops at the first child already preceded by a text node holding
/// a newline.
pub(crate) fn pretty(dom: &mut Dom, parent: NodeId) {
    let children: Vec<NodeId> = dom.children(parent).collect();

    for &child in children.iter().rev() {
        if dom.is_text(child) {
            continue;
        }

        let on_own_line = dom
            .prev_sibling(child)
            .and_then(|prev| dom.text(prev))
            .is_some_and(|text| text.contains('\n'));
        if on_own_line {
            break;
        }

        let newline = dom.create_text("\n");
        dom.insert_before(child, newline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, to_html};

    fn body_of(dom: &Dom) -> NodeId {
        let html = dom.child_element(dom.document(), "html").unwrap();
        dom.child_element(html, "body").unwrap()
    }

    #[test]
    fn test_compact_strips_whitespace_and_comments() {
        let mut dom = parse_html(
            "<html><head></head><body>\n  <!-- note -->\n  <div>\n    <p>  Hi  </p>\n  </div>\n</body></html>",
        );
        let body = body_of(&dom);
        compact(&mut dom, body);

        assert_eq!(
            to_html(&dom).unwrap(),
            "<html><head></head><body><div><p>Hi</p></div></body></html>"
        );
    }

    #[test]
    fn test_compact_keeps_conditional_comments() {
        let mut dom = parse_html(
            "<html><head></head><body><!--[if lt IE 9]><script src=\"shiv.js\"></script><![endif]--> <!--x--></body></html>",
        );
        let body = body_of(&dom);
        compact(&mut dom, body);

        assert_eq!(
            to_html(&dom).unwrap(),
            "<html><head></head><body><!--[if lt IE 9]><script src=\"shiv.js\"></script><![endif]--></body></html>"
        );
    }

    #[test]
    fn test_strip_blank_text_between_head_and_body() {
        let mut dom = parse_html("<html>\n<head></head>\n<body></body></html>");
        let html = dom.child_element(dom.document(), "html").unwrap();
        strip_blank_text(&mut dom, html);
        assert_eq!(to_html(&dom).unwrap(), "<html><head></head><body></body></html>");
    }

    #[test]
    fn test_pretty_inserts_newlines_from_the_end() {
        let mut dom = parse_html("<html><head></head><body><p>a</p><p>b</p></body></html>");
        let body = body_of(&dom);
        pretty(&mut dom, body);

        assert_eq!(
            to_html(&dom).unwrap(),
            "<html><head></head><body>\n<p>a</p>\n<p>b</p></body></html>"
        );
    }

    #[test]
    fn test_pretty_trusts_existing_formatting() {
        let mut dom =
            parse_html("<html><head></head><body><p>a</p><p>b</p>\n<p>c</p><p>d</p></body></html>");
        let body = body_of(&dom);
        pretty(&mut dom, body);

        // Stops at <p>c</p>, which already starts a line; a and b are left alone
        assert_eq!(
            to_html(&dom).unwrap(),
            "<html><head></head><body><p>a</p><p>b</p>\n<p>c</p>\n<p>d</p></body></html>"
        );
    }

    #[test]
    fn test_pretty_is_stable() {
        let mut dom = parse_html("<html><head></head><body><p>a</p><p>b</p></body></html>");
        let body = body_of(&dom);
        pretty(&mut dom, body);
        let once = to_html(&dom).unwrap();
        pretty(&mut dom, body);
        assert_eq!(to_html(&dom).unwrap(), once);
    }
}

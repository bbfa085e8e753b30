//! Targeted rewriting of SceneGraph component XML.
//!
//! A component descriptor's `<script>` tags are the only part the lowering
//! step needs to touch: `uri=".../Foo.bs"` becomes `uri=".../Foo.brs"` and
//! `type="text/brighterscript"` becomes `type="text/brightscript"`. This is
//! not a general-purpose XML transform — everything else in the document
//! (comments, whitespace, interface/children elements) passes through byte
//! for byte, so there's no need for a full XML parser here.

/// One `<script>` tag's attributes, as read from a component document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub uri: String,
    pub type_attr: Option<String>,
}

/// The attributes and script references of a `<component>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentDoc {
    pub name: Option<String>,
    pub extends: Option<String>,
    pub scripts: Vec<ScriptTag>,
}

/// Reads a component document's `name`/`extends` attributes and every
/// `<script>` tag's `uri`/`type`. Tolerant of attribute order and
/// whitespace; does not validate well-formedness of the rest of the
/// document.
pub fn parse_component_doc(xml: &str) -> ComponentDoc {
    let mut doc = ComponentDoc::default();
    if let Some(&(start, end)) = tag_byte_ranges(xml, "component").first() {
        let tag = &xml[start..end];
        doc.name = attr(tag, "name");
        doc.extends = attr(tag, "extends");
    }
    for (start, end) in tag_byte_ranges(xml, "script") {
        let tag = &xml[start..end];
        doc.scripts.push(ScriptTag { uri: attr(tag, "uri").unwrap_or_default(), type_attr: attr(tag, "type") });
    }
    doc
}

/// Rewrites every `<script>` tag's `.bs` URI and `text/brighterscript` type
/// to their `.brs`/`text/brightscript` runtime equivalents. Everything
/// outside `<script ...>` tags is copied through unchanged.
pub fn rewrite_component_xml(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (start, end) in tag_byte_ranges(xml, "script") {
        out.push_str(&xml[cursor..start]);
        out.push_str(&rewrite_script_tag(&xml[start..end]));
        cursor = end;
    }
    out.push_str(&xml[cursor..]);
    out
}

fn rewrite_script_tag(tag: &str) -> String {
    let mut rewritten = tag.replace("text/brighterscript", "text/brightscript");
    if let Some(uri) = attr(&rewritten, "uri") {
        if let Some(stripped) = uri.strip_suffix(".bs") {
            let quoted_old = format!("\"{uri}\"");
            let quoted_new = format!("\"{stripped}.brs\"");
            rewritten = rewritten.replacen(&quoted_old, &quoted_new, 1);
        }
    }
    rewritten
}

/// Byte ranges of every `<name ...>` start tag in `xml`, matched tolerantly
/// (a following whitespace, `>`, or `/` after the name, so `<script` doesn't
/// also match a hypothetical `<scriptx`).
fn tag_byte_ranges(xml: &str, name: &str) -> Vec<(usize, usize)> {
    let open = format!("<{name}");
    let mut ranges = Vec::new();
    let mut search_from = 0;
    while let Some(rel_start) = xml[search_from..].find(&open) {
        let start = search_from + rel_start;
        let after = start + open.len();
        let boundary_ok = xml[after..].chars().next().map_or(true, |c| c.is_whitespace() || c == '>' || c == '/');
        if !boundary_ok {
            search_from = after;
            continue;
        }
        let Some(rel_end) = xml[start..].find('>') else { break };
        let end = start + rel_end + 1;
        ranges.push((start, end));
        search_from = end;
    }
    ranges
}

fn attr(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=\"");
    let idx = tag.find(&needle)?;
    let start = idx + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_component_name_extends_and_scripts() {
        let xml = r#"<component name="Widget" extends="Group">
            <script uri="pkg:/components/Widget.bs" type="text/brighterscript" />
            <children />
        </component>"#;
        let doc = parse_component_doc(xml);
        assert_eq!(doc.name.as_deref(), Some("Widget"));
        assert_eq!(doc.extends.as_deref(), Some("Group"));
        assert_eq!(doc.scripts.len(), 1);
        assert_eq!(doc.scripts[0].uri, "pkg:/components/Widget.bs");
        assert_eq!(doc.scripts[0].type_attr.as_deref(), Some("text/brighterscript"));
    }

    #[test]
    fn rewrites_bs_uri_and_brighterscript_type_leaving_the_rest_untouched() {
        let xml = r#"<component name="Widget">
            <script uri="pkg:/components/Widget.bs" type="text/brighterscript" />
        </component>"#;
        let rewritten = rewrite_component_xml(xml);
        assert!(rewritten.contains(r#"uri="pkg:/components/Widget.brs""#));
        assert!(rewritten.contains(r#"type="text/brightscript""#));
        assert!(rewritten.contains(r#"<component name="Widget">"#));
    }

    #[test]
    fn leaves_a_brs_script_tag_unchanged() {
        let xml = r#"<script uri="pkg:/components/Already.brs" type="text/brightscript" />"#;
        assert_eq!(rewrite_component_xml(xml), xml);
    }

    #[test]
    fn does_not_confuse_a_similarly_prefixed_tag_name() {
        let xml = r#"<scriptwrapper uri="Foo.bs"></scriptwrapper>"#;
        assert_eq!(rewrite_component_xml(xml), xml);
    }
}

//! Landmarks and Headings
//!
//! Implicit landmark roles, heading focus targets, skip links and the
//! landmark/heading cycling used by universal navigation.

use mfc_dom::{Document, DomError, DomTree, NodeId};

use crate::aria::AriaRole;
use crate::screen_reader::ReaderProfile;

/// Class carried by inserted skip links
pub const SKIP_LINK_CLASS: &str = "skip-link";
const MAIN_CONTENT_ID: &str = "main-content";

/// Role of an element: explicit `role`, else the implicit landmark of its tag
pub fn role_of(tree: &DomTree, id: NodeId) -> Option<AriaRole> {
    let elem = tree.element(id)?;
    match elem.attribute("role") {
        Some(role) => AriaRole::parse(role),
        None => AriaRole::implicit_landmark(&elem.tag),
    }
}

pub fn is_landmark(tree: &DomTree, id: NodeId) -> bool {
    role_of(tree, id).is_some_and(|r| r.is_landmark())
}

pub fn is_heading(tree: &DomTree, id: NodeId) -> bool {
    matches!(tree.tag_name(id), Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6"))
        || tree.attribute(id, "role").and_then(AriaRole::parse) == Some(AriaRole::Heading)
}

/// Landmarks in document order
pub fn landmarks(doc: &Document) -> Vec<NodeId> {
    doc.tree
        .descendants(doc.tree.root())
        .filter(|&id| is_landmark(&doc.tree, id))
        .collect()
}

/// Headings in document order
pub fn headings(doc: &Document) -> Vec<NodeId> {
    doc.tree
        .descendants(doc.tree.root())
        .filter(|&id| is_heading(&doc.tree, id))
        .collect()
}

/// Next (or previous) candidate relative to `current` in document order,
/// wrapping at either end.
pub fn cycle(doc: &Document, candidates: &[NodeId], current: Option<NodeId>, backwards: bool) -> Option<NodeId> {
    let (first, last) = (candidates.first().copied()?, candidates.last().copied()?);
    let Some(current) = current else {
        return Some(if backwards { last } else { first });
    };

    let mut before = None;
    let mut passed = false;
    for id in doc.tree.descendants(doc.tree.root()) {
        if id == current {
            passed = true;
            continue;
        }
        if !candidates.contains(&id) {
            continue;
        }
        if passed && !backwards {
            return Some(id);
        }
        if !passed {
            before = Some(id);
        }
    }

    if backwards { before.or(Some(last)) } else { Some(first) }
}

/// Add implicit landmark roles and heading focus targets. Returns the
/// number of elements changed.
pub fn augment(doc: &mut Document, profile: &ReaderProfile) -> Result<usize, DomError> {
    let root = doc.tree.root();
    let targets: Vec<(NodeId, Option<AriaRole>)> = doc
        .tree
        .descendants(root)
        .filter_map(|id| {
            let elem = doc.tree.element(id)?;
            let role = if elem.has_attribute("role") { None } else { AriaRole::implicit_landmark(&elem.tag) };
            let heading = profile.focusable_headings && is_heading(&doc.tree, id) && !elem.has_attribute("tabindex");
            (role.is_some() || heading).then_some((id, role))
        })
        .collect();

    for &(id, role) in &targets {
        match role {
            Some(role) => doc.tree.set_attribute(id, "role", role.as_str())?,
            None => doc.tree.set_attribute(id, "tabindex", "-1")?,
        }
    }
    tracing::debug!(changed = targets.len(), "landmarks augmented");
    Ok(targets.len())
}

/// Insert a skip link to the main landmark at the start of the body.
/// Returns `None` when there is no body or main landmark, or a skip link
/// already exists.
pub fn insert_skip_link(doc: &mut Document, label: &str) -> Result<Option<NodeId>, DomError> {
    let body = doc.body();
    if doc.tree.element(body).is_none() || existing_skip_link(doc).is_some() {
        return Ok(None);
    }
    let Some(main) = landmarks(doc)
        .into_iter()
        .find(|&id| role_of(&doc.tree, id) == Some(AriaRole::Main))
    else {
        return Ok(None);
    };

    let existing_id = doc.tree.attribute(main, "id").map(str::to_string);
    let target_id = match existing_id {
        Some(id) => id,
        None => {
            doc.tree.set_attribute(main, "id", MAIN_CONTENT_ID)?;
            MAIN_CONTENT_ID.to_string()
        }
    };

    let link = doc.tree.create_element("a");
    doc.tree.set_attribute(link, "href", &format!("#{target_id}"))?;
    doc.tree.set_attribute(link, "class", SKIP_LINK_CLASS)?;
    doc.tree.set_text_content(link, label)?;
    let first = doc.tree.get(body).map_or(NodeId::NONE, |n| n.first_child);
    doc.tree.insert_before(body, link, first)?;
    Ok(Some(link))
}

pub fn existing_skip_link(doc: &Document) -> Option<NodeId> {
    doc.tree
        .children(doc.body())
        .map(|(id, _)| id)
        .find(|&id| doc.tree.has_class(id, SKIP_LINK_CLASS))
}

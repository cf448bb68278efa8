//! Sample clinic page

use anyhow::Result;
use mfc_dom::{Document, NodeId};

/// Elements the scripted session interacts with
#[derive(Debug, Clone, Copy)]
pub struct PageHandles {
    pub book_button: NodeId,
    pub dialog: NodeId,
    pub patient_name: NodeId,
    pub cancel: NodeId,
}

/// Build the appointments page: header with navigation, main content with
/// formatted values, and a booking dialog.
pub fn clinic_page(url: &str) -> Result<(Document, PageHandles)> {
    let mut doc = Document::new(url);
    let body = doc.body();
    let tree = &mut doc.tree;

    let header = tree.create_element("header");
    let nav = tree.create_element("nav");
    tree.append_child(body, header)?;
    tree.append_child(header, nav)?;
    for (label, href) in [("Find a Doctor", "/doctors"), ("Appointments", "/appointments")] {
        let link = tree.create_element("a");
        tree.set_attribute(link, "href", href)?;
        tree.set_text_content(link, label)?;
        tree.append_child(nav, link)?;
    }

    let main = tree.create_element("main");
    tree.append_child(body, main)?;
    let heading = tree.create_element("h1");
    tree.set_text_content(heading, "Appointment Booking")?;
    tree.append_child(main, heading)?;

    for (kind, value) in [("date", "2026-11-03"), ("time", "14:30"), ("currency", "45")] {
        let span = tree.create_element("span");
        tree.set_attribute(span, "data-format", kind)?;
        tree.set_attribute(span, "data-value", value)?;
        tree.append_child(main, span)?;
    }

    let book_button = tree.create_element("button");
    tree.set_text_content(book_button, "Book appointment")?;
    tree.append_child(main, book_button)?;

    let footer = tree.create_element("footer");
    tree.append_child(body, footer)?;

    let dialog = tree.create_element("div");
    tree.set_attribute(dialog, "role", "dialog")?;
    tree.set_attribute(dialog, "aria-label", "Confirm booking")?;
    tree.append_child(body, dialog)?;

    let patient_name = tree.create_element("input");
    let clinic = tree.create_element("select");
    let confirm = tree.create_element("button");
    let cancel = tree.create_element("button");
    tree.set_text_content(confirm, "Confirm")?;
    tree.set_text_content(cancel, "Cancel")?;
    for child in [patient_name, clinic, confirm, cancel] {
        tree.append_child(dialog, child)?;
    }

    Ok((doc, PageHandles { book_button, dialog, patient_name, cancel }))
}

/// `data-format` elements and their current text
pub fn formatted_values(doc: &Document) -> Vec<(String, String)> {
    doc.tree
        .descendants(doc.tree.root())
        .filter_map(|id| {
            let kind = doc.tree.attribute(id, "data-format")?;
            Some((kind.to_string(), doc.tree.text_content(id)))
        })
        .collect()
}

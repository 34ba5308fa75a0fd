//! Two-pass template augmentation: sections the user filled in but the template
//! never laid out get a generic default section appended before rendering.
//!
//! The input template is shared and never touched; when something has to be added
//! the caller gets an owned deep copy.

use std::borrow::Cow;
use std::collections::BTreeSet;

use tracing::debug;

use crate::compose::defaults::default_section;
use crate::models::resume::ResumeData;
use crate::models::template::{NodeKind, Template, TemplateNode, TemplateRoot};

/// Section ids declared anywhere in the structure, looking through `sidebar` / `main`.
pub fn native_section_ids(root: &TemplateRoot) -> BTreeSet<&str> {
    let mut ids = BTreeSet::new();
    collect_section_ids(root.sections.as_deref().unwrap_or_default(), &mut ids);
    ids
}

fn collect_section_ids<'t>(nodes: &'t [TemplateNode], ids: &mut BTreeSet<&'t str>) {
    for node in nodes {
        match node.kind() {
            Some(NodeKind::Sidebar(layout) | NodeKind::Main(layout)) => {
                collect_section_ids(layout.sections.as_deref().unwrap_or_default(), ids)
            }
            _ => {
                if let Some(id) = node.section_id() {
                    ids.insert(id);
                }
            }
        }
    }
}

/// Returns `template` unchanged (borrowed) when it already covers every populated
/// section; otherwise a copy with default sections appended to the first top-level
/// `main` node, or to the root when there is none.
pub fn augment_template<'t>(template: &'t Template, data: &ResumeData) -> Cow<'t, Template> {
    let native = native_section_ids(&template.structure);
    let missing: Vec<TemplateNode> = data
        .populated_sections()
        .into_iter()
        .filter(|id| !native.contains(id))
        .filter_map(default_section)
        .collect();

    if missing.is_empty() {
        return Cow::Borrowed(template);
    }

    debug!(
        template_id = %template.id,
        added = ?missing.iter().filter_map(TemplateNode::section_id).collect::<Vec<_>>(),
        "augmenting template with default sections"
    );

    let mut augmented = template.clone();
    let sections = augmented.structure.sections.get_or_insert_with(Vec::new);
    let main = sections.iter_mut().find_map(|node| match node {
        TemplateNode::Known(NodeKind::Main(layout)) => Some(layout),
        _ => None,
    });
    match main {
        Some(layout) => layout.sections.get_or_insert_with(Vec::new).extend(missing),
        None => sections.extend(missing),
    }

    Cow::Owned(augmented)
}

use std::collections::HashMap;

use allpi_api::LayoutSource;
use allpi_core::{GalleryItem, Layout};

use crate::request::LayoutRequest;
use crate::resolver::LayoutResolver;

/// Items with a layout on every element, plus how the layouts were chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub items: Vec<GalleryItem>,
    pub source: LayoutSource,
    /// Items that received the rule layout because the resolver gave none.
    pub defaulted: usize,
}

/// Run `resolver` over `items` and attach a layout to each one.
///
/// This is the only place the fixed rule is applied as a fallback. Order and
/// length of `items` are preserved. Decisions for ids not in the input are
/// ignored; for repeated ids the first decision wins.
pub async fn apply_layouts(
    resolver: &dyn LayoutResolver,
    items: Vec<GalleryItem>,
) -> LayoutOutcome {
    if items.is_empty() {
        return LayoutOutcome {
            items,
            source: LayoutSource::Skipped,
            defaulted: 0,
        };
    }

    let requests: Vec<LayoutRequest> = items.iter().map(LayoutRequest::from_item).collect();
    let decided = match resolver.resolve(&requests).await {
        Ok(decisions) => {
            let mut decided: HashMap<String, Layout> = HashMap::with_capacity(decisions.len());
            for decision in decisions {
                decided.entry(decision.id).or_insert(decision.layout);
            }
            Some(decided)
        }
        Err(e) => {
            tracing::warn!(
                resolver = resolver.id(),
                kind = e.kind(),
                items = items.len(),
                "layout resolution failed, using rule for every item: {e}"
            );
            None
        }
    };

    let mut items = items;
    let mut defaulted = 0usize;
    for item in &mut items {
        let layout = match decided.as_ref().and_then(|d| d.get(item.id())) {
            Some(layout) => *layout,
            None => {
                defaulted += 1;
                Layout::default_for(item.kind())
            }
        };
        item.set_layout(layout);
    }

    let source = match decided {
        None => LayoutSource::Fallback,
        Some(_) if defaulted == 0 => resolver.source(),
        Some(_) => {
            tracing::debug!(
                resolver = resolver.id(),
                defaulted,
                total = items.len(),
                "resolver left items undecided"
            );
            LayoutSource::Partial
        }
    };

    LayoutOutcome {
        items,
        source,
        defaulted,
    }
}

use crate::request::LayoutRequest;

/// Shared preamble for both prompt shapes.
pub const LAYOUT_SYSTEM_PROMPT: &str = r#"You are a UI designer who lays out photo galleries.
Each gallery item is either a single image or a folder of images, and is shown
with one of two layouts: "horizontal" or "vertical".

RULES:
1. A single image is shown with a "vertical" layout.
2. A folder of images usually gets a "horizontal" layout so visitors can browse it.
3. Only ever answer "horizontal" or "vertical"."#;

/// Prompt asking for a layout for every item at once.
///
/// Expected answer: `{"itemsWithLayout": [{"id": "...", "layout": "..."}]}`.
pub fn build_batch_prompt(items: &[LayoutRequest]) -> String {
    let mut prompt = format!("{LAYOUT_SYSTEM_PROMPT}\n\nITEMS:\n");
    for item in items {
        prompt.push_str(&format!(
            "- ID: {}, Type: {}, Name: {}, Path: {}\n",
            item.id, item.kind, item.name, item.path
        ));
    }
    prompt.push_str(
        "\nRespond with ONLY a JSON object of the form \
         {\"itemsWithLayout\": [{\"id\": \"<item id>\", \"layout\": \"horizontal\" | \"vertical\"}]} \
         with one entry per item.",
    );
    prompt
}

/// Prompt for a single item, answered with a short reason.
///
/// Expected answer: `{"layoutStrategy": "...", "reason": "..."}`.
pub fn build_item_prompt(item: &LayoutRequest) -> String {
    let mut prompt = format!(
        "{LAYOUT_SYSTEM_PROMPT}\n\nLOCATION: {}\nEXTENSION: {}\nIS_FOLDER: {}",
        item.path,
        item.extension().as_deref().unwrap_or("none"),
        item.image_count.is_some(),
    );
    if let Some(count) = item.image_count {
        prompt.push_str(&format!("\nIMAGE_COUNT: {count}"));
    }
    prompt.push_str(
        "\n\nRespond with ONLY a JSON object with a \"layoutStrategy\" field \
         (\"horizontal\" or \"vertical\") and a one-sentence \"reason\" field.",
    );
    prompt
}

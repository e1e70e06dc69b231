/// Pull a JSON object out of model text.
///
/// Accepts a ```json fenced block, a plain fenced block, or the outermost
/// `{...}` span of bare text.
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body_start = start + "```json".len();
        if let Some(end) = text[body_start..].find("```") {
            return Some(text[body_start..body_start + end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let fence_end = start + 3;
        let body_start = text[fence_end..]
            .find('\n')
            .map(|i| fence_end + i + 1)
            .unwrap_or(fence_end);
        if let Some(end) = text[body_start..].find("```") {
            return Some(text[body_start..body_start + end].trim());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object() {
        assert_eq!(
            extract_json_object(r#"{"layoutStrategy":"vertical"}"#),
            Some(r#"{"layoutStrategy":"vertical"}"#)
        );
    }

    #[test]
    fn fenced_json_block() {
        let text = "Sure:\n```json\n{\"itemsWithLayout\": []}\n```\nDone.";
        assert_eq!(extract_json_object(text), Some("{\"itemsWithLayout\": []}"));
    }

    #[test]
    fn plain_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn prose_around_object() {
        let text = "Here you go: {\"a\": {\"b\": 2}} hope it helps";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn no_object() {
        assert_eq!(extract_json_object("horizontal"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}

use anyhow::ensure;

/// Removes a Markdown fence wrapping the whole answer (```markdown ... ``` or ``` ... ```).
/// Fences inside the text are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let mut inner = trimmed;
    match inner.split_once('\n') {
        Some((_, after_first)) => inner = after_first,
        None => return trimmed.trim_matches('`').trim(),
    }
    if let Some(body) = inner.trim_end().strip_suffix("```") {
        inner = body;
    }
    inner.trim()
}

pub fn clean_commentary(text: &str) -> anyhow::Result<String> {
    let cleaned = strip_code_fence(text);
    ensure!(!cleaned.is_empty(), "LLM returned empty commentary");
    Ok(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_wrapping_fence() {
        let body = "**Summary**\n\nGold led.";
        let fenced = format!("```markdown\n{body}\n```\n");
        assert_eq!(strip_code_fence(&fenced), body);
    }

    #[test]
    fn leaves_inline_fences_alone() {
        let s = "Intro\n```\ncode\n```\nOutro";
        assert_eq!(strip_code_fence(s), s);
    }

    #[test]
    fn handles_unterminated_fence() {
        assert_eq!(strip_code_fence("```\nBullish tone"), "Bullish tone");
    }

    #[test]
    fn empty_commentary_is_rejected() {
        assert!(clean_commentary("  \n ").is_err());
        assert!(clean_commentary("```\n```").is_err());
        assert_eq!(clean_commentary(" Neutral. ").unwrap(), "Neutral.");
    }
}

/// Prior-message lines included in a translation prompt. Older lines add
/// little and cost tokens.
const MAX_CONTEXT_LINES: usize = 5;

/// Build the translation prompt: auto-detect between Korean and Vietnamese,
/// translate into the other language, keep the register conversational, and
/// answer in the fixed JSON shape the parser expects.
pub fn translation_prompt(text: &str, context: &[String]) -> String {
    let context_block = if context.is_empty() {
        String::new()
    } else {
        let start = context.len().saturating_sub(MAX_CONTEXT_LINES);
        format!("\n\nPrevious conversation:\n{}", context[start..].join("\n"))
    };

    format!(
        r#"You are a professional Vietnamese-Korean translator for a chat app.

Task: Translate the following message naturally, considering the chat context.

Rules:
1. Auto-detect the source language (Korean or Vietnamese)
2. Translate to the other language
3. Keep the tone conversational and natural
4. Handle slang, idioms, and cultural expressions appropriately
5. Do NOT translate proper nouns (names, places) unless necessary
{context_block}

Message to translate:
"{text}"

Respond in JSON format only:
{{
  "translated": "...",
  "sourceLang": "ko" or "vi",
  "targetLang": "ko" or "vi"
}}"#
    )
}

pub fn detection_prompt(text: &str) -> String {
    format!(
        r#"Detect the language of this text. Reply with only: "ko" for Korean, "vi" for Vietnamese, or "unknown".

Text: "{text}""#
    )
}

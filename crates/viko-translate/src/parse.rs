use viko_types::models::{Detected, Translation};

use crate::TranslateError;

/// Locate the first balanced `{…}` fragment in free-form model output.
///
/// The model is asked for JSON only but routinely wraps it in prose or a
/// code fence. Brace depth is tracked outside string literals, with escape
/// handling, so braces inside translated text don't truncate the fragment.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Decode the model's reply into the strict translation result.
pub fn parse_translation(raw: &str) -> Result<Translation, TranslateError> {
    let fragment = extract_json_object(raw)
        .ok_or_else(|| TranslateError::Format("no JSON object in model output".into()))?;

    let translation: Translation =
        serde_json::from_str(fragment).map_err(|e| TranslateError::Format(e.to_string()))?;

    // A successful translation crosses the language pair.
    if translation.source_lang == translation.target_lang {
        return Err(TranslateError::Format(format!(
            "source and target language are both {}",
            translation.source_lang.as_str()
        )));
    }

    Ok(translation)
}

/// Degrade free-form detector output to the three valid labels.
pub fn normalize_detected(raw: &str) -> Detected {
    match raw.trim().to_lowercase().as_str() {
        "ko" => Detected::Ko,
        "vi" => Detected::Vi,
        _ => Detected::Unknown,
    }
}

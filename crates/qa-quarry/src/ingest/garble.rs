//! Mojibake detection for extracted text
//!
//! PDF extraction can silently produce garbage when a font lacks a usable
//! ToUnicode map or the byte stream is decoded with the wrong encoding.
//! These heuristics catch the common failure shapes so the reader can fall
//! back to another extraction method.

/// Decide whether extracted text is unusable mojibake.
///
/// Text containing CJK ideographs is expected to be dominated by them: a
/// low ideograph ratio or a high control-character ratio marks a broken
/// extraction. Text without ideographs is flagged on excessive non-ASCII.
/// Empty or whitespace-only input has nothing suspicious in it and is not
/// garbled.
pub fn is_garbled(text: &str) -> bool {
    let total = text.chars().count().max(1) as f64;
    let cjk = text.chars().filter(|c| is_cjk(*c)).count();
    let control = text.chars().filter(|c| is_control_like(*c)).count();

    if cjk > 0 {
        let cjk_ratio = cjk as f64 / total;
        let control_ratio = control as f64 / total;
        cjk_ratio < 0.2 || control_ratio > 0.3
    } else {
        let non_ascii = text.chars().filter(|c| (*c as u32) > 127).count();
        non_ascii as f64 / total > 0.3
    }
}

/// CJK Unified Ideographs block
fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// ASCII controls and space, ideographic space, and the replacement character
fn is_control_like(c: char) -> bool {
    c <= '\u{20}' || c == '\u{3000}' || c == '\u{fffd}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_chinese_text_passes() {
        assert!(!is_garbled("你好世界"));
        assert!(!is_garbled("Rust 是一种系统编程语言"));
    }

    #[test]
    fn test_clean_english_text_passes() {
        assert!(!is_garbled("Hello, world."));
        assert!(!is_garbled("The quick brown fox jumps over the lazy dog."));
    }

    #[test]
    fn test_replacement_characters_flagged() {
        assert!(is_garbled("\u{fffd}\u{fffd}\u{fffd}"));

        // a sea of replacement characters with a few real ideographs is
        // still a broken extraction
        let text = "\u{fffd}".repeat(1000) + "中文抽取点";
        assert!(is_garbled(&text));
    }

    #[test]
    fn test_long_chinese_paragraph_passes() {
        let text = "文档处理流程包括解析分块与抽取。".repeat(63);
        assert!(text.chars().count() > 1000);
        assert!(!is_garbled(&text));
    }

    #[test]
    fn test_sparse_cjk_flagged() {
        // one ideograph among ten characters reads as a broken extraction
        assert!(is_garbled("中abcdefghi"));
    }

    #[test]
    fn test_control_heavy_cjk_flagged() {
        let text = "中文中文\u{0}\u{0}\u{0}\u{0}\u{0}\u{0}";
        assert!(is_garbled(text));
    }

    #[test]
    fn test_empty_and_whitespace_pass() {
        // zero characters of any class; the length clamp keeps the
        // ratios at zero instead of dividing by zero
        assert!(!is_garbled(""));
        assert!(!is_garbled("   \n\t  "));
    }

    #[test]
    fn test_accented_latin_past_threshold_flagged() {
        // no ideographs and far more than 30% non-ASCII
        assert!(is_garbled("ÃƒÂ©ÃƒÂ¨ÃƒÂ±"));
    }
}

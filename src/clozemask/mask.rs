//! Mask generation: the single text transformation this crate performs.
//!
//! Only the first occurrence of the word is masked. Later occurrences are
//! left as they are.

pub const DEFAULT_MASK: &str = "◼◼◼";

/// Returns `sentence` with the first literal, case-sensitive occurrence of
/// `word` replaced by `mask`, or `None` when there is nothing to mask.
pub fn generate(sentence: &str, word: &str, mask: &str) -> Option<String> {
    if sentence.is_empty() || word.is_empty() {
        return None;
    }

    let start = sentence.find(word)?;
    let end = start + word.len();

    let mut masked = String::with_capacity(sentence.len() - word.len() + mask.len());
    masked.push_str(&sentence[..start]);
    masked.push_str(mask);
    masked.push_str(&sentence[end..]);
    Some(masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_japanese_word() {
        assert_eq!(
            generate("彼は学校に行きます", "学校", DEFAULT_MASK).as_deref(),
            Some("彼は◼◼◼に行きます")
        );
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        assert_eq!(
            generate("the cat saw the cat", "cat", "___").as_deref(),
            Some("the ___ saw the cat")
        );
    }

    #[test]
    fn search_is_case_sensitive() {
        assert_eq!(generate("Cat and cat", "cat", "_").as_deref(), Some("Cat and _"));
        assert_eq!(generate("Cat", "cat", "_"), None);
    }

    #[test]
    fn word_is_matched_literally() {
        assert_eq!(generate("a.b a+b", "a+b", "X").as_deref(), Some("a.b X"));
        assert_eq!(generate("aXb", "a.b", "X"), None);
    }

    #[test]
    fn empty_inputs_are_not_applicable() {
        assert_eq!(generate("", "word", "X"), None);
        assert_eq!(generate("sentence", "", "X"), None);
    }

    #[test]
    fn absent_word_is_not_applicable() {
        assert_eq!(generate("彼は学校に行きます", "存在しない", DEFAULT_MASK), None);
    }

    #[test]
    fn surrounding_text_is_positionally_unchanged() {
        let sentence = "αβγ word δεζ word";
        let masked = generate(sentence, "word", "##").unwrap();
        let start = sentence.find("word").unwrap();
        assert_eq!(&masked[..start], &sentence[..start]);
        assert_eq!(&masked[start..start + 2], "##");
        assert_eq!(&masked[start + 2..], &sentence[start + 4..]);
    }

    #[test]
    fn whole_sentence_match_yields_mask() {
        assert_eq!(generate("学校", "学校", "[...]").as_deref(), Some("[...]"));
    }

    #[test]
    fn empty_mask_deletes_the_word() {
        assert_eq!(generate("one two three", "two ", "").as_deref(), Some("one three"));
    }
}

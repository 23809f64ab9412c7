// Test fuzzy alignment of whole-song translations onto visible blocks

use translator_wasm::{align_lines, normalize, VocalBlock, VoiceRole};

fn visible(texts: &[&str]) -> Vec<VocalBlock<u32>> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| VocalBlock {
            handle: i as u32,
            text: text.to_string(),
            role: VoiceRole::Lead,
            is_last: false,
        })
        .collect()
}

#[test]
fn test_exact_match_has_full_confidence() {
    let blocks = visible(&["Hello there"]);
    let map = align_lines("Hello there\nGoodbye now", "Hola alli\nAdios ahora", &blocks);

    let entry = map.get(&normalize("Hello there")).expect("entry for visible block");
    assert!(entry.matched);
    assert_eq!(entry.confidence, 1.0);
    assert_eq!(entry.translation.as_deref(), Some("Hola alli"));
}

#[test]
fn test_translation_taken_at_matched_index() {
    let blocks = visible(&["Goodbye now"]);
    let map = align_lines("Hello there\nGoodbye now", "Hola alli\nAdios ahora", &blocks);

    let entry = map.get(&normalize("Goodbye now")).unwrap();
    assert_eq!(entry.translation.as_deref(), Some("Adios ahora"));
}

#[test]
fn test_weak_token_overlap_stays_unmatched() {
    // 1 of 3 significant tokens in common: score ~0.33, below threshold
    let blocks = visible(&["morning sunshine smile"]);
    let map = align_lines(
        "evening rainfall smile\nsomething else entirely",
        "tarde lluvia sonrisa\notra cosa totalmente",
        &blocks,
    );

    let entry = map.get(&normalize("morning sunshine smile")).unwrap();
    assert!(!entry.matched, "score below 0.4 must not match");
    assert_eq!(entry.confidence, 0.0);
    assert!(entry.translation.is_none());
}

#[test]
fn test_containment_raises_score_to_floor() {
    // The rendered block is a fragment of a longer source line
    let blocks = visible(&["I want you"]);
    let map = align_lines(
        "I want you to stay with me tonight\nAnother line here",
        "Quiero que te quedes conmigo esta noche\nOtra linea aqui",
        &blocks,
    );

    let entry = map.get(&normalize("I want you")).unwrap();
    assert!(entry.matched, "containment boosts the fragment above threshold");
    assert!(entry.confidence >= 0.7);
    assert_eq!(
        entry.translation.as_deref(),
        Some("Quiero que te quedes conmigo esta noche")
    );
}

#[test]
fn test_empty_translation_yields_empty_map() {
    let blocks = visible(&["Hello there"]);
    let map = align_lines("Hello there", "   ", &blocks);
    assert!(map.is_empty());
}

#[test]
fn test_index_out_of_range_degrades_to_unmatched() {
    // Source has two lines, translation only one: a match on the second
    // source line has no corresponding translated line
    let blocks = visible(&["Goodbye now"]);
    let map = align_lines("Hello there\nGoodbye now", "Hola alli", &blocks);

    let entry = map.get(&normalize("Goodbye now")).unwrap();
    assert!(!entry.matched, "line-count mismatch degrades gracefully");
    assert!(entry.translation.is_none());
}

#[test]
fn test_ties_keep_the_first_seen_candidate() {
    // Both source lines contain the block verbatim; same score for both
    let blocks = visible(&["take my hand"]);
    let map = align_lines(
        "take my hand tonight\ntake my hand forever",
        "toma mi mano esta noche\ntoma mi mano para siempre",
        &blocks,
    );

    let entry = map.get(&normalize("take my hand")).unwrap();
    assert!(entry.matched);
    assert_eq!(
        entry.translation.as_deref(),
        Some("toma mi mano esta noche"),
        "equal scores must not displace the earlier candidate"
    );
}

#[test]
fn test_short_accented_words_carry_no_signal() {
    // "tú" is two characters but three bytes; it must be dropped like any
    // other two-letter word, so sharing only it never produces a match
    let blocks = visible(&["tú bailas"]);
    let map = align_lines(
        "tú cantas\nalgo totalmente distinto",
        "you sing\nsomething else entirely",
        &blocks,
    );

    let entry = map.get(&normalize("tú bailas")).unwrap();
    assert!(!entry.matched, "a shared two-character word is not signal");
    assert!(entry.translation.is_none());
}

#[test]
fn test_normalization_is_idempotent() {
    for input in ["Hello, World!", "  a \t b ", "don't", "¡Hola!", ""] {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "normalize must be idempotent for {input:?}");
    }
}

#[test]
fn test_matching_ignores_punctuation_and_case() {
    let blocks = visible(&["hello there"]);
    let map = align_lines("Hello, there!\nGoodbye now", "Hola alli\nAdios ahora", &blocks);

    let entry = map.get("hello there").unwrap();
    assert!(entry.matched);
    assert_eq!(entry.confidence, 1.0);
}

use phrasebook_types::Phrase;
use unicode_normalization::UnicodeNormalization;

/// Case-fold for matching: NFC first so composed and decomposed input compare equal
pub fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Whether any of the four searchable fields contains an already folded term
pub fn matches(phrase: &Phrase, folded_term: &str) -> bool {
    [
        &phrase.source,
        &phrase.gloss,
        &phrase.target,
        &phrase.pronunciation,
    ]
    .into_iter()
    .any(|field| fold(field).contains(folded_term))
}

/// Positions of matching phrases, in store order. An empty term keeps everything.
pub fn filter_indices(phrases: &[Phrase], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return (0..phrases.len()).collect();
    }

    let folded = fold(term);
    phrases
        .iter()
        .enumerate()
        .filter(|(_, phrase)| matches(phrase, &folded))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter<'a>(phrases: &'a [Phrase], term: &str) -> Vec<&'a Phrase> {
    filter_indices(phrases, term)
        .into_iter()
        .map(|i| &phrases[i])
        .collect()
}

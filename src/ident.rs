/// Turns a Unicode name or alias into a PascalCase identifier.
///
/// Hyphens count as word separators. A name that is a single word is
/// returned untouched, casing included, so `"SPACE"` stays `"SPACE"`.
/// Anything longer is title-cased word by word and joined:
/// `"LATIN SMALL LETTER A"` becomes `"LatinSmallLetterA"`. Blank input
/// yields an empty string.
pub fn pascal_case(name: &str) -> String {
    let spaced = name.replace('-', " ");
    let words: Vec<&str> = spaced.split_whitespace().collect();

    match words.as_slice() {
        [] => String::new(),
        [word] => word.to_string(),
        words => {
            let mut out = String::with_capacity(spaced.len());
            for word in words {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            out
        }
    }
}

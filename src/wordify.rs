/// Turns a compact identifier into a spaced display label.
///
/// Spaces already present are removed first. A space is then inserted before
/// every ASCII uppercase letter that follows a lowercase letter, and before
/// every uppercase letter that follows any character and precedes a lowercase
/// letter. Acronym runs stay together unless a word starts inside them.
///
/// # Examples
///
/// ```
/// use smart_enumerations::wordify;
///
/// assert_eq!(wordify("NetIncomeAfterTax"), "Net Income After Tax");
/// assert_eq!(wordify("ABCDef"), "ABC Def");
/// assert_eq!(wordify("ABC"), "ABC");
/// assert_eq!(wordify(""), "");
/// ```
pub fn wordify(s: &str) -> String {
    let chars: Vec<char> = s.chars().filter(|&c| c != ' ').collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 2);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            // "any character" excludes a line break, as in a regex `.`
            if prev.is_ascii_lowercase() || (prev != '\n' && next_is_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}

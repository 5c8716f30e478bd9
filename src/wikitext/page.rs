use regex::Regex;

/// Default title prefix of the per-gene infobox templates.
pub const PAGE_PREFIX: &str = "Template:PBB/";

/// False when the page opts out of edits by `bot_name` (`{{nobots}}`,
/// `{{bots|deny=...}}` and friends).
pub fn bots_allowed(text: &str, bot_name: &str) -> bool {
    let pattern = format!(
        r"\{{\{{(nobots|bots\|(allow=none|deny=.*?{}.*?|optout=all|deny=all))\}}\}}",
        regex::escape(bot_name)
    );
    let exclusion = Regex::new(&pattern).expect("regex for bot exclusion");
    !exclusion.is_match(text)
}

/// Entrez gene id encoded in a title such as `Template:PBB/672`.
pub fn entrez_from_title(title: &str, page_prefix: &str) -> Option<u64> {
    let start = title.find(page_prefix)? + page_prefix.len();
    let digits: String = title[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

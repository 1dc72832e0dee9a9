use once_cell::sync::Lazy;
use regex::Regex;

static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\*\*(.*?)\*\*", "<b>$1</b>"),
        (r"\*(.*?)\*", "<i>$1</i>"),
        (r"__(.*?)__", "<u>$1</u>"),
        (r"~~(.*?)~~", "<s>$1</s>"),
        (r"`(.*?)`", "<code>$1</code>"),
        (r"\[([^\]]+)\]\(([^)]+)\)", r#"<a href="$2">$1</a>"#),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
        Ok(re) => Some((re, replacement)),
        Err(err) => {
            log::error!("invalid markup pattern {}: {}", pattern, err);
            None
        }
    })
    .collect()
});

/// Lightweight markdown to Telegram HTML. Other characters pass through untouched.
pub(super) fn to_html(text: &str) -> String {
    let mut out = text.to_string();
    for (re, replacement) in RULES.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Normalize the tail of a SQL text: drop trailing line breaks, end with
/// exactly one `;`, then exactly one `\n`.
///
/// Only the tail is touched, so two texts that differ solely in how they end
/// compare equal afterwards. Applying it twice is the same as applying it once.
pub fn standardize(sql: &str) -> String {
    let body = sql
        .trim_end_matches(['\n', '\r'])
        .trim_end_matches(';');
    let mut out = String::with_capacity(body.len() + 2);
    out.push_str(body);
    out.push_str(";\n");
    out
}

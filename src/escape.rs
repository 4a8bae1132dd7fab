/// Escapes the characters HTML reserves, plus `/`.
pub fn html_escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            '/' => output.push_str("&#x2F;"),
            _ => output.push(c)
        }
    }
    output
}

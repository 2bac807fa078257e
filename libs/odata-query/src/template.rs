//! String helpers shared by the filter handlers.

/// Substitute positional `{N}` placeholders with `args[N]`.
///
/// Placeholders whose index is out of range, and braces that do not enclose a decimal index,
/// are copied through unchanged.
#[must_use]
pub fn format_template(template: &str, args: &[&str]) -> String {
    let extra: usize = args.iter().map(|a| a.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index = &after[..close];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let arg = args.get(index.parse::<usize>().ok()?)?;
            Some((*arg, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Double embedded single quotes, the `OData` string-literal escape.
#[must_use]
pub fn escape_string_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Percent-encode a value for inclusion in a URL query component.
#[must_use]
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Join the non-empty fragments with ` or `.
#[must_use]
pub fn join_or<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_non_empty(fragments, " or ")
}

/// Join the non-empty fragments with ` and `.
#[must_use]
pub fn join_and<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join_non_empty(fragments, " and ")
}

fn join_non_empty<I, S>(fragments: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str(sep);
        }
        out.push_str(fragment);
    }
    out
}

use crate::value::Value;

pub const DEFAULT_LINE_BREAK: &str = " \\\n";
pub const DEFAULT_INDENT: usize = 4;
pub const DEFAULT_KEY_VALUE_DELIMITER: &str = "=";

fn escape(value: &str, quote_escape: bool) -> String {
    if quote_escape {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn line_break(line_break: &str, indent: usize) -> String {
    format!("{line_break}{}", " ".repeat(indent))
}

/// Joins `items` with `line_break` followed by `indent` spaces.
pub fn list_with_conditional_line_breaks<I, S>(
    items: I,
    line_break_with: &str,
    indent: usize,
    quote_escape: bool,
) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| escape(item.as_ref(), quote_escape))
        .collect::<Vec<_>>()
        .join(&line_break(line_break_with, indent))
}

/// Same as [`list_with_conditional_line_breaks`] over `key<delimiter>value`
/// pairs, in the order given.
pub fn dict_with_conditional_line_breaks<I, K, V>(
    pairs: I,
    delimiter: &str,
    line_break_with: &str,
    indent: usize,
    quote_escape: bool,
) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let pairs = pairs.into_iter().map(|(key, value)| {
        format!(
            "{}{delimiter}{}",
            escape(key.as_ref(), quote_escape),
            escape(value.as_ref(), quote_escape)
        )
    });
    list_with_conditional_line_breaks(pairs, line_break_with, indent, false)
}

/// Input to [`str_join_with_conditional_delimiter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parts<'a> {
    Text(&'a str),
    List(Vec<Option<&'a str>>),
}

impl<'a> From<&'a str> for Parts<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<Vec<Option<&'a str>>> for Parts<'a> {
    fn from(value: Vec<Option<&'a str>>) -> Self {
        Self::List(value)
    }
}

impl<'a, const N: usize> From<[Option<&'a str>; N]> for Parts<'a> {
    fn from(value: [Option<&'a str>; N]) -> Self {
        Self::List(value.to_vec())
    }
}

/// Returns text unchanged; joins a list with `delimiter`, skipping missing
/// and empty parts.
pub fn str_join_with_conditional_delimiter<'a>(
    parts: impl Into<Parts<'a>>,
    delimiter: &str,
) -> String {
    match parts.into() {
        Parts::Text(text) => text.to_string(),
        Parts::List(parts) => parts
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(delimiter),
    }
}

/// Encodes values as an exec-form JSON array: `["a", "b"]`.
pub fn json_array(items: &[Value]) -> String {
    let encoded = items
        .iter()
        .map(|item| item.to_json().to_string())
        .collect::<Vec<_>>();
    format!("[{}]", encoded.join(", "))
}

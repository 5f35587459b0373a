/// Picks the first candidate whose trimmed text is non-empty.
///
/// Candidates are given in priority order; `None` stands for a selector that
/// matched nothing in the node.
pub fn first_label<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|text| text.as_ref().trim().to_string())
        .find(|text| !text.is_empty())
}

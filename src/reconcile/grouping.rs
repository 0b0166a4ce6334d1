//! Numbered channel grouping
//!
//! Collapses numbered variants of the same channel into ranges so a match
//! listing reads `Viaplay Sports 1-3` instead of three separate entries.
//! Groups keep the order in which they were first seen.

use indexmap::IndexMap;

/// A channel name split into base, trailing number and optional trailing tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedName<'a> {
    /// Name before the number, without trailing whitespace
    pub base: &'a str,
    pub number: u32,
    /// Trailing parenthesized tag such as `(MENA)`, kept verbatim
    pub tag: Option<&'a str>,
}

/// Split `"<base> <digits>"` or `"<base> <digits> (<tag>)"`.
///
/// Returns `None` when the name has no usable trailing number: no digits,
/// nothing before the digits, a leading zero (`"Sport 01"`), a zero value,
/// a value that does not fit `u32`, or an already grouped range
/// (`"Sport 1-3"`). Such names are grouped verbatim.
pub fn split_numbered_suffix(name: &str) -> Option<NumberedName<'_>> {
    let name = name.trim();
    let (head, tag) = split_trailing_tag(name);

    let digit_count = head.bytes().rev().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let digits_start = head.len() - digit_count;
    let base = head[..digits_start].trim_end();
    let digits = &head[digits_start..];
    if base.is_empty() || base.ends_with('-') || digits.starts_with('0') {
        return None;
    }

    let number = digits.parse::<u32>().ok()?;
    Some(NumberedName { base, number, tag })
}

fn split_trailing_tag(name: &str) -> (&str, Option<&str>) {
    if !name.ends_with(')') {
        return (name, None);
    }
    match name.rfind('(') {
        Some(open) => {
            let head = name[..open].trim_end();
            if head.is_empty() {
                (name, None)
            } else {
                (head, Some(&name[open..]))
            }
        }
        None => (name, None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Plain(String),
    Numbered { base: String, tag: Option<String> },
}

/// Collapse numbered channel variants into ranges.
///
/// * `{"Sport 1", "Sport 2", "Sport 3"}` becomes `["Sport 1-3"]`
/// * `{"Sport 1", "Sport 3"}` stays `["Sport 1", "Sport 3"]`
/// * names without a trailing number pass through unchanged
pub fn group_channels<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: IndexMap<GroupKey, Vec<u32>> = IndexMap::new();

    for name in names {
        let name = name.as_ref().trim();
        match split_numbered_suffix(name) {
            Some(numbered) => groups
                .entry(GroupKey::Numbered {
                    base: numbered.base.to_string(),
                    tag: numbered.tag.map(str::to_string),
                })
                .or_default()
                .push(numbered.number),
            None => {
                groups.entry(GroupKey::Plain(name.to_string())).or_default();
            }
        }
    }

    let mut result = Vec::with_capacity(groups.len());
    for (key, mut numbers) in groups {
        match key {
            GroupKey::Plain(name) => result.push(name),
            GroupKey::Numbered { base, tag } => {
                numbers.sort_unstable();
                numbers.dedup();
                let suffix = tag.map(|t| format!(" {t}")).unwrap_or_default();

                match (numbers.first(), numbers.last()) {
                    (Some(&min), Some(&max)) if numbers.len() > 1 && is_contiguous(&numbers) => {
                        result.push(format!("{base} {min}-{max}{suffix}"));
                    }
                    _ => {
                        for n in &numbers {
                            result.push(format!("{base} {n}{suffix}"));
                        }
                    }
                }
            }
        }
    }

    result
}

/// `numbers` must be sorted and deduplicated
fn is_contiguous(numbers: &[u32]) -> bool {
    match (numbers.first(), numbers.last()) {
        (Some(&min), Some(&max)) => (max - min) as usize + 1 == numbers.len(),
        _ => false,
    }
}

/// Grouped channel names joined the way match records store them
pub fn join_grouped<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    group_channels(names).join(", ")
}

use serde::Serialize;

/// A named predicate plus the sentence it contributes. Tables are evaluated
/// top to bottom and their order is what pages render.
pub struct Rule<I> {
    pub name: &'static str,
    pub applies: fn(&I) -> bool,
    pub fragment: fn(&I) -> String,
}

/// One generated sentence and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub rule: &'static str,
    pub text: String,
}

pub fn evaluate<I>(rules: &[Rule<I>], input: &I) -> Vec<Fragment> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(input))
        .map(|rule| Fragment {
            rule: rule.name,
            text: (rule.fragment)(input),
        })
        .collect()
}

/// Space-joined fragments, or `fallback` when no rule fired.
pub fn join_or(fragments: &[Fragment], fallback: impl FnOnce() -> String) -> String {
    if fragments.is_empty() {
        return fallback();
    }
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

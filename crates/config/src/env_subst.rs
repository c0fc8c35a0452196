//! `${VAR}` expansion in raw config text, applied before parsing.

/// Expand `${VAR}` and `${VAR:-default}` placeholders from the process
/// environment. Placeholders that resolve to nothing stay in the text.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}').filter(|&end| end > 0) else {
            // Unterminated or empty placeholder: copy the opener and move on.
            out.push_str("${");
            rest = after;
            continue;
        };

        let placeholder = &after[..end];
        let (name, default) = placeholder
            .split_once(":-")
            .map_or((placeholder, None), |(n, d)| (n, Some(d)));

        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(default.unwrap_or(&rest[start..start + end + 3])),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "QUILL_PORT" => Some("4000".to_string()),
            _ => None,
        }
    }

    #[test]
    fn substitutes_known_var() {
        assert_eq!(
            substitute_env_with("port = ${QUILL_PORT}", lookup),
            "port = 4000"
        );
    }

    #[test]
    fn unknown_var_without_fallback_is_kept() {
        assert_eq!(
            substitute_env_with("bind = \"${QUILL_NOPE}\"", lookup),
            "bind = \"${QUILL_NOPE}\""
        );
    }

    #[test]
    fn fallback_applies_only_when_unset() {
        assert_eq!(substitute_env_with("${QUILL_NOPE:-3000}", lookup), "3000");
        assert_eq!(substitute_env_with("${QUILL_PORT:-3000}", lookup), "4000");
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(substitute_env_with("a ${OPEN", lookup), "a ${OPEN");
        assert_eq!(substitute_env_with("cost $5", lookup), "cost $5");
    }
}

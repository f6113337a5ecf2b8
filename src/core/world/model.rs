use std::path::PathBuf;

const VALID_NAME_CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789-_.";

/// A server world living under `worlds/<name>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    pub name: String,
    pub path: PathBuf,
}

/// Lowercase `name`, replace anything outside `[a-z0-9-_.]` with `_` and
/// collapse runs of `_`.
pub fn normalize_world_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars().map(|c| c.to_ascii_lowercase()) {
        let c = if VALID_NAME_CHARS.contains(c) { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_names() {
        assert_eq!(normalize_world_name("survival-1.20"), "survival-1.20");
    }

    #[test]
    fn replaces_and_collapses_invalid_chars() {
        assert_eq!(normalize_world_name("My World!!"), "my_world_");
        assert_eq!(normalize_world_name("a  /  b"), "a_b");
        assert_eq!(normalize_world_name("a__b"), "a_b");
        assert_eq!(normalize_world_name("mundo ñ"), "mundo_");
    }

    #[test]
    fn only_invalid_chars_leave_a_single_underscore() {
        assert_eq!(normalize_world_name("???"), "_");
        assert_eq!(normalize_world_name(""), "");
    }
}

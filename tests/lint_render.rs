//! Lints over each game's `render.rs`.
//!
//! 1. Bracket-key text (`[X]`) must be rendered with `push_clickable()`.
//!    `cl.push(Line::from("... [P] ..."))` shows a button that cannot be
//!    tapped, which is a common source of mobile bugs.
//! 2. Every action ID declared in a game's `actions.rs` must be referenced
//!    by its `render.rs`, otherwise the action is reachable by keyboard only.

use std::fs;
use std::path::{Path, PathBuf};

/// Check if a string contains a bracket-key pattern like `[P]`, `[1]`, `[-]`.
fn contains_bracket_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 3 {
        return false;
    }
    for i in 0..bytes.len() - 2 {
        if bytes[i] == b'[' && bytes[i + 2] == b']' {
            let ch = bytes[i + 1];
            if ch.is_ascii_alphanumeric() || b"-=!~|\\".contains(&ch) {
                return true;
            }
        }
    }
    false
}

/// Lines with a non-clickable `push(` whose text contains a bracket key.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && contains_bracket_key(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

/// Names of `pub const X: u16` declarations.
fn action_names(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("pub const ")?;
            let (name, ty) = rest.split_once(':')?;
            ty.trim_start()
                .starts_with("u16")
                .then(|| name.trim().to_string())
        })
        .collect()
}

/// True if `name` appears in `source` as a whole identifier.
fn references(source: &str, name: &str) -> bool {
    source.match_indices(name).any(|(at, _)| {
        let before = source[..at].chars().next_back();
        let after = source[at + name.len()..].chars().next();
        let ident = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
        !ident(before) && !ident(after)
    })
}

fn game_dirs() -> Vec<PathBuf> {
    let games_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games");
    let Ok(entries) = fs::read_dir(&games_dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.join("render.rs").is_file())
        .collect();
    dirs.sort();
    dirs
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let mut msg = String::new();
    for dir in game_dirs() {
        let path = dir.join("render.rs");
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        for (line_num, line) in find_bracket_key_in_push(&source) {
            msg.push_str(&format!("  {}:{}: {}\n", path.display(), line_num, line));
        }
    }
    assert!(
        msg.is_empty(),
        "Found bracket-key text [X] in non-clickable cl.push() calls.\n\
         Use push_clickable() instead.\n\n{}",
        msg
    );
}

#[test]
fn every_action_is_rendered() {
    let dirs = game_dirs();
    assert!(!dirs.is_empty(), "no games with render.rs found");

    let mut missing = Vec::new();
    for dir in dirs {
        let (Ok(actions), Ok(render)) = (
            fs::read_to_string(dir.join("actions.rs")),
            fs::read_to_string(dir.join("render.rs")),
        ) else {
            continue;
        };
        for name in action_names(&actions) {
            if !references(&render, &name) {
                missing.push(format!("{}: {}", dir.display(), name));
            }
        }
    }
    assert!(
        missing.is_empty(),
        "Actions without a click target in render.rs:\n  {}",
        missing.join("\n  ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [P]占う  [H]履歴"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [P] 占う"), START_GAME);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [P]占う"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[P]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[PP]"));
        assert!(!contains_bracket_key("[{}]"));
    }

    #[test]
    fn parses_action_names() {
        let source = "// ── Setup ──\npub const START_GAME: u16 = 31;\npub const LIMIT: usize = 3;\n";
        assert_eq!(action_names(source), vec!["START_GAME".to_string()]);
    }

    #[test]
    fn reference_requires_whole_identifier() {
        let render = "cl.push_clickable(line, STEP_DIGIT_BASE + d);";
        assert!(references(render, "STEP_DIGIT_BASE"));
        assert!(!references(render, "STEP_DIGIT"));
        assert!(!references(render, "DIGIT_BASE"));
    }
}

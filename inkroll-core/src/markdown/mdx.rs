//! MDX acceptance: strip ESM and JSX-comment constructs.
//!
//! MDX documents are Markdown plus JavaScript module statements and JSX.
//! The pipeline does not evaluate components; it removes the module-level
//! statements and JSX comments and hands the remainder to the CommonMark
//! parser. JSX elements left in the body flow through as inline HTML.

use regex::Regex;
use std::sync::OnceLock;

static JSX_COMMENT: OnceLock<Regex> = OnceLock::new();

fn jsx_comment_regex() -> &'static Regex {
    JSX_COMMENT.get_or_init(|| Regex::new(r"(?s)\{\s*/\*.*?\*/\s*\}").unwrap())
}

/// Strip top-level `import`/`export` statements and `{/* ... */}` comments.
///
/// Statements inside fenced code blocks are left untouched.
pub fn strip_mdx_constructs(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_fence = false;
    let mut in_esm = false;
    let mut brace_depth: i32 = 0;

    for line in source.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if in_fence {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if in_esm {
            brace_depth += brace_delta(line);
            if brace_depth <= 0 && statement_ends(line) {
                in_esm = false;
            }
            continue;
        }

        if trimmed.starts_with("import ")
            || trimmed.starts_with("export ")
            || trimmed == "import"
            || trimmed == "export"
        {
            brace_depth = brace_delta(line);
            // Multi-line statements continue until braces close and the
            // statement terminates
            if brace_depth > 0 || !statement_ends(line) {
                in_esm = true;
            }
            continue;
        }

        out.push_str(&jsx_comment_regex().replace_all(line, ""));
        out.push('\n');
    }

    out
}

fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    for c in line.chars() {
        match c {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

fn statement_ends(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.ends_with(';') || trimmed.ends_with('}') || !trimmed.ends_with(',')
}

use augur_core::AugurError;

/// Line prefix that opens a new file's patch section in a unified diff.
pub const FILE_MARKER: &str = "diff --git ";

/// Split a diff into ordered, non-overlapping chunks of at most `budget`
/// bytes each, preferring to break exactly before file-boundary markers.
///
/// The split is lossless and order-preserving: joining the returned chunks
/// with `"\n"` reproduces the input's line sequence. A chunk boundary is
/// placed when a [`FILE_MARKER`] line arrives and the current chunk is
/// non-empty, or when appending the next line would push the current chunk
/// past `budget`. The second rule guarantees budget compliance even for a
/// single file whose patch alone exceeds the budget; the one exception is
/// a single line longer than the whole budget, which is kept intact as its
/// own over-budget chunk rather than cut mid-line.
///
/// Whitespace-only chunks are dropped.
///
/// # Errors
///
/// Returns [`AugurError::Config`] if `budget` is zero, and
/// [`AugurError::Input`] if the diff yields no non-empty chunks
/// (e.g. whitespace-only input).
///
/// # Examples
///
/// ```
/// use augur_chunk::splitter::split_diff;
///
/// let diff = "diff --git a/a.rs b/a.rs\n+one\ndiff --git a/b.rs b/b.rs\n+two";
/// let chunks = split_diff(diff, 1_000).unwrap();
/// assert_eq!(chunks.len(), 2);
/// assert!(chunks[1].starts_with("diff --git a/b.rs"));
/// assert_eq!(chunks.join("\n"), diff);
/// ```
pub fn split_diff(diff: &str, budget: usize) -> Result<Vec<String>, AugurError> {
    if budget == 0 {
        return Err(AugurError::Config("chunk budget must be positive".into()));
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in diff.lines() {
        let at_file_boundary = line.starts_with(FILE_MARKER) && !current.is_empty();
        // +1 for the newline that joining this line would add
        let over_budget = !current.is_empty() && current.len() + 1 + line.len() > budget;

        if at_file_boundary || over_budget {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks.retain(|chunk| !chunk.trim().is_empty());

    if chunks.is_empty() {
        return Err(AugurError::Input(
            "diff produced no analyzable chunks".into(),
        ));
    }

    Ok(chunks)
}

/// Human-readable summary of the files touched by a diff, parsed from its
/// `diff --git ` marker lines.
///
/// # Examples
///
/// ```
/// use augur_chunk::splitter::file_summary;
///
/// let diff = "diff --git a/src/lib.rs b/src/lib.rs\n+x";
/// assert_eq!(file_summary(diff), "src/lib.rs");
/// assert_eq!(file_summary("+bare hunk line"), "changes");
/// ```
pub fn file_summary(diff: &str) -> String {
    let files: Vec<&str> = diff
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix(FILE_MARKER)?;
            // "a/path b/path" — take the b/ side, the post-change name
            let target = rest.split_whitespace().last()?;
            Some(target.strip_prefix("b/").unwrap_or(target))
        })
        .collect();

    match files.len() {
        0 => "changes".to_string(),
        1..=3 => files.join(", "),
        n => format!("{n} files"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multi_file_diff() -> String {
        let mut diff = String::new();
        for name in ["alpha.rs", "beta.rs", "gamma.rs"] {
            diff.push_str(&format!(
                "diff --git a/src/{name} b/src/{name}\n\
                 --- a/src/{name}\n\
                 +++ b/src/{name}\n\
                 @@ -1,2 +1,3 @@\n \
                 fn keep() {{}}\n\
                 +fn added() {{}}\n"
            ));
        }
        diff.pop(); // no trailing newline, lines() would drop it anyway
        diff
    }

    #[test]
    fn split_is_lossless() {
        let diff = multi_file_diff();
        for budget in [40, 120, 100_000] {
            let chunks = split_diff(&diff, budget).unwrap();
            assert_eq!(chunks.join("\n"), diff, "budget {budget}");
        }
    }

    #[test]
    fn chunks_respect_budget() {
        let diff = multi_file_diff();
        let budget = 80;
        let chunks = split_diff(&diff, budget).unwrap();
        for chunk in &chunks {
            assert!(
                chunk.len() <= budget,
                "chunk of {} bytes exceeds budget {budget}",
                chunk.len()
            );
        }
    }

    #[test]
    fn breaks_before_file_markers_when_budget_allows() {
        let diff = multi_file_diff();
        let chunks = split_diff(&diff, 100_000).unwrap();
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.starts_with(FILE_MARKER));
        }
        assert!(chunks[0].contains("alpha.rs"));
        assert!(chunks[2].contains("gamma.rs"));
    }

    #[test]
    fn single_file_over_budget_is_split_anyway() {
        // One file, no internal markers; only the size valve can fire
        let mut diff = String::from("diff --git a/big.rs b/big.rs");
        for i in 0..100 {
            diff.push_str(&format!("\n+let x{i} = {i};"));
        }
        let chunks = split_diff(&diff, 200).unwrap();
        assert!(chunks.len() > 1);
        assert_eq!(chunks.join("\n"), diff);
        for chunk in &chunks {
            assert!(chunk.len() <= 200);
        }
    }

    #[test]
    fn irreducible_long_line_is_preserved() {
        let long_line = format!("+{}", "x".repeat(500));
        let diff = format!("diff --git a/a.rs b/a.rs\n{long_line}\n+short");
        let chunks = split_diff(&diff, 100).unwrap();
        // The long line survives as its own over-budget chunk
        assert!(chunks.iter().any(|c| c == &long_line));
        assert_eq!(chunks.join("\n"), diff);
    }

    #[test]
    fn marker_on_first_line_does_not_create_empty_chunk() {
        let diff = "diff --git a/a.rs b/a.rs\n+x";
        let chunks = split_diff(diff, 1_000).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], diff);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = split_diff("", 1_000).unwrap_err();
        assert!(matches!(err, AugurError::Input(_)));
    }

    #[test]
    fn whitespace_only_input_is_an_error() {
        let err = split_diff("   \n\n \t \n", 1_000).unwrap_err();
        assert!(matches!(err, AugurError::Input(_)));
    }

    #[test]
    fn zero_budget_is_a_config_error() {
        let err = split_diff("+x", 0).unwrap_err();
        assert!(matches!(err, AugurError::Config(_)));
    }

    #[test]
    fn single_chunk_when_everything_fits() {
        let diff = "--- a/x.rs\n+++ b/x.rs\n@@ -1 +1,2 @@\n old\n+new";
        let chunks = split_diff(diff, 10_000).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], diff);
    }

    #[test]
    fn file_summary_lists_names() {
        assert_eq!(
            file_summary("diff --git a/one.rs b/one.rs\n+x\ndiff --git a/two.rs b/two.rs\n+y"),
            "one.rs, two.rs"
        );
    }

    #[test]
    fn file_summary_collapses_many_files() {
        let diff: String = (0..7)
            .map(|i| format!("diff --git a/f{i}.rs b/f{i}.rs\n+x\n"))
            .collect();
        assert_eq!(file_summary(&diff), "7 files");
    }

    #[test]
    fn file_summary_without_markers_is_generic() {
        assert_eq!(file_summary("@@ -1 +1 @@\n-a\n+b"), "changes");
    }
}

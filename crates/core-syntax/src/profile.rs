//! Language profiles: external configuration keyed by filename.
//!
//! A profile describes how to classify a file type's characters; the table
//! is consulted once per open/save-as and the selected profile is then
//! threaded through every row re-highlight. Matchers starting with `.` are
//! extension matches, anything else is a filename substring match.

use crate::HighlightFlags;

#[derive(Debug)]
pub struct SyntaxProfile {
    /// Short label shown in the status bar.
    pub file_type: &'static str,
    pub file_match: &'static [&'static str],
    /// Whole-token keywords; a trailing `|` tags the secondary class.
    pub keywords: &'static [&'static str],
    pub singleline_comment_start: Option<&'static str>,
    pub flags: HighlightFlags,
}

pub static PROFILES: &[SyntaxProfile] = &[SyntaxProfile {
    file_type: "c",
    file_match: &[".c", ".h", ".cpp"],
    keywords: &[
        "switch",
        "if",
        "while",
        "for",
        "break",
        "continue",
        "return",
        "else",
        "struct",
        "union",
        "typedef",
        "static",
        "enum",
        "class",
        "case",
        "int|",
        "long|",
        "double|",
        "float|",
        "char|",
        "unsigned|",
        "signed|",
        "void|",
    ],
    singleline_comment_start: Some("//"),
    flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
}];

/// Select the profile for `filename`, or `None` for unmatched files.
pub fn detect(filename: &str) -> Option<&'static SyntaxProfile> {
    let ext = filename.rfind('.').map(|at| &filename[at..]);
    for profile in PROFILES {
        for pattern in profile.file_match {
            let matched = if pattern.starts_with('.') {
                ext == Some(pattern)
            } else {
                filename.contains(pattern)
            };
            if matched {
                return Some(profile);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_selects_c() {
        assert_eq!(detect("main.c").map(|p| p.file_type), Some("c"));
        assert_eq!(detect("editor.cpp").map(|p| p.file_type), Some("c"));
        assert_eq!(detect("a.b.h").map(|p| p.file_type), Some("c"));
    }

    #[test]
    fn unmatched_files_get_no_profile() {
        assert!(detect("notes.txt").is_none());
        assert!(detect("Makefile").is_none());
        // Only the final suffix counts as the extension.
        assert!(detect("archive.c.bak").is_none());
    }
}

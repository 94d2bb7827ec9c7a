//! Embedded content references inside message text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ids::FileId;

static FILE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/files/([0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})")
        .expect("file link pattern is valid")
});

/// File ids linked from `content`, without duplicates, in order of first
/// appearance.
pub fn embedded_file_ids(content: &str) -> Vec<FileId> {
    let mut ids: Vec<FileId> = Vec::new();
    for caps in FILE_LINK.captures_iter(content) {
        let Ok(id) = caps[1].parse::<FileId>() else {
            continue;
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_links() {
        assert!(embedded_file_ids("just text").is_empty());
        assert!(embedded_file_ids("see /files/not-an-id").is_empty());
    }

    #[test]
    fn test_extracts_and_dedups() {
        let a = "0186f3c2-5d6b-7a1e-9c3f-2b4d6e8f0a1b";
        let b = "0186f3c2-aaaa-7a1e-9c3f-2b4d6e8f0a1b";
        let content = format!(
            "look https://q.example.com/files/{a} and https://q.example.com/files/{b}\n\
             again https://q.example.com/files/{a}"
        );
        let ids = embedded_file_ids(&content);
        assert_eq!(ids, vec![a.parse().unwrap(), b.parse().unwrap()]);
    }
}

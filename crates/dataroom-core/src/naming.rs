//! Random object names for stored uploads.
//!
//! Shared by the storage backends (server-side names) and the fallback client
//! (names for direct object writes).

use uuid::Uuid;

const MAX_STEM_LENGTH: usize = 40;
const MAX_EXTENSION_LENGTH: usize = 10;

/// Generate a random object name that keeps the extension of `filename`.
///
/// `deck.pdf` becomes something like `deck-3f9a1c2b7e4d.pdf`. The stem is
/// reduced to `[a-z0-9_-]`; a missing or unusable stem yields just the random part.
pub fn generate_object_name(filename: &str) -> String {
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        Some(("", ext)) => ("", Some(ext)),
        _ => (filename, None),
    };

    let stem: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_STEM_LENGTH)
        .collect::<String>()
        .to_lowercase();

    let extension: Option<String> = extension
        .map(|ext| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(MAX_EXTENSION_LENGTH)
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    let random = Uuid::new_v4().simple().to_string();
    let random = &random[..12];

    let name = if stem.is_empty() {
        random.to_string()
    } else {
        format!("{}-{}", stem, random)
    };

    match extension {
        Some(ext) => format!("{}.{}", name, ext),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extension_and_stem() {
        let name = generate_object_name("deck.pdf");
        assert!(name.starts_with("deck-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "deck-".len() + 12 + ".pdf".len());
    }

    #[test]
    fn lowercases_and_strips_extension() {
        let name = generate_object_name("Logo Final.P N G");
        assert!(name.starts_with("logofinal-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn handles_missing_extension_and_dotfiles() {
        let name = generate_object_name("README");
        assert!(name.starts_with("readme-"));
        assert!(!name.contains('.'));

        let name = generate_object_name(".env");
        assert!(name.ends_with(".env"));
        assert!(!name.starts_with('-'));
    }

    #[test]
    fn names_are_unique() {
        assert_ne!(generate_object_name("a.pdf"), generate_object_name("a.pdf"));
    }
}

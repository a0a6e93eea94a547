//! Template family versions: copies, namespaced variants and authored versions

use regex::Regex;

use crate::contract::Notetype;

/// Whether `name` is the family itself, a generated copy (`"{base}-XXXXX"`)
/// or a namespaced variant (`"{base} (a / b)"`)
pub fn is_version_of(name: &str, base: &str) -> bool {
    name == base || is_copy_of(name, base) || is_namespaced_variant_of(name, base)
}

/// Generated copy: the base name, a dash and five alphanumerics
pub fn is_copy_of(name: &str, base: &str) -> bool {
    anchored(&format!(r"{}-[a-zA-Z0-9]{{5}}", regex::escape(base)))
        .map(|pattern| pattern.is_match(name))
        .unwrap_or(false)
}

pub fn is_namespaced_variant_of(name: &str, base: &str) -> bool {
    anchored(&format!(r"{} \(.+? / .+?\)", regex::escape(base)))
        .map(|pattern| pattern.is_match(name))
        .unwrap_or(false)
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// The family a notetype belongs to. The longest family name followed by
/// the end of the name, a space or a dash wins.
pub fn base_family_name<'a>(name: &str, families: &'a [String]) -> Option<&'a str> {
    families
        .iter()
        .filter(|family| {
            name.strip_prefix(family.as_str())
                .map(|rest| rest.is_empty() || rest.starts_with(' ') || rest.starts_with('-'))
                .unwrap_or(false)
        })
        .max_by_key(|family| family.len())
        .map(String::as_str)
}

/// Shortest name first, then alphabetical
pub fn most_basic_version<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().min_by(|a, b| (a.len(), a).cmp(&(b.len(), b)))
}

/// Version tag from the first line of the first front template
/// (`<!-- version X -->`)
pub fn notetype_version(notetype: &Notetype) -> Option<String> {
    let front = &notetype.templates.first()?.front;
    let pattern = Regex::new(r"^<!-- version ([\w\d]+) -->\n").ok()?;
    pattern
        .captures(front)
        .and_then(|captures| captures.get(1))
        .map(|version| version.as_str().to_string())
}

/// Whether `installed` differs in version from the newest authored notetype
pub fn update_available(installed: &Notetype, newest: &Notetype) -> bool {
    notetype_version(installed) != notetype_version(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CardTemplate;
    use chrono::Utc;

    fn with_front(front: &str) -> Notetype {
        Notetype {
            id: 1,
            name: "A".to_string(),
            templates: vec![CardTemplate {
                name: "Card 1".to_string(),
                front: front.to_string(),
                back: String::new(),
            }],
            css: String::new(),
            fields: vec![],
            modified: Utc::now(),
            usn: 0,
        }
    }

    #[test]
    fn test_version_names() {
        assert!(is_version_of("ProjektAnkiCloze", "ProjektAnkiCloze"));
        assert!(is_version_of("ProjektAnkiCloze-1dgs0", "ProjektAnkiCloze"));
        assert!(is_version_of("ProjektAnkiCloze (deck / user)", "ProjektAnkiCloze"));
        assert!(!is_version_of("ProjektAnkiCloze-1dgs", "ProjektAnkiCloze"));
        assert!(!is_version_of("ProjektAnkiClozeX", "ProjektAnkiCloze"));
        assert!(!is_version_of("ProjektAnkiCloze (deck)", "ProjektAnkiCloze"));
    }

    #[test]
    fn test_copy_pattern_escapes_base() {
        assert!(is_copy_of("A+B-abc12", "A+B"));
        assert!(!is_copy_of("AAB-abc12", "A+B"));
    }

    #[test]
    fn test_base_family_name_prefers_longest() {
        let families = vec!["Cloze".to_string(), "Cloze Extra".to_string()];
        assert_eq!(base_family_name("Cloze Extra-12345", &families), Some("Cloze Extra"));
        assert_eq!(base_family_name("Cloze-12345", &families), Some("Cloze"));
        assert_eq!(base_family_name("Clozes", &families), None);
    }

    #[test]
    fn test_most_basic_version() {
        let names = ["B-12345", "B", "A (x / y)"];
        assert_eq!(most_basic_version(names), Some("B"));
        assert_eq!(most_basic_version(["b-22222", "b-11111"]), Some("b-11111"));
        assert_eq!(most_basic_version(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_notetype_version() {
        assert_eq!(
            notetype_version(&with_front("<!-- version 1a2b -->\n<div></div>")),
            Some("1a2b".to_string())
        );
        assert_eq!(notetype_version(&with_front("<div></div>")), None);
        assert!(update_available(
            &with_front("<!-- version 1 -->\n"),
            &with_front("<!-- version 2 -->\n")
        ));
    }
}

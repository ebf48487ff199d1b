//! Keyword heuristics, labels and ordering for derived form fields.
use crate::raw::RawProp;

// ------------------------------- Policy ---------------------------------- //

const TEXTAREA_KEYWORDS: &[&str] = &["content", "description", "text", "message", "body", "summary"];
const IMAGE_KEYWORDS: &[&str] = &["image", "photo", "picture", "avatar", "logo", "banner", "background"];
const RICHTEXT_KEYWORDS: &[&str] = &["html", "rich", "formatted", "wysiwyg"];
const RICHTEXT_FORMATS: &[&str] = &["html", "richtext"];

/// Strings allowed longer than this render as a textarea.
pub const TEXTAREA_MAX_LENGTH: f64 = 100.0;

/// Case-insensitive substring match against `title` and `description`.
fn mentions_any(prop: RawProp<'_>, keywords: &[&str]) -> bool {
    let title = prop.title().to_lowercase();
    let description = prop.description().to_lowercase();
    keywords.iter().any(|k| title.contains(k) || description.contains(k))
}

pub fn wants_textarea(prop: RawProp<'_>) -> bool {
    mentions_any(prop, TEXTAREA_KEYWORDS) || prop.num("maxLength").is_some_and(|n| n > TEXTAREA_MAX_LENGTH)
}

pub fn wants_image(prop: RawProp<'_>) -> bool {
    mentions_any(prop, IMAGE_KEYWORDS)
}

pub fn wants_richtext(prop: RawProp<'_>) -> bool {
    prop.str("format").is_some_and(|f| RICHTEXT_FORMATS.contains(&f)) || mentions_any(prop, RICHTEXT_KEYWORDS)
}

/// `contact.first_name` → `First Name`.
pub fn field_label(path: &str) -> String {
    let last = path.rsplit('.').next().unwrap_or(path);
    last.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Lower sorts first: `title`, `description`, other top-level fields, then
/// nested fields by depth.
pub fn priority(path: &str) -> usize {
    match path {
        "title" => 1,
        "description" => 2,
        _ => match path.matches('.').count() {
            0 => 10,
            dots => 100 + dots * 10,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prop(v: &serde_json::Value) -> RawProp<'_> {
        RawProp::of(v).unwrap()
    }

    #[test]
    fn labels() {
        assert_eq!(field_label("hero_title"), "Hero Title");
        assert_eq!(field_label("contact.first_name"), "First Name");
        assert_eq!(field_label("firstName"), "Firstname");
        assert_eq!(field_label("a__b"), "A  B");
    }

    #[test]
    fn priorities() {
        assert_eq!(priority("title"), 1);
        assert_eq!(priority("description"), 2);
        assert_eq!(priority("email"), 10);
        assert_eq!(priority("contact.email"), 110);
        assert_eq!(priority("a.b.c"), 120);
        assert_eq!(priority("contact.title"), 110);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let v = json!({"title": "Hero BANNER"});
        assert!(wants_image(prop(&v)));
        let v = json!({"description": "Main body copy"});
        assert!(wants_textarea(prop(&v)));
        let v = json!({"title": "WYSIWYG intro"});
        assert!(wants_richtext(prop(&v)));
        let v = json!({"title": "Name"});
        assert!(!wants_image(prop(&v)) && !wants_textarea(prop(&v)) && !wants_richtext(prop(&v)));
    }

    #[test]
    fn long_strings_want_a_textarea() {
        let long = json!({"maxLength": 101});
        assert!(wants_textarea(prop(&long)));
        let short = json!({"maxLength": 100});
        assert!(!wants_textarea(prop(&short)));
    }

    #[test]
    fn richtext_formats() {
        let v = json!({"format": "html"});
        assert!(wants_richtext(prop(&v)));
        let v = json!({"format": "richtext"});
        assert!(wants_richtext(prop(&v)));
        let v = json!({"format": "email"});
        assert!(!wants_richtext(prop(&v)));
    }
}

//! English noun inflection for model, view and route names.
//!
//! Covers irregular nouns, uncountables and the regular suffix rules; the case of
//! the first letter of the input is carried over to the result.

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("analysis", "analyses"),
    ("index", "indices"),
    ("status", "statuses"),
    ("quiz", "quizzes"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "metadata",
    "feedback",
    "software",
    "hardware",
    "audio",
    "traffic",
];

const F_TO_VES: &[(&str, &str)] = &[
    ("knife", "knives"),
    ("wife", "wives"),
    ("life", "lives"),
    ("leaf", "leaves"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("calf", "calves"),
    ("thief", "thieves"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Applies the case of `template`'s first letter to `word`.
fn match_case(template: &str, word: &str) -> String {
    let shouting = template.len() > 1
        && template.chars().any(char::is_alphabetic)
        && !template.chars().any(char::is_lowercase);
    if shouting {
        return word.to_uppercase();
    }
    let mut chars = word.chars();
    match (template.chars().next(), chars.next()) {
        (Some(t), Some(first)) if t.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        _ => word.to_string(),
    }
}

/// Splits off the last word of a CamelCase or snake_case name; only that word inflects.
fn split_last_word(word: &str) -> (&str, &str) {
    if !word.chars().any(char::is_lowercase) {
        return ("", word);
    }
    let boundary = word
        .char_indices()
        .rev()
        .find(|&(i, c)| i > 0 && (c.is_uppercase() || word[..i].ends_with('_')))
        .map_or(0, |(i, _)| i);
    word.split_at(boundary)
}

fn plural_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().chain(F_TO_VES).find(|(s, _)| *s == lower) {
        return match_case(word, plural);
    }
    if IRREGULAR.iter().chain(F_TO_VES).any(|(_, p)| *p == lower) {
        return word.to_string();
    }

    let plural = if let Some(stem) = lower.strip_suffix('y') {
        match stem.chars().last() {
            Some(c) if !is_vowel(c) => format!("{stem}ies"),
            _ => format!("{lower}s"),
        }
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        format!("{lower}es")
    } else {
        format!("{lower}s")
    };
    match_case(word, &plural)
}

fn singular_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().chain(F_TO_VES).find(|(_, p)| *p == lower) {
        return match_case(word, singular);
    }
    if IRREGULAR.iter().chain(F_TO_VES).any(|(s, _)| *s == lower) {
        return word.to_string();
    }

    let singular = if let Some(stem) = lower.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = ["ches", "shes", "sses", "xes", "zes"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix).map(|s| (s, suffix)))
        .map(|(stem, suffix)| format!("{stem}{}", &suffix[..suffix.len() - 2]))
    {
        stem
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        lower.clone()
    } else if let Some(stem) = lower.strip_suffix('s') {
        stem.to_string()
    } else {
        lower.clone()
    };
    match_case(word, &singular)
}

/// Plural form of `word`: `Comment` → `Comments`, `BlogCategory` → `BlogCategories`.
pub fn plural(word: &str) -> String {
    let (head, last) = split_last_word(word);
    format!("{head}{}", plural_word(last))
}

/// Singular form of `word`: `posts` → `post`, `people` → `person`.
pub fn singular(word: &str) -> String {
    let (head, last) = split_last_word(word);
    format!("{head}{}", singular_word(last))
}

/// Uppercases the first character: `posts` → `Posts`.
pub fn ucfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

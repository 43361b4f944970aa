/// A `rename_all` rule, applied to snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    pub(crate) const NAMES: &'static str = "`lowercase`, `UPPERCASE`, `camelCase`, `PascalCase`, \
        `snake_case`, `SCREAMING_SNAKE_CASE` or `kebab-case`";

    pub(crate) fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "camelCase" => Self::Camel,
            "PascalCase" => Self::Pascal,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            _ => return None,
        })
    }

    pub(crate) fn apply(self, field: &str) -> String {
        match self {
            Self::Lower => field.to_ascii_lowercase(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Snake => field.to_owned(),
            Self::Kebab => field.replace('_', "-"),
            Self::Camel => {
                let mut words = field.split('_').filter(|w| !w.is_empty());
                let mut out = words.next().map(str::to_ascii_lowercase).unwrap_or_default();
                words.for_each(|w| out.push_str(&capitalize(w)));
                out
            }
            Self::Pascal => field
                .split('_')
                .filter(|w| !w.is_empty())
                .map(capitalize)
                .collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::RenameRule;

    #[test]
    fn applies_rules() {
        let cases = [
            (RenameRule::Lower, "created_at"),
            (RenameRule::Upper, "CREATED_AT"),
            (RenameRule::Camel, "createdAt"),
            (RenameRule::Pascal, "CreatedAt"),
            (RenameRule::Snake, "created_at"),
            (RenameRule::ScreamingSnake, "CREATED_AT"),
            (RenameRule::Kebab, "created-at"),
        ];
        for (rule, expected) in cases {
            assert_eq!(rule.apply("created_at"), expected, "{rule:?}");
        }
    }

    #[test]
    fn single_word() {
        assert_eq!(RenameRule::Camel.apply("id"), "id");
        assert_eq!(RenameRule::Pascal.apply("id"), "Id");
    }

    #[test]
    fn parses_names() {
        assert_eq!(RenameRule::parse("kebab-case"), Some(RenameRule::Kebab));
        assert_eq!(RenameRule::parse("Kebab"), None);
    }
}

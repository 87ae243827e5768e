//! Locale-aware slugging for location and query path segments

/// How one site turns free text into a URL path segment.
#[derive(Debug, Clone, Copy)]
pub struct SlugRules {
    /// Lower-case letters replaced before filtering, e.g. `ł` -> `l`.
    pub folds: &'static [(char, &'static str)],
    /// Characters removed outright instead of becoming a separator.
    pub dropped: &'static [char],
}

/// Lower-cases, folds diacritics, turns every non-alphanumeric run into a
/// single `-` and percent-encodes whatever non-ASCII letters remain.
///
/// Returns an empty string when nothing alphanumeric is left.
pub fn slugify(text: &str, rules: &SlugRules) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if rules.dropped.contains(&ch) {
            continue;
        }

        let folded = rules
            .folds
            .iter()
            .find(|(from, _)| *from == ch)
            .map(|(_, to)| *to);

        match folded {
            Some(replacement) => {
                push_separator(&mut slug, &mut pending_separator);
                slug.push_str(replacement);
            }
            None if ch.is_alphanumeric() => {
                push_separator(&mut slug, &mut pending_separator);
                slug.push(ch);
            }
            None => pending_separator = true,
        }
    }

    urlencoding::encode(&slug).into_owned()
}

fn push_separator(slug: &mut String, pending: &mut bool) {
    if *pending && !slug.is_empty() {
        slug.push('-');
    }
    *pending = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLISH: SlugRules = SlugRules {
        folds: &[('ł', "l"), ('ó', "o"), ('ź', "z"), ('ż', "z"), ('ś', "s")],
        dropped: &[],
    };

    const UKRAINIAN: SlugRules = SlugRules {
        folds: &[],
        dropped: &['\'', '\u{2019}'],
    };

    #[test]
    fn folds_and_collapses_separators() {
        assert_eq!(slugify("  Łódź,  Śródmieście ", &POLISH), "lodz-srodmiescie");
        assert_eq!(slugify("iPhone 13 -- Pro!!", &POLISH), "iphone-13-pro");
    }

    #[test]
    fn nothing_alphanumeric_gives_empty_slug() {
        assert_eq!(slugify(" -- !! ", &POLISH), "");
    }

    #[test]
    fn cyrillic_is_kept_and_percent_encoded() {
        assert_eq!(slugify("Київ", &UKRAINIAN), urlencoding::encode("київ"));
    }

    #[test]
    fn dropped_characters_do_not_split_words() {
        assert_eq!(
            slugify("м'ясо", &UKRAINIAN),
            urlencoding::encode("мясо").into_owned()
        );
    }
}

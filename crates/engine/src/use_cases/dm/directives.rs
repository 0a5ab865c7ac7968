//! DM damage directives.
//!
//! The DM persona is instructed to end its reply with tags of the form
//! `[DAMAGE: PlayerName 3]`. The tags are parsed and applied server-side,
//! then stripped so players only ever see the narrative text.

use std::sync::OnceLock;

use regex_lite::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageDirective {
    pub player_name: String,
    pub amount: u32,
}

fn directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // Name is everything up to the trailing number; allows spaces.
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\[DAMAGE:\s*([^\]]+?)\s+(\d+)\s*\]").unwrap()
    })
}

/// Split a DM reply into the visible narrative and its damage directives.
pub fn extract(text: &str) -> (String, Vec<DamageDirective>) {
    let regex = directive_regex();
    let mut directives = Vec::new();

    for captures in regex.captures_iter(text) {
        let (Some(name), Some(amount)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let Ok(amount) = amount.as_str().parse::<u32>() else {
            continue;
        };
        directives.push(DamageDirective {
            player_name: name.as_str().trim().to_string(),
            amount,
        });
    }

    let narrative = regex.replace_all(text, "").trim().to_string();
    (narrative, directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_directive() {
        let (narrative, directives) =
            extract("The goblin's blade bites deep. [DAMAGE: Borin 3]");
        assert_eq!(narrative, "The goblin's blade bites deep.");
        assert_eq!(
            directives,
            vec![DamageDirective {
                player_name: "Borin".to_string(),
                amount: 3
            }]
        );
    }

    #[test]
    fn handles_names_with_spaces_and_multiple_tags() {
        let (narrative, directives) = extract(
            "Fire washes the hall. [DAMAGE: Ser Aldric 5] [DAMAGE: Astra 2]",
        );
        assert_eq!(narrative, "Fire washes the hall.");
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].player_name, "Ser Aldric");
        assert_eq!(directives[0].amount, 5);
        assert_eq!(directives[1].player_name, "Astra");
        assert_eq!(directives[1].amount, 2);
    }

    #[test]
    fn text_without_tags_passes_through() {
        let (narrative, directives) = extract("You enter a quiet chamber.");
        assert_eq!(narrative, "You enter a quiet chamber.");
        assert!(directives.is_empty());
    }

    #[test]
    fn malformed_tags_are_left_alone() {
        let (narrative, directives) = extract("Strange runes read [DAMAGE: unscathed].");
        assert_eq!(narrative, "Strange runes read [DAMAGE: unscathed].");
        assert!(directives.is_empty());
    }
}

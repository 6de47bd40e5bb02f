//! Pure karma parsing: message text + mention list in, per-user deltas out.

use crate::{Mention, UserId};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Mention token followed (ignoring whitespace) by a marker run.
static MARKER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>\s*([+-]+)").expect("marker run pattern is valid"));

/// Scan message content for karma marker runs attached to mentions.
///
/// A run is a maximal contiguous sequence of `+` or `-` following a mention
/// token. Homogeneous runs yield a delta equal to the signed run length
/// (`++` → +2, `---` → -3). Mixed runs are ambiguous and contribute nothing.
/// Self-karma is excluded. Repeated mentions of the same user sum into one
/// delta; entries that cancel to zero are dropped, so every returned delta
/// is non-zero. Pure: never touches storage.
pub fn parse(content: &str, mentions: &[Mention], author_id: &str) -> HashMap<UserId, i64> {
    let mentioned: HashMap<&str, &Mention> = mentions
        .iter()
        .map(|mention| (mention.user_id.as_ref(), mention))
        .collect();

    let mut changes: HashMap<UserId, i64> = HashMap::new();

    for capture in MARKER_RUN.captures_iter(content) {
        let user_id = &capture[1];
        let run = &capture[2];

        let Some(mention) = mentioned.get(user_id) else {
            continue;
        };
        if user_id == author_id {
            continue;
        }

        let Some(delta) = run_delta(run) else {
            continue;
        };

        *changes.entry(mention.user_id.clone()).or_insert(0) += delta;
    }

    changes.retain(|_, delta| *delta != 0);
    changes
}

/// Signed length of a homogeneous run, None for mixed runs.
fn run_delta(run: &str) -> Option<i64> {
    let mut chars = run.chars();
    let first = chars.next()?;
    if chars.any(|c| c != first) {
        return None;
    }

    let magnitude = run.len() as i64;
    Some(if first == '-' { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn mention(user_id: &str, name: &str) -> Mention {
        Mention {
            user_id: user_id.into(),
            display_name: name.to_string(),
        }
    }

    fn delta_for(changes: &HashMap<UserId, i64>, user_id: &str) -> Option<i64> {
        changes.get(&UserId::from(user_id)).copied()
    }

    #[test]
    fn plus_run_yields_run_length_delta() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> +++", &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(3));
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn minus_run_yields_negative_delta() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> --", &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(-2));
    }

    #[test]
    fn mixed_run_is_ignored() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> +-", &mentions, "1");
        assert!(changes.is_empty());
    }

    #[test]
    fn self_karma_is_excluded() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> ++", &mentions, "42");
        assert!(changes.is_empty());
    }

    #[test]
    fn repeated_mentions_accumulate() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> ++ <@42> +", &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(3));
    }

    #[test]
    fn opposite_runs_cancel_to_nothing() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@42> ++ <@42> --", &mentions, "1");
        assert!(changes.is_empty());
    }

    #[test]
    fn whitespace_between_mention_and_run_is_optional() {
        let mentions = [mention("42", "bob")];
        assert_eq!(delta_for(&parse("<@42>++", &mentions, "1"), "42"), Some(2));
        assert_eq!(delta_for(&parse("<@42>   ++", &mentions, "1"), "42"), Some(2));
    }

    #[test]
    fn nickname_mention_form_is_recognized() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@!42> +", &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(1));
    }

    #[test]
    fn markers_without_a_listed_mention_are_ignored() {
        let mentions = [mention("42", "bob")];
        let changes = parse("<@99> ++", &mentions, "1");
        assert!(changes.is_empty());
    }

    #[test]
    fn multiple_users_in_one_message() {
        let mentions = [mention("42", "bob"), mention("43", "carol")];
        let changes = parse("<@42> ++ <@43> ---", &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(2));
        assert_eq!(delta_for(&changes, "43"), Some(-3));
    }

    #[test]
    fn plain_text_yields_nothing() {
        let mentions = [mention("42", "bob")];
        let changes = parse("great talk yesterday", &mentions, "1");
        assert!(changes.is_empty());
    }

    #[test]
    fn runs_across_lines_accumulate() {
        let mentions = [mention("42", "bob")];
        let content = indoc! {"
            great demo today
            <@42> ++
            and the writeup too <@42> +++
        "};

        let changes = parse(content, &mentions, "1");
        assert_eq!(delta_for(&changes, "42"), Some(5));
    }
}

//! Offline responder used when the remote model is unavailable.
//!
//! Keyword rules over the user's latest message; the first rule that matches
//! wins, so specific topics are listed before greetings.

const HEADACHE_REPLY: &str = "Headaches are often linked to dehydration, poor sleep, screen strain or stress. Try drinking a glass of water, resting somewhere dim and quiet, and taking a short break from screens. If the pain is sudden and severe, comes with fever, a stiff neck, confusion or vision changes, seek medical care right away.";

const FITNESS_REPLY: &str = "A good weekly target is about 150 minutes of moderate activity, like brisk walking, plus two short strength sessions. Start small, warm up first, and increase gradually so your body can adapt. Consistency matters more than intensity.";

const DIET_REPLY: &str = "Aim for balanced plates: half vegetables, a quarter lean protein and a quarter whole grains. Stay hydrated, limit sugary drinks and heavily processed snacks, and try to eat at regular times.";

const FRUIT_REPLY: &str = "Fruit is a great choice! Two to three servings a day add fibre, vitamins and hydration. Whole fruit is better than juice because the fibre keeps you full and slows the sugar uptake.";

const GREETING_REPLY: &str = "Hello! I'm Dr. Echo. How are you feeling today? I can help with sleep, stress, fitness and nutrition questions.";

const GENERIC_REPLY: &str = "I'm currently operating in offline mode, so I can only offer general wellness tips. Staying hydrated, sleeping seven to nine hours and moving a little every day are good places to start. For anything specific or persistent, please check with a healthcare professional.";

/// (keywords, reply). Multi-word keywords match as phrases, single words match
/// whole words.
const RULES: &[(&[&str], &str)] = &[
    (&["headache", "headaches", "migraine", "head hurts"], HEADACHE_REPLY),
    (
        &["exercise", "workout", "fitness", "gym", "running", "training"],
        FITNESS_REPLY,
    ),
    (&["diet", "nutrition", "eat", "eating", "meal", "meals"], DIET_REPLY),
    (&["fruit", "fruits", "apple", "banana", "berries"], FRUIT_REPLY),
    (
        &["hello", "hi", "hey", "good morning", "good evening", "greetings"],
        GREETING_REPLY,
    ),
];

/// Pattern-matching stand-in for the remote model.
pub struct FallbackResponder;

impl FallbackResponder {
    /// Pick a canned reply for `message`.
    pub fn respond(message: &str) -> &'static str {
        let lower = message.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();

        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| keyword_matches(&lower, &words, k)))
            .map(|(_, reply)| *reply)
            .unwrap_or(GENERIC_REPLY)
    }
}

fn keyword_matches(lower: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        lower.contains(keyword)
    } else {
        words.contains(&keyword)
    }
}

/// Byte offsets where each whitespace-separated word of `text` ends.
/// Slicing `text[..end]` at each offset yields the growing prefix streamed to
/// listeners, with the original spacing and newlines intact.
pub fn word_ends(text: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                ends.push(i);
                in_word = false;
            }
        } else {
            in_word = true;
        }
    }
    if in_word {
        ends.push(text.len());
    }
    ends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_rules() {
        assert_eq!(FallbackResponder::respond("I have a bad headache"), HEADACHE_REPLY);
        assert_eq!(FallbackResponder::respond("Best workout for beginners?"), FITNESS_REPLY);
        assert_eq!(FallbackResponder::respond("What should I eat?"), DIET_REPLY);
        assert_eq!(FallbackResponder::respond("Is a banana healthy"), FRUIT_REPLY);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(FallbackResponder::respond("Hi!"), GREETING_REPLY);
        assert_eq!(FallbackResponder::respond("Good morning doc"), GREETING_REPLY);
    }

    #[test]
    fn test_topic_beats_greeting() {
        assert_eq!(FallbackResponder::respond("hey, my head hurts"), HEADACHE_REPLY);
    }

    #[test]
    fn test_whole_word_matching() {
        // "this" contains "hi", "great" contains "eat"
        assert_eq!(FallbackResponder::respond("this is great"), GENERIC_REPLY);
    }

    #[test]
    fn test_generic_mentions_offline() {
        assert!(FallbackResponder::respond("tell me about taxes").contains("offline mode"));
    }

    #[test]
    fn test_word_ends_preserve_layout() {
        let text = "one two\n\nthree";
        let prefixes: Vec<&str> = word_ends(text).iter().map(|&e| &text[..e]).collect();
        assert_eq!(prefixes, vec!["one", "one two", "one two\n\nthree"]);
    }

    #[test]
    fn test_word_ends_multibyte() {
        let text = "café ok";
        let ends = word_ends(text);
        assert_eq!(&text[..ends[0]], "café");
        assert_eq!(*ends.last().unwrap(), text.len());
        assert!(word_ends("   ").is_empty());
    }
}

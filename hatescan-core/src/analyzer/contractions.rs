//! Contraction table.
//!
//! Ordered `(pattern, replacement)` pairs applied by
//! [`expand_contractions`](super::stages::expand_contractions). Every pair is a
//! case-sensitive literal substitution run once across the whole text, in
//! table order. Nothing is rescanned after the last pair.
//!
//! The table is data, not a dictionary: duplicate patterns (`i'll`, `i'd`) and
//! capitalized patterns that can never survive the lowercasing stage are kept
//! so that the substitution order stays identical to the trained model's
//! preprocessing.
//!
//! ## Known issue: mojibake entries
//!
//! Patterns containing `\u{0089}\u{00DB}\u{00AA}` or `\u{00E5}\u{00AB}` match the
//! UTF-8-decoded-as-Latin-1 spellings of a curly apostrophe. The non-ASCII
//! stage runs earlier and turns those code points into spaces, so these
//! entries never match inside the full pipeline. They still work when
//! `expand_contractions` is called on its own.

/// Ordered contraction substitutions.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("he's", "he is"),
    ("there's", "there is"),
    ("We're", "We are"),
    ("That's", "That is"),
    ("won't", "will not"),
    ("they're", "they are"),
    ("Can't", "Cannot"),
    ("wasn't", "was not"),
    ("don\u{0089}\u{00DB}\u{00AA}t", "do not"),
    ("aren't", "are not"),
    ("isn't", "is not"),
    ("What's", "What is"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("There's", "There is"),
    ("He's", "He is"),
    ("It's", "It is"),
    ("You're", "You are"),
    ("I'M", "I am"),
    ("shouldn't", "should not"),
    ("wouldn't", "would not"),
    ("i'm", "I am"),
    ("I\u{0089}\u{00DB}\u{00AA}m", "I am"),
    ("I'm", "I am"),
    ("Isn't", "is not"),
    ("Here's", "Here is"),
    ("you've", "you have"),
    ("you\u{0089}\u{00DB}\u{00AA}ve", "you have"),
    ("we're", "we are"),
    ("what's", "what is"),
    ("couldn't", "could not"),
    ("we've", "we have"),
    ("it\u{0089}\u{00DB}\u{00AA}s", "it is"),
    ("doesn\u{0089}\u{00DB}\u{00AA}t", "does not"),
    ("It\u{0089}\u{00DB}\u{00AA}s", "It is"),
    ("Here\u{0089}\u{00DB}\u{00AA}s", "Here is"),
    ("who's", "who is"),
    ("I\u{0089}\u{00DB}\u{00AA}ve", "I have"),
    ("y'all", "you all"),
    ("can\u{0089}\u{00DB}\u{00AA}t", "cannot"),
    ("would've", "would have"),
    ("it'll", "it will"),
    ("we'll", "we will"),
    ("wouldn\u{0089}\u{00DB}\u{00AA}t", "would not"),
    ("We've", "We have"),
    ("he'll", "he will"),
    ("Y'all", "You all"),
    ("Weren't", "Were not"),
    ("Didn't", "Did not"),
    ("they'll", "they will"),
    ("they'd", "they would"),
    ("DON'T", "DO NOT"),
    ("That\u{0089}\u{00DB}\u{00AA}s", "That is"),
    ("they've", "they have"),
    ("i'd", "I would"),
    ("should've", "should have"),
    ("You\u{0089}\u{00DB}\u{00AA}re", "You are"),
    ("where's", "where is"),
    ("Don\u{0089}\u{00DB}\u{00AA}t", "Do not"),
    ("we'd", "we would"),
    ("i'll", "I will"),
    ("weren't", "were not"),
    ("They're", "They are"),
    ("Can\u{0089}\u{00DB}\u{00AA}t", "Cannot"),
    ("you\u{0089}\u{00DB}\u{00AA}ll", "you will"),
    ("I\u{0089}\u{00DB}\u{00AA}d", "I would"),
    ("let's", "let us"),
    ("it's", "it is"),
    ("can't", "cannot"),
    ("don't", "do not"),
    ("you're", "you are"),
    ("i've", "I have"),
    ("that's", "that is"),
    ("i'll", "I will"),
    ("doesn't", "does not"),
    ("i'd", "I would"),
    ("didn't", "did not"),
    ("ain't", "am not"),
    ("you'll", "you will"),
    ("I've", "I have"),
    ("Don't", "do not"),
    ("I'll", "I will"),
    ("I'd", "I would"),
    ("Let's", "Let us"),
    ("you'd", "You would"),
    ("It's", "It is"),
    ("Ain't", "am not"),
    ("Haven't", "Have not"),
    ("Could've", "Could have"),
    ("youve", "you have"),
    ("don\u{00E5}\u{00AB}t", "do not"),
];

/// Returns `true` for patterns that only match mis-decoded apostrophes.
#[inline]
pub fn is_mojibake(pattern: &str) -> bool {
    !pattern.is_ascii()
}

//! Real-time suggestion lookup for the last typed token.
//!
//! Pure and stateless: no network, no persistence. The last
//! whitespace-delimited token is stripped of trailing punctuation,
//! lowercased, and looked up in a fixed contraction/typo map.

use std::collections::HashMap;
use std::sync::LazyLock;

static SUGGESTIONS: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        let entries: &[(&str, &[&str])] = &[
            // Contractions & common typos
            ("im", &["I am", "I'm"]),
            ("dont", &["don't", "do not"]),
            ("cant", &["can't", "cannot"]),
            ("wont", &["won't", "will not"]),
            ("youre", &["you're", "you are"]),
            ("theyre", &["they're", "they are"]),
            ("its", &["it's", "its"]),
            ("ive", &["I've", "I have"]),
            ("shouldnt", &["shouldn't", "should not"]),
            ("wouldnt", &["wouldn't", "would not"]),
            ("couldnt", &["couldn't", "could not"]),
            ("hes", &["he's", "he is"]),
            ("shes", &["she's", "she is"]),
            ("theyve", &["they've", "they have"]),
            ("weve", &["we've", "we have"]),
            ("were", &["we're", "we are", "were"]),
            ("id", &["I'd", "I would", "I had"]),
            ("hell", &["he'll", "he will"]),
            ("shell", &["she'll", "she will"]),
            ("itll", &["it'll", "it will"]),
            ("thatll", &["that'll", "that will"]),
            ("thats", &["that's", "that is"]),
            ("whats", &["what's", "what is"]),
            ("whos", &["who's", "who is"]),
            ("hows", &["how's", "how is"]),
            ("aint", &["am not", "is not", "are not", "has not", "have not"]),
            ("gonna", &["going to"]),
            ("wanna", &["want to"]),
            ("gotta", &["got to", "have to"]),
            ("theres", &["there's", "there is"]),
            ("heres", &["here's", "here is"]),
            ("whereve", &["where've", "where have"]),
            ("shouldve", &["should've", "should have"]),
            ("wouldve", &["would've", "would have"]),
            ("couldve", &["could've", "could have"]),
            // Common spelling
            ("teh", &["the"]),
            ("recieve", &["receive"]),
            ("occured", &["occurred"]),
            ("seperate", &["separate"]),
            ("definately", &["definitely"]),
            ("alot", &["a lot"]),
        ];
        entries.iter().copied().collect()
    });

/// A matched last token and its candidate replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The token as typed (original casing/punctuation).
    pub word: String,
    /// Candidate replacements, best first.
    pub suggestions: Vec<&'static str>,
}

fn normalize(token: &str) -> String {
    token
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_lowercase()
}

/// Look up suggestions for the last word of `text`. Returns `None` when
/// the token is unknown or the text is empty.
pub fn get_suggestions(text: &str) -> Option<Suggestion> {
    let last = text.split_whitespace().last()?;
    let key = normalize(last);
    let candidates = SUGGESTIONS.get(key.as_str())?;
    Some(Suggestion {
        word: last.to_string(),
        suggestions: candidates.to_vec(),
    })
}

/// Replace only the last token of `text` with `replacement`, appending a
/// trailing space so typing can continue.
pub fn apply_suggestion(text: &str, replacement: &str) -> String {
    match text.rsplit_once(char::is_whitespace) {
        Some((head, _last)) => format!("{head} {replacement} "),
        None => format!("{replacement} "),
    }
}

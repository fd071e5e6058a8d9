use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

use crate::error::EngineError;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Extracts plain text from a markup document before tokenization. The
/// tokenizer stays agnostic to any particular markup grammar; corpora that
/// need one plug an implementation into [`Tokenizer::with_markup_extractor`].
pub trait MarkupExtractor: Send + Sync {
    fn extract_plain_text(&self, raw: &str) -> Result<String, EngineError>;
}

/// Normalizing tokenizer. The pipeline is fixed: lowercase, delete hyphens,
/// apostrophes, tabs and newlines, replace remaining ASCII punctuation with a
/// space, split on single spaces, then (with stemming on) drop stopwords and
/// stem the survivors.
///
/// The stopword set keeps its apostrophe forms even though the pipeline
/// strips apostrophes first, so tokens like "dont" pass the stopword check
/// and get stemmed. That matches the established index format.
pub struct Tokenizer {
    stemming: bool,
    extractor: Option<Box<dyn MarkupExtractor>>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { stemming: true, extractor: None }
    }
}

impl Tokenizer {
    pub fn new(stemming: bool) -> Self {
        Self { stemming, extractor: None }
    }

    /// Marks the source as markup; `extractor` runs before the pipeline.
    pub fn with_markup_extractor(mut self, extractor: Box<dyn MarkupExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn stemming(&self) -> bool {
        self.stemming
    }

    /// Lazy, restartable stream of normalized terms for `raw`. Calling this
    /// again on the same input yields the same sequence.
    pub fn terms(&self, raw: &str) -> Result<Terms, EngineError> {
        let text = match &self.extractor {
            Some(extractor) => extractor.extract_plain_text(raw)?,
            None => raw.to_string(),
        };
        Ok(Terms { text: normalize(&text), pos: 0, stemming: self.stemming })
    }
}

fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            '-' | '\'' | '\t' | '\n' => {}
            c if c.is_ascii_punctuation() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Iterator over the surviving terms of one normalized input.
pub struct Terms {
    text: String,
    pos: usize,
    stemming: bool,
}

impl Iterator for Terms {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos <= self.text.len() {
            let rest = &self.text[self.pos..];
            let (token, advance) = match rest.find(' ') {
                Some(i) => (&rest[..i], i + 1),
                None => (rest, rest.len() + 1),
            };
            self.pos += advance;
            // Consecutive delimiters yield empty tokens; drop those and bare whitespace.
            if token.chars().all(char::is_whitespace) {
                continue;
            }
            if self.stemming {
                if STOPWORDS.contains(token) {
                    continue;
                }
                return Some(STEMMER.stem(token).into_owned());
            }
            return Some(token.to_string());
        }
        None
    }
}

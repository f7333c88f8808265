use crate::error::Error;
use crate::persist::{self, CorpusPaths};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN_RE: Regex =
        Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_']*").expect("valid regex");
    static ref DEFAULT_STOPWORDS: HashSet<&'static str> = {
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

/// Normalizes raw text into index terms: NFKC normalization, lowercasing,
/// stopword removal, and stemming. Index time and query time must go through
/// the same analyzer so that stored and queried terms agree.
pub struct Analyzer {
    stopwords: HashSet<String>,
    stemmer: Stemmer,
    /// Raw token -> stem memo. Append-only; one entry per distinct token.
    cache: Mutex<HashMap<String, String>>,
}

impl Analyzer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self {
            stopwords,
            stemmer: Stemmer::create(Algorithm::English),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Analyzer with the bundled English stopword list.
    pub fn with_default_stopwords() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect())
    }

    /// Analyzer for a corpus root: uses the corpus-local stopword list when
    /// present, the bundled default otherwise.
    pub fn for_corpus(paths: &CorpusPaths) -> Result<Self, Error> {
        let path = paths.stopwords();
        if path.exists() {
            Ok(Self::new(persist::load_stopwords(&path)?))
        } else {
            tracing::warn!(path = %path.display(), "stopword list not found, using bundled default");
            Ok(Self::with_default_stopwords())
        }
    }

    /// Normalize `text` into its term sequence, duplicates preserved.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut terms = Vec::new();
        let mut cache = self.cache.lock();
        for mat in TOKEN_RE.find_iter(&normalized) {
            let token = mat.as_str();
            if self.stopwords.contains(token) {
                continue;
            }
            let stem = match cache.get(token) {
                Some(stem) => stem.clone(),
                None => {
                    let stem = self.stemmer.stem(token).to_string();
                    cache.insert(token.to_string(), stem.clone());
                    stem
                }
            };
            terms.push(stem);
        }
        terms
    }

    /// Number of distinct raw tokens memoized so far.
    pub fn cached_tokens(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_analyze() {
        let analyzer = Analyzer::with_default_stopwords();
        let terms = analyzer.analyze("Running, runner's run!");
        assert!(terms.iter().any(|t| t == "run"));
    }

    #[test]
    fn keeps_numeric_tokens() {
        let analyzer = Analyzer::new(HashSet::new());
        let terms = analyzer.analyze("mach 180 flow");
        assert!(terms.contains(&"180".to_string()));
    }

    #[test]
    fn memoizes_distinct_tokens_only() {
        let analyzer = Analyzer::new(HashSet::new());
        let terms = analyzer.analyze("cat cat dog");
        assert_eq!(terms.len(), 3);
        assert_eq!(analyzer.cached_tokens(), 2);
    }

    #[test]
    fn stopwords_never_reach_the_stemmer() {
        let analyzer = Analyzer::with_default_stopwords();
        analyzer.analyze("the and of");
        assert_eq!(analyzer.cached_tokens(), 0);
    }
}

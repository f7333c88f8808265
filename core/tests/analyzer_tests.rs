use okapi_core::analyzer::Analyzer;
use std::collections::HashSet;

#[test]
fn it_lowercases_and_stems() {
    let analyzer = Analyzer::with_default_stopwords();
    let terms = analyzer.analyze("Running Runners RUN!");
    assert!(terms.contains(&"run".to_string()));
    assert!(terms.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
}

#[test]
fn it_filters_stopwords() {
    let analyzer = Analyzer::with_default_stopwords();
    let terms = analyzer.analyze("The quick brown fox and the lazy dog");
    assert!(!terms.contains(&"the".to_string()));
    assert!(!terms.contains(&"and".to_string()));
    assert!(terms.contains(&"fox".to_string()));
}

#[test]
fn custom_stopword_list_replaces_the_default() {
    let stopwords: HashSet<String> = ["fox".to_string()].into_iter().collect();
    let analyzer = Analyzer::new(stopwords);
    let terms = analyzer.analyze("the fox ran");
    assert!(!terms.contains(&"fox".to_string()));
    // "the" is only a stopword in the default list
    assert!(terms.contains(&"the".to_string()));
}

#[test]
fn index_and_query_analysis_agree() {
    let analyzer = Analyzer::with_default_stopwords();
    let doc_terms = analyzer.analyze("Aerodynamic testing of slender cones");
    let query_terms = analyzer.analyze("aerodynamic cones");
    for term in &query_terms {
        assert!(doc_terms.contains(term), "query term {term} missing from document terms");
    }
}

#[test]
fn duplicates_are_preserved_in_order() {
    let analyzer = Analyzer::new(HashSet::new());
    let terms = analyzer.analyze("cat dog cat");
    assert_eq!(terms, vec!["cat", "dog", "cat"]);
}

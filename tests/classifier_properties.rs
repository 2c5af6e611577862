// tests/classifier_properties.rs
// Behavioural checks for the tiered classifier with the built-in phrase book.

use conclave_watch::classify::{Classification, Classifier, PhraseBook, Rule};

fn clf() -> Classifier {
    Classifier::default()
}

#[test]
fn habemus_papam_with_empty_summary_is_announcement() {
    assert_eq!(
        clf().classify("Habemus Papam: new pope elected", ""),
        Classification::Announcement
    );
}

#[test]
fn white_smoke_without_election_context_is_generic() {
    let v = clf().explain(
        "White smoke rises over the Vatican",
        "crowds gather to watch the chimney",
    );
    assert_ne!(v.classification, Classification::Announcement);
    assert_eq!(v.classification, Classification::Generic);
    assert_eq!(v.rule, Rule::Score);
    assert!(v.score.unwrap_or_default() >= 1);
}

#[test]
fn white_smoke_with_new_pope_is_announcement() {
    assert_eq!(
        clf().classify("White smoke signals new pope chosen", ""),
        Classification::Announcement
    );
}

#[test]
fn white_smoke_needs_only_one_context_term() {
    let v = clf().explain("White smoke from the chimney", "The conclave has ended.");
    assert_eq!(v.classification, Classification::Announcement);
    assert_eq!(v.rule, Rule::ContextualSmoke);
}

#[test]
fn black_smoke_beats_white_smoke_and_context() {
    let samples = [
        ("Black smoke again", "White smoke expected tomorrow, says papal spokesman"),
        ("White smoke? No: black smoke", "The conclave continues"),
        ("Black smoke", ""),
    ];
    for (title, summary) in samples {
        let v = clf().explain(title, summary);
        assert_eq!(v.classification, Classification::Irrelevant, "{title} / {summary}");
        assert_eq!(v.rule, Rule::NegativeOverride);
    }
}

#[test]
fn black_smoke_beats_exact_phrases_too() {
    // tier order, not phrase strength, decides
    assert_eq!(
        clf().classify("Black smoke: no 'habemus papam' today", ""),
        Classification::Irrelevant
    );
}

#[test]
fn explanatory_pieces_never_alert() {
    let samples = [
        ("The history of habemus papam", "new pope elected in 2013"),
        ("Conclave explained", "We have a pope: what happens next"),
        ("Behind the scenes", "white smoke and the new pontiff"),
        ("What is black smoke?", ""),
        ("Pope watchers guide", "habemus papam"),
        ("Explain the vote", "cardinals elect new pope"),
    ];
    for (title, summary) in samples {
        let v = clf().explain(title, summary);
        assert_eq!(v.classification, Classification::Generic, "{title} / {summary}");
        assert_eq!(v.rule, Rule::Explanatory);
    }
}

#[test]
fn each_default_announcement_phrase_fires_alone() {
    let book = PhraseBook::default();
    for phrase in &book.announcement {
        let title = phrase.to_uppercase();
        assert_eq!(
            clf().classify(&title, "Rome, Thursday."),
            Classification::Announcement,
            "{phrase}"
        );
    }
}

#[test]
fn noise_drags_score_down() {
    // conclave + papal conclave + cardinals vote = 3, minus rumor = 0
    let v = clf().explain("Papal conclave rumor", "cardinals vote tomorrow");
    assert_eq!(v.score, Some(0));
    assert_eq!(v.classification, Classification::Irrelevant);
}

#[test]
fn enough_generic_hits_score_as_announcement() {
    // sistine chapel, vatican city, cardinals vote, voting underway,
    // smoke rises, papal election = 6
    let v = clf().explain(
        "Sistine Chapel and Vatican City: cardinals vote, voting underway",
        "Smoke rises during the papal election",
    );
    assert_eq!(v.score, Some(6));
    assert_eq!(v.rule, Rule::Score);
    assert_eq!(v.classification, Classification::Announcement);
}

#[test]
fn announcement_threshold_is_inclusive() {
    let v = clf().explain(
        "Sistine Chapel and Vatican City: cardinals vote, voting underway",
        "Results of the papal election awaited",
    );
    assert_eq!(v.score, Some(5));
    assert_eq!(v.classification, Classification::Announcement);

    let v = clf().explain(
        "Sistine Chapel and Vatican City: cardinals vote, voting underway",
        "",
    );
    assert_eq!(v.score, Some(4));
    assert_eq!(v.classification, Classification::Generic);
}

#[test]
fn single_generic_hit_is_generic() {
    let v = clf().explain("Tourists queue in Vatican City", "Museums stay open");
    assert_eq!(v.score, Some(1));
    assert_eq!(v.rule, Rule::Score);
    assert_eq!(v.classification, Classification::Generic);
}

#[test]
fn unrelated_news_is_irrelevant() {
    assert_eq!(
        clf().classify("Wildfire spreads near Rome", "Firefighters battle the blaze"),
        Classification::Irrelevant
    );
}

#[test]
fn looser_noise_list_from_toml() {
    let book = PhraseBook::from_toml_str(
        r#"noise = ["wildfire", "rumor", "fake", "hoax", "symbolic", "metaphor", "celebrity", "fiction", "speculation", "engine"]"#,
    )
    .unwrap();
    let c = Classifier::new(book).unwrap();
    // conclave + papal conclave = 2, minus fiction = -1
    assert_eq!(
        c.classify("Papal conclave fiction", "a novel"),
        Classification::Irrelevant
    );
    assert_eq!(
        clf().classify("Papal conclave fiction", "a novel"),
        Classification::Generic
    );
}

#[test]
fn classification_is_deterministic_and_case_insensitive() {
    let a = clf().explain("HABEMUS PAPAM", "");
    let b = clf().explain("habemus papam", "");
    assert_eq!(a, b);
}

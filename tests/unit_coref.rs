// Unit tests for coreference resolution: antecedent search, the sentence
// window, confidence floor and chain construction.

use lexiscope::coref::{
    resolve_coreferences, resolve_coreferences_with, CorefConfig, EntityType, GrammaticalPerson,
    MentionKind,
};

const TEXTS: &[&str] = &[
    "",
    "It rained.",
    "Acme Corp released an update. It fixed the sync bug.",
    "Sarah Connor joined Initech. She said they would ship soon. It shipped late.",
    "The company apologized. They refunded everyone. I was happy about it.",
    "Dr. Jane Smith met Mr. Brown. He thanked her.",
    "They said it was fine. It was not.",
];

// ============================================================
// Scenarios
// ============================================================

#[test]
fn feminine_pronoun_finds_the_woman() {
    let r = resolve_coreferences("Sarah Connor joined the team. She fixed the build.");
    let link = r
        .links
        .iter()
        .find(|l| l.pronoun.pronoun == "She")
        .expect("she is resolved");
    assert_eq!(link.antecedent.text, "Sarah Connor");
    assert_eq!(link.antecedent.entity_type, EntityType::Person);
    assert_eq!(link.sentence_distance, 1);
}

#[test]
fn distinct_names_stay_in_separate_chains() {
    let r = resolve_coreferences("Acme Corp shipped a patch. Globex Inc shipped too. It was slow.");
    assert_eq!(r.links.len(), 1);
    assert_eq!(r.links[0].antecedent.text, "Globex Inc");

    // Acme Corp has a single mention, so only Globex Inc forms a chain.
    assert_eq!(r.chains.len(), 1);
    let chain = &r.chains[0];
    assert_eq!(chain.head.text, "Globex Inc");
    assert_eq!(chain.mentions.len(), 2);
    assert_eq!(chain.mentions[0].kind, MentionKind::Entity);
    assert_eq!(chain.mentions[1].kind, MentionKind::Pronoun);
}

#[test]
fn repeated_name_forms_a_chain_without_pronouns() {
    let r = resolve_coreferences("Acme Corp shipped. Then Acme Corp apologized.");
    assert!(r.links.is_empty());
    assert_eq!(r.chains.len(), 1);
    assert_eq!(r.chains[0].mentions.len(), 2);
    assert!(r.chains[0]
        .mentions
        .iter()
        .all(|m| m.kind == MentionKind::Entity));
}

#[test]
fn pronoun_with_no_candidate_is_unresolved() {
    let r = resolve_coreferences("It rained.");
    assert!(r.links.is_empty());
    assert_eq!(r.unresolved.len(), 1);
    assert_eq!(r.stats.third_person_pronouns, 1);
    assert_eq!(r.stats.resolution_rate, 0.0);
}

#[test]
fn narrow_window_drops_distant_antecedents() {
    let text = "Acme Corp launched. then rain fell. more rain fell. It sold well.";
    let wide = resolve_coreferences_with(
        text,
        &CorefConfig {
            max_sentence_distance: 3,
            min_confidence: 0.0,
        },
    );
    assert_eq!(wide.links.len(), 1);
    assert_eq!(wide.links[0].sentence_distance, 3);

    let narrow = resolve_coreferences_with(
        text,
        &CorefConfig {
            max_sentence_distance: 1,
            min_confidence: 0.0,
        },
    );
    assert!(narrow.links.is_empty());
    assert_eq!(narrow.unresolved.len(), 1);
}

#[test]
fn confidence_floor_rejects_weak_links() {
    let text = "Acme Corp launched. then rain fell. more rain fell. It sold well.";
    let strict = resolve_coreferences_with(
        text,
        &CorefConfig {
            max_sentence_distance: 3,
            min_confidence: 0.99,
        },
    );
    assert!(strict.links.is_empty());
    assert_eq!(strict.stats.unresolved, 1);
}

#[test]
fn empty_text_has_no_chains() {
    let r = resolve_coreferences("");
    assert!(r.pronouns.is_empty());
    assert!(r.entities.is_empty());
    assert!(r.chains.is_empty());
    assert_eq!(r.stats.chain_count, 0);
}

// ============================================================
// Properties
// ============================================================

#[test]
fn antecedents_precede_their_pronouns() {
    for text in TEXTS {
        let r = resolve_coreferences(text);
        for link in &r.links {
            assert!(
                link.antecedent.position < link.pronoun.position,
                "{text:?}: {} -> {}",
                link.pronoun.pronoun,
                link.antecedent.text
            );
            assert!(link.antecedent.sentence_index <= link.pronoun.sentence_index);
        }
    }
}

#[test]
fn only_third_person_pronouns_are_resolved() {
    for text in TEXTS {
        let r = resolve_coreferences(text);
        assert!(r
            .links
            .iter()
            .all(|l| l.pronoun.person == GrammaticalPerson::Third));
        assert!(r
            .unresolved
            .iter()
            .all(|p| p.person == GrammaticalPerson::Third));
    }
}

#[test]
fn stats_are_consistent() {
    for text in TEXTS {
        let r = resolve_coreferences(text);
        let s = &r.stats;
        assert_eq!(s.resolved, r.links.len());
        assert_eq!(s.unresolved, r.unresolved.len());
        assert_eq!(s.resolved + s.unresolved, s.third_person_pronouns);
        assert!(s.third_person_pronouns <= s.pronoun_count);
        assert_eq!(s.chain_count, r.chains.len());
        assert!((0.0..=1.0).contains(&s.resolution_rate));
        assert!((0.0..=1.0).contains(&s.average_confidence));
        for link in &r.links {
            assert!(link.confidence >= CorefConfig::default().min_confidence);
            assert!(link.confidence <= 1.0);
        }
    }
}

#[test]
fn chains_have_ordered_mentions() {
    for text in TEXTS {
        let r = resolve_coreferences(text);
        for (i, chain) in r.chains.iter().enumerate() {
            assert_eq!(chain.id, i);
            assert!(chain.mentions.len() >= 2);
            assert_eq!(chain.mentions[0].position, chain.head.position);
            for pair in chain.mentions.windows(2) {
                assert!(pair[0].position < pair[1].position);
            }
        }
    }
}

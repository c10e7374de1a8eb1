// Heuristic coreference resolution.
//
// Every third-person pronoun looks backward for the closest compatible
// entity mention within a sentence window. Confidence decays with sentence
// distance and gains for gender and type agreement; links below the
// configured floor are reported as unresolved. Chains are keyed by the
// normalized entity text, so two different names for one referent stay in
// separate chains.

pub mod mentions;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::text::tokenize;

pub use mentions::{
    detect_entities, detect_pronouns, EntityMention, EntityType, Gender, GrammaticalPerson,
    PronounMention, PronounType,
};

const DISTANCE_PENALTY: f64 = 0.15;
const GENDER_BONUS: f64 = 0.1;
const TYPE_BONUS: f64 = 0.1;
const RELATIVE_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorefConfig {
    /// How many sentences back an antecedent may be
    pub max_sentence_distance: usize,
    /// Links below this confidence are dropped
    pub min_confidence: f64,
}

impl Default for CorefConfig {
    fn default() -> Self {
        Self {
            max_sentence_distance: 3,
            min_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreferenceLink {
    pub pronoun: PronounMention,
    pub antecedent: EntityMention,
    pub confidence: f64,
    pub sentence_distance: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Entity,
    Pronoun,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainMention {
    pub text: String,
    pub kind: MentionKind,
    pub sentence_index: usize,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreferenceChain {
    pub id: usize,
    /// First mention of the entity
    pub head: EntityMention,
    /// Entity mentions and resolved pronouns, in text order
    pub mentions: Vec<ChainMention>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorefStats {
    pub pronoun_count: usize,
    pub third_person_pronouns: usize,
    pub entity_count: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub chain_count: usize,
    /// resolved / third-person pronouns
    pub resolution_rate: f64,
    pub average_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreferenceResult {
    pub pronouns: Vec<PronounMention>,
    pub entities: Vec<EntityMention>,
    pub links: Vec<CoreferenceLink>,
    /// Third-person pronouns without an accepted antecedent
    pub unresolved: Vec<PronounMention>,
    pub chains: Vec<CoreferenceChain>,
    pub stats: CorefStats,
}

/// Resolve coreferences with the default configuration.
pub fn resolve_coreferences(text: &str) -> CoreferenceResult {
    resolve_coreferences_with(text, &CorefConfig::default())
}

pub fn resolve_coreferences_with(text: &str, config: &CorefConfig) -> CoreferenceResult {
    let tokens = tokenize(text);
    let pronouns = detect_pronouns(text, &tokens);
    let entities = detect_entities(text);

    let mut links = Vec::new();
    let mut unresolved = Vec::new();
    for pronoun in pronouns.iter().filter(|p| p.person == GrammaticalPerson::Third) {
        match resolve_one(pronoun, &entities, config) {
            Some(link) => links.push(link),
            None => unresolved.push(pronoun.clone()),
        }
    }

    let chains = build_chains(&entities, &links);
    let third_person = links.len() + unresolved.len();
    let stats = CorefStats {
        pronoun_count: pronouns.len(),
        third_person_pronouns: third_person,
        entity_count: entities.len(),
        resolved: links.len(),
        unresolved: unresolved.len(),
        chain_count: chains.len(),
        resolution_rate: if third_person == 0 {
            0.0
        } else {
            links.len() as f64 / third_person as f64
        },
        average_confidence: if links.is_empty() {
            0.0
        } else {
            links.iter().map(|l| l.confidence).sum::<f64>() / links.len() as f64
        },
    };
    debug!(
        pronouns = stats.pronoun_count,
        resolved = stats.resolved,
        chains = stats.chain_count,
        "Resolved coreferences"
    );

    CoreferenceResult {
        pronouns,
        entities,
        links,
        unresolved,
        chains,
        stats,
    }
}

/// Whether `pronoun` can refer to `entity` at all.
fn compatible(pronoun: &PronounMention, entity: &EntityMention) -> bool {
    use EntityType::*;
    match (pronoun.pronoun_type, pronoun.gender) {
        (PronounType::Relative, Gender::Neuter) => entity.entity_type != Person,
        (PronounType::Relative, _) => matches!(entity.entity_type, Person | Organization | Unknown),
        (PronounType::Demonstrative, _) => entity.entity_type != Person,
        (_, Gender::Neuter) => entity.entity_type != Person,
        (_, Gender::Masculine) => {
            matches!(entity.entity_type, Person | Unknown) && entity.gender != Gender::Feminine
        }
        (_, Gender::Feminine) => {
            matches!(entity.entity_type, Person | Unknown) && entity.gender != Gender::Masculine
        }
        // they/them: anything
        (_, Gender::Unknown) => true,
    }
}

fn gender_agrees(pronoun: &PronounMention, entity: &EntityMention) -> bool {
    match pronoun.gender {
        Gender::Masculine | Gender::Feminine => entity.gender == pronoun.gender,
        Gender::Neuter => entity.gender == Gender::Neuter,
        Gender::Unknown => false,
    }
}

fn type_agrees(pronoun: &PronounMention, entity: &EntityMention) -> bool {
    use EntityType::*;
    match (pronoun.pronoun_type, pronoun.gender) {
        (PronounType::Relative, Gender::Neuter) | (_, Gender::Neuter) => {
            matches!(entity.entity_type, Organization | Product | Location | Thing)
        }
        (PronounType::Relative, _) => entity.entity_type == Person,
        (_, Gender::Masculine | Gender::Feminine) => entity.entity_type == Person,
        (_, Gender::Unknown) => {
            pronoun.plural && matches!(entity.entity_type, Organization | Person)
        }
    }
}

/// 1 - 0.15 * distance, plus gender, type and same-sentence relative bonuses.
fn link_confidence(pronoun: &PronounMention, entity: &EntityMention, distance: usize) -> f64 {
    let mut confidence = 1.0 - DISTANCE_PENALTY * distance as f64;
    if gender_agrees(pronoun, entity) {
        confidence += GENDER_BONUS;
    }
    if type_agrees(pronoun, entity) {
        confidence += TYPE_BONUS;
    }
    if pronoun.pronoun_type == PronounType::Relative && distance == 0 {
        confidence += RELATIVE_BONUS;
    }
    confidence.clamp(0.0, 1.0)
}

fn resolve_one(
    pronoun: &PronounMention,
    entities: &[EntityMention],
    config: &CorefConfig,
) -> Option<CoreferenceLink> {
    let antecedent = entities
        .iter()
        .filter(|e| e.position < pronoun.position && e.end <= pronoun.position)
        .filter(|e| {
            pronoun.sentence_index >= e.sentence_index
                && pronoun.sentence_index - e.sentence_index <= config.max_sentence_distance
        })
        .filter(|e| compatible(pronoun, e))
        .max_by_key(|e| e.position)?;

    let sentence_distance = pronoun.sentence_index - antecedent.sentence_index;
    let confidence = link_confidence(pronoun, antecedent, sentence_distance);
    (confidence >= config.min_confidence).then(|| CoreferenceLink {
        pronoun: pronoun.clone(),
        antecedent: antecedent.clone(),
        confidence,
        sentence_distance,
    })
}

/// Chains with at least two mentions, ordered by first mention.
fn build_chains(entities: &[EntityMention], links: &[CoreferenceLink]) -> Vec<CoreferenceChain> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, (EntityMention, Vec<ChainMention>)> = HashMap::new();

    for e in entities {
        let key = e.key();
        let entry = grouped.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (e.clone(), Vec::new())
        });
        entry.1.push(ChainMention {
            text: e.text.clone(),
            kind: MentionKind::Entity,
            sentence_index: e.sentence_index,
            position: e.position,
        });
    }
    for link in links {
        if let Some(entry) = grouped.get_mut(&link.antecedent.key()) {
            entry.1.push(ChainMention {
                text: link.pronoun.pronoun.clone(),
                kind: MentionKind::Pronoun,
                sentence_index: link.pronoun.sentence_index,
                position: link.pronoun.position,
            });
        }
    }

    order
        .into_iter()
        .filter_map(|key| grouped.remove(&key))
        .filter(|(_, mentions)| mentions.len() > 1)
        .enumerate()
        .map(|(id, (head, mut mentions))| {
            mentions.sort_by_key(|m| m.position);
            CoreferenceChain { id, head, mentions }
        })
        .collect()
}

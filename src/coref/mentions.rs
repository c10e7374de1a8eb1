// Pronoun and entity mention detection.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::matcher::{capitalized_phrases, compile};
use crate::text::{gap_has_clause_break, sentence_spans, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Organization,
    Product,
    Location,
    Thing,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronounType {
    Personal,
    Possessive,
    Reflexive,
    Demonstrative,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalPerson {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub text: String,
    pub entity_type: EntityType,
    pub gender: Gender,
    pub sentence_index: usize,
    /// Byte offset of the mention
    pub position: usize,
    pub end: usize,
}

impl EntityMention {
    /// Key that groups mentions of the same entity: lowercase, leading
    /// article dropped.
    pub fn key(&self) -> String {
        let lower = self.text.to_lowercase();
        lower.strip_prefix("the ").unwrap_or(&lower).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronounMention {
    pub pronoun: String,
    pub pronoun_type: PronounType,
    pub gender: Gender,
    pub person: GrammaticalPerson,
    pub plural: bool,
    pub sentence_index: usize,
    pub position: usize,
}

use Gender::{Feminine as F, Masculine as M, Neuter as N, Unknown as U};
use GrammaticalPerson::{First, Second, Third};
use PronounType::*;

/// (pronoun, type, gender, person, plural)
const PRONOUNS: &[(&str, PronounType, Gender, GrammaticalPerson, bool)] = &[
    ("he", Personal, M, Third, false),
    ("him", Personal, M, Third, false),
    ("his", Possessive, M, Third, false),
    ("himself", Reflexive, M, Third, false),
    ("she", Personal, F, Third, false),
    ("her", Personal, F, Third, false),
    ("hers", Possessive, F, Third, false),
    ("herself", Reflexive, F, Third, false),
    ("it", Personal, N, Third, false),
    ("its", Possessive, N, Third, false),
    ("itself", Reflexive, N, Third, false),
    ("they", Personal, U, Third, true),
    ("them", Personal, U, Third, true),
    ("their", Possessive, U, Third, true),
    ("theirs", Possessive, U, Third, true),
    ("themselves", Reflexive, U, Third, true),
    ("this", Demonstrative, N, Third, false),
    ("that", Demonstrative, N, Third, false),
    ("these", Demonstrative, N, Third, true),
    ("those", Demonstrative, N, Third, true),
    ("who", Relative, U, Third, false),
    ("whom", Relative, U, Third, false),
    ("whose", Relative, U, Third, false),
    ("which", Relative, N, Third, false),
    ("i", Personal, U, First, false),
    ("me", Personal, U, First, false),
    ("my", Possessive, U, First, false),
    ("mine", Possessive, U, First, false),
    ("myself", Reflexive, U, First, false),
    ("we", Personal, U, First, true),
    ("us", Personal, U, First, true),
    ("our", Possessive, U, First, true),
    ("ours", Possessive, U, First, true),
    ("ourselves", Reflexive, U, First, true),
    ("you", Personal, U, Second, false),
    ("your", Possessive, U, Second, false),
    ("yours", Possessive, U, Second, false),
    ("yourself", Reflexive, U, Second, false),
    ("yourselves", Reflexive, U, Second, true),
];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "ltd", "llc", "co", "company", "group", "bank",
    "university", "foundation", "labs", "technologies", "systems", "institute",
    "association", "agency", "partners", "holdings", "gmbh", "ag", "plc", "ventures",
    "capital", "media", "studios", "motors", "airlines",
];

const KNOWN_ORGS: &[&str] = &[
    "google", "microsoft", "apple", "amazon", "meta", "openai", "anthropic", "netflix",
    "salesforce", "oracle", "ibm", "intel", "nvidia", "samsung", "tesla", "spotify",
    "adobe", "hubspot", "shopify", "uber", "airbnb", "twitter", "linkedin",
];

const PERSON_TITLES: &[(&str, Gender)] = &[
    ("mr", M), ("mrs", F), ("ms", F), ("miss", F), ("dr", U), ("prof", U),
    ("professor", U), ("sir", M), ("lady", F), ("lord", M), ("president", U),
    ("senator", U), ("judge", U),
];

const MALE_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "joseph",
    "thomas", "charles", "daniel", "matthew", "mark", "paul", "steven", "andrew",
    "peter", "george", "kevin", "brian", "jason", "eric", "tim", "tom", "sam", "bill",
    "elon", "jeff", "satya", "sundar", "carlos", "juan", "luis", "jose", "pedro",
];

const FEMALE_NAMES: &[&str] = &[
    "mary", "patricia", "jennifer", "linda", "elizabeth", "barbara", "susan", "jessica",
    "sarah", "karen", "nancy", "lisa", "emily", "emma", "olivia", "anna", "laura",
    "julia", "rachel", "maria", "sofia", "ana", "lucia", "jane", "alice", "kate",
    "sheryl", "marissa", "susan", "ginni",
];

const LOCATIONS: &[&str] = &[
    "america", "united states", "usa", "canada", "mexico", "brazil", "argentina",
    "spain", "portugal", "france", "germany", "italy", "england", "london", "paris",
    "berlin", "madrid", "lisbon", "tokyo", "japan", "china", "india", "europe", "asia",
    "africa", "australia", "new york", "california", "texas", "san francisco",
    "seattle", "chicago", "boston", "são paulo", "rio de janeiro", "mexico city",
];

const PRODUCT_CUES: &[&str] = &[
    "app", "pro", "max", "plus", "suite", "cloud", "os", "studio", "mini", "ultra",
    "air", "phone", "pad", "book", "watch", "x", "one",
];

/// Words that open a capitalized phrase without naming anything.
const NON_ENTITIES: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "ok", "okay", "thanks", "hello",
];

/// Nouns that make "the X" a definite-description entity.
const DEFINITE_NOUNS: &[(&str, EntityType, Gender)] = &[
    ("company", EntityType::Organization, N),
    ("firm", EntityType::Organization, N),
    ("brand", EntityType::Organization, N),
    ("startup", EntityType::Organization, N),
    ("vendor", EntityType::Organization, N),
    ("product", EntityType::Product, N),
    ("app", EntityType::Product, N),
    ("application", EntityType::Product, N),
    ("device", EntityType::Product, N),
    ("software", EntityType::Product, N),
    ("tool", EntityType::Product, N),
    ("platform", EntityType::Product, N),
    ("website", EntityType::Product, N),
    ("service", EntityType::Product, N),
    ("phone", EntityType::Product, N),
    ("city", EntityType::Location, N),
    ("country", EntityType::Location, N),
    ("man", EntityType::Person, M),
    ("woman", EntityType::Person, F),
    ("ceo", EntityType::Person, U),
    ("founder", EntityType::Person, U),
    ("customer", EntityType::Person, U),
    ("user", EntityType::Person, U),
];

static DEFINITE: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b[Tt]he (company|firm|brand|startup|vendor|product|app|application|device|software|tool|platform|website|service|phone|city|country|man|woman|ceo|founder|customer|user)\b")
});

fn sentence_index_at(sentences: &[(usize, usize)], position: usize) -> usize {
    sentences
        .iter()
        .position(|&(s, e)| s <= position && position < e)
        .unwrap_or(0)
}

/// Type and gender of a capitalized phrase.
pub fn classify_entity(name: &str) -> (EntityType, Gender) {
    let lower = name.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return (EntityType::Unknown, U);
    };

    if ORG_SUFFIXES.contains(last) || KNOWN_ORGS.contains(&lower.as_str()) {
        return (EntityType::Organization, N);
    }
    if let Some(&(_, gender)) = PERSON_TITLES.iter().find(|(t, _)| t == first) {
        return (EntityType::Person, gender);
    }
    if MALE_NAMES.contains(first) {
        return (EntityType::Person, M);
    }
    if FEMALE_NAMES.contains(first) {
        return (EntityType::Person, F);
    }
    if LOCATIONS.contains(&lower.as_str()) {
        return (EntityType::Location, N);
    }
    if words.len() > 1 && (PRODUCT_CUES.contains(last) || last.chars().any(|c| c.is_ascii_digit())) {
        return (EntityType::Product, N);
    }
    (EntityType::Unknown, U)
}

/// Join "Dr" + ". " + "Jane Smith" into one phrase.
fn merge_titles(text: &str, phrases: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::with_capacity(phrases.len());
    for (start, end) in phrases {
        if let Some(prev) = out.last_mut() {
            let title = text[prev.0..prev.1].to_lowercase();
            let gap = &text[prev.1..start];
            if PERSON_TITLES.iter().any(|(t, _)| *t == title) && (gap == ". " || gap == " ") {
                prev.1 = end;
                continue;
            }
        }
        out.push((start, end));
    }
    out
}

/// Entity mentions: capitalized phrases plus definite descriptions.
pub fn detect_entities(text: &str) -> Vec<EntityMention> {
    let sentences = sentence_spans(text);
    let mut entities: Vec<EntityMention> = Vec::new();

    for (start, end) in merge_titles(text, capitalized_phrases(text)) {
        let name = &text[start..end];
        let first = name.split_whitespace().next().unwrap_or(name).to_lowercase();
        if NON_ENTITIES.contains(&first.as_str()) {
            continue;
        }
        let (entity_type, gender) = classify_entity(name);
        entities.push(EntityMention {
            text: name.to_string(),
            entity_type,
            gender,
            sentence_index: sentence_index_at(&sentences, start),
            position: start,
            end,
        });
    }

    for caps in DEFINITE.captures_iter(text) {
        let (Some(whole), Some(noun)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(&(_, entity_type, gender)) = DEFINITE_NOUNS
            .iter()
            .find(|(n, _, _)| *n == noun.as_str().to_lowercase())
        else {
            continue;
        };
        if entities
            .iter()
            .any(|e| e.position < whole.end() && whole.start() < e.end)
        {
            continue;
        }
        entities.push(EntityMention {
            text: whole.as_str().to_string(),
            entity_type,
            gender,
            sentence_index: sentence_index_at(&sentences, whole.start()),
            position: whole.start(),
            end: whole.end(),
        });
    }

    entities.sort_by_key(|e| e.position);
    entities
}

/// Whether the token after `tokens[i]` looks like a noun it determines
/// ("this product" rather than "this is").
fn followed_by_noun(text: &str, tokens: &[Token], i: usize) -> bool {
    let Some(next) = tokens.get(i + 1) else {
        return false;
    };
    if next.sentence_index != tokens[i].sentence_index
        || gap_has_clause_break(text, tokens[i].end, next.start)
    {
        return false;
    }
    let w = next.normalized.as_str();
    !next.is_stopword && !w.ends_with("ly") && !w.ends_with("ed") && !w.ends_with('s')
}

/// Pronoun mentions among `tokens`.
pub fn detect_pronouns(text: &str, tokens: &[Token]) -> Vec<PronounMention> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, tok)| {
            let &(_, pronoun_type, gender, person, plural) = PRONOUNS
                .iter()
                .find(|(p, ..)| *p == tok.normalized)?;
            if pronoun_type == Demonstrative && followed_by_noun(text, tokens, i) {
                return None;
            }
            Some(PronounMention {
                pronoun: tok.text.clone(),
                pronoun_type,
                gender,
                person,
                plural,
                sentence_index: tok.sentence_index,
                position: tok.start,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn entity_types_from_cues() {
        assert_eq!(classify_entity("Acme Corp").0, EntityType::Organization);
        assert_eq!(classify_entity("Dr. Jane Smith"), (EntityType::Person, U));
        assert_eq!(classify_entity("Sarah Connor"), (EntityType::Person, F));
        assert_eq!(classify_entity("Lisbon").0, EntityType::Location);
        assert_eq!(classify_entity("Pixel 8").0, EntityType::Product);
        assert_eq!(classify_entity("Zorblax").0, EntityType::Unknown);
    }

    #[test]
    fn demonstrative_before_noun_is_a_determiner() {
        let text = "This laptop works. This is great.";
        let pronouns = detect_pronouns(text, &tokenize(text));
        assert_eq!(pronouns.len(), 1);
        assert_eq!(pronouns[0].sentence_index, 1);
    }

    #[test]
    fn titles_join_the_following_name() {
        let entities = detect_entities("We met Dr. Jane Smith yesterday.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Dr. Jane Smith");
        assert_eq!(entities[0].entity_type, EntityType::Person);
    }

    #[test]
    fn definite_descriptions_are_entities() {
        let entities = detect_entities("I called the company twice.");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_type, EntityType::Organization);
        assert_eq!(entities[0].key(), "company");
    }
}

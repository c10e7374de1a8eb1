// Colored terminal reports for each analyzer.
//
// One `display_*` function per result type. main.rs calls these unless
// `--json` was given.

use colored::{ColoredString, Colorize};

use super::{truncate_chars, variant_name};
use crate::absa::{AbsaResult, AspectPolarity};
use crate::analysis::{DocumentReport, MultilingualAnalysis, TextAnalysis};
use crate::coref::CoreferenceResult;
use crate::lexicon::comparative::ComparisonDirection;
use crate::lexicon::sentiment::SentimentLabel;
use crate::lexicon::{CertaintyAnalysis, ComparisonAnalysis, TemporalAnalysis};
use crate::patterns::{IntentClassification, QuotationAnalysis};
use crate::topics::TopicModelResult;

fn header(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
}

fn colorize_score(score: f64) -> ColoredString {
    let s = format!("{score:+.2}");
    if score > 0.15 {
        s.green()
    } else if score < -0.15 {
        s.red()
    } else {
        s.normal()
    }
}

fn colorize_label(label: SentimentLabel) -> ColoredString {
    let name = variant_name(&label);
    match label {
        SentimentLabel::Positive => name.green().bold(),
        SentimentLabel::Negative => name.red().bold(),
        SentimentLabel::Neutral => name.dimmed(),
    }
}

fn colorize_polarity(polarity: AspectPolarity) -> ColoredString {
    let name = variant_name(&polarity);
    match polarity {
        AspectPolarity::Positive => name.green(),
        AspectPolarity::Negative => name.red(),
        AspectPolarity::Mixed => name.yellow(),
        AspectPolarity::Neutral => name.dimmed(),
    }
}

pub fn display_text_analysis(analysis: &TextAnalysis) {
    header("Text Analysis");
    let s = &analysis.sentiment;
    println!(
        "  Sentiment: {} ({})  matched terms: {}",
        colorize_label(s.label),
        colorize_score(s.score),
        s.matched_terms
    );
    match &analysis.readability {
        Some(r) => println!(
            "  Readability: {:.1} reading ease, grade {:.1} ({})",
            r.flesch_reading_ease,
            r.flesch_kincaid_grade,
            variant_name(&r.level)
        ),
        None => println!("  Readability: {}", "n/a".dimmed()),
    }
    let st = &analysis.statistics;
    println!(
        "  Words: {}  Unique: {}  Sentences: {}  Paragraphs: {}  Diversity: {:.2}",
        st.words, st.unique_words, st.sentences, st.paragraphs, st.lexical_diversity
    );
    println!(
        "  Certainty: {:.2} ({})  hedges: {}  boosters: {}",
        analysis.hedges.score,
        variant_name(&analysis.hedges.level),
        analysis.hedges.hedges.len(),
        analysis.hedges.boosters.len()
    );
    println!("  Negations: {}", analysis.negations.negation_count);

    if !analysis.keyphrases.is_empty() {
        println!("\n  {}", "Keyphrases:".dimmed());
        for k in &analysis.keyphrases {
            println!("    {:>6.2}  {}", k.score, k.text);
        }
    }
}

pub fn display_absa(result: &AbsaResult) {
    header(&format!("Aspect Sentiment ({} aspects)", result.stats.total_aspects));
    if result.aspects.is_empty() {
        println!("  No aspects found.");
        return;
    }
    println!(
        "  {:<24} {:<12} {:>6}  {:>5}  {}",
        "Aspect".dimmed(),
        "Category".dimmed(),
        "Score".dimmed(),
        "Conf".dimmed(),
        "Polarity".dimmed(),
    );
    println!("  {}", "-".repeat(64).dimmed());
    for a in &result.aspects {
        println!(
            "  {:<24} {:<12} {:>6}  {:>5.2}  {}",
            truncate_chars(&a.aspect.term, 24),
            variant_name(&a.aspect.category),
            colorize_score(a.score),
            a.confidence,
            colorize_polarity(a.polarity),
        );
    }
    println!();
    for c in result.categories.iter().filter(|c| c.aspect_count > 0) {
        println!(
            "  {:<12} {} aspect(s), avg {}  {}",
            variant_name(&c.category),
            c.aspect_count,
            colorize_score(c.average_score),
            colorize_polarity(c.polarity)
        );
    }
    println!(
        "\n  Overall: {} {}",
        colorize_score(result.overall_score),
        colorize_polarity(result.overall_polarity)
    );
}

pub fn display_coreference(result: &CoreferenceResult) {
    header(&format!("Coreference ({} chains)", result.chains.len()));
    for link in &result.links {
        println!(
            "  {:<10} -> {:<24} conf {:.2}  ({} sentence(s) back)",
            link.pronoun.pronoun.cyan(),
            link.antecedent.text,
            link.confidence,
            link.sentence_distance
        );
    }
    for p in &result.unresolved {
        println!("  {:<10} -> {}", p.pronoun.yellow(), "unresolved".dimmed());
    }
    for chain in &result.chains {
        let mentions: Vec<&str> = chain.mentions.iter().map(|m| m.text.as_str()).collect();
        println!(
            "  Chain {} [{}]: {}",
            chain.id,
            variant_name(&chain.head.entity_type),
            mentions.join(" -> ")
        );
    }
    let s = &result.stats;
    println!(
        "\n  Pronouns: {}  Entities: {}  Resolved: {}  Rate: {:.0}%",
        s.pronoun_count,
        s.entity_count,
        s.resolved,
        s.resolution_rate * 100.0
    );
}

pub fn display_certainty(result: &CertaintyAnalysis) {
    header("Certainty");
    println!(
        "  Score: {:.2} ({})  hedge density: {:.3}",
        result.score,
        variant_name(&result.level),
        result.hedge_density
    );
    for h in &result.hedges {
        println!(
            "  {} {:<20} {} / {}",
            "~".yellow(),
            h.text,
            variant_name(&h.category),
            variant_name(&h.tier)
        );
    }
    for b in &result.boosters {
        println!("  {} {}", "+".green(), b.text);
    }
}

pub fn display_intent(result: &IntentClassification) {
    header("Query Intent");
    println!(
        "  Primary: {} (confidence {:.2}){}",
        variant_name(&result.primary).bold(),
        result.confidence,
        if result.is_question { "  [question]" } else { "" }
    );
    for s in &result.secondary {
        println!("  Also: {} ({:.2})", variant_name(&s.intent), s.score);
    }
}

pub fn display_comparative(result: &ComparisonAnalysis) {
    header(&format!("Comparisons ({})", result.comparisons.len()));
    for c in &result.comparisons {
        let direction = match c.direction {
            ComparisonDirection::Positive => "+".green(),
            ComparisonDirection::Negative => "-".red(),
            ComparisonDirection::Neutral => "=".normal(),
        };
        println!(
            "  {} {:<28} {:<12} {:<11} strength {:.2}",
            direction,
            truncate_chars(&c.text, 28),
            variant_name(&c.kind),
            variant_name(&c.dimension),
            c.strength
        );
    }
    for p in &result.pairs {
        match &p.left {
            Some(left) => println!("  Pair: {} vs {}", left, p.right),
            None => println!("  Pair: ? vs {}", p.right),
        }
    }
    println!("  Net direction: {}", colorize_score(result.summary.net_direction));
}

pub fn display_temporal(result: &TemporalAnalysis) {
    header(&format!("Temporal Expressions (reference {})", result.reference_date));
    for e in &result.expressions {
        let date = e
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let recency = e
            .recency_score
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:<10} {:<10} recency {}",
            truncate_chars(&e.text, 24),
            variant_name(&e.kind),
            date,
            recency
        );
    }
    match result.overall_recency {
        Some(r) => println!("  Overall recency: {r:.1}"),
        None => println!("  Overall recency: {}", "n/a".dimmed()),
    }
    println!("  Focus: {}", variant_name(&result.focus));
}

pub fn display_quotations(result: &QuotationAnalysis) {
    header(&format!("Quotations ({})", result.quotations.len()));
    for q in &result.quotations {
        let speaker = q
            .attribution
            .as_ref()
            .map(|a| a.speaker.as_str())
            .unwrap_or("unattributed");
        println!(
            "  [{}] \"{}\" - {}",
            variant_name(&q.kind),
            truncate_chars(&q.text, 80).dimmed(),
            speaker
        );
    }
    println!(
        "  Attributed: {}  Unattributed: {}  Quoted: {:.0}%",
        result.attributed_count,
        result.unattributed_count,
        result.quoted_ratio * 100.0
    );
}

pub fn display_multilingual(result: &MultilingualAnalysis) {
    header("Language");
    println!(
        "  Detected: {} (confidence {:.2}){}",
        result.language.code().bold(),
        result.confidence,
        if result.is_mixed { "  [mixed]".yellow().to_string() } else { String::new() }
    );
    for seg in &result.segments {
        println!(
            "  {}  {}  {}",
            seg.language.code(),
            colorize_score(seg.sentiment_score),
            truncate_chars(&seg.text, 80).dimmed()
        );
    }
    println!(
        "  Sentiment: {} ({})",
        colorize_label(result.sentiment.label),
        colorize_score(result.sentiment.score)
    );
    if !result.keywords.is_empty() {
        let words: Vec<String> = result
            .keywords
            .iter()
            .map(|k| format!("{} ({})", k.word, k.count))
            .collect();
        println!("  Keywords: {}", words.join(", "));
    }
}

pub fn display_topics(result: &TopicModelResult) {
    header(&format!("Topics ({})", result.topics.len()));
    if result.topics.is_empty() {
        println!("  No topics. Corpus too small or too uniform.");
    }
    for t in &result.topics {
        println!(
            "\n  {} {}  {} docs, coherence {:.2}",
            format!("#{}", t.id).dimmed(),
            t.label.bold(),
            t.document_count,
            t.coherence_score
        );
        println!("    {}", t.keywords.join(", ").dimmed());
    }
    if !result.outlier_documents.is_empty() {
        println!("\n  Outliers: {}", result.outlier_documents.join(", ").yellow());
    }
    let m = &result.model_metrics;
    println!(
        "\n  Coherence: {:.2}  Diversity: {:.2}  Iterations: {}{}",
        m.avg_coherence,
        m.topic_diversity,
        m.iterations,
        if m.converged { "" } else { " (not converged)" }
    );
}

/// One line per document.
pub fn display_batch(reports: &[DocumentReport]) {
    header(&format!("Batch ({} documents)", reports.len()));
    println!(
        "  {:<28} {:>6}  {:>7}  {:>7}  {:>6}",
        "Document".dimmed(),
        "Sent.".dimmed(),
        "Certain".dimmed(),
        "Aspects".dimmed(),
        "Chains".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());
    for r in reports {
        println!(
            "  {:<28} {:>6}  {:>7.2}  {:>7}  {:>6}",
            truncate_chars(&r.id, 28),
            colorize_score(r.analysis.sentiment.score),
            r.analysis.hedges.score,
            r.absa.stats.total_aspects,
            r.coreference.chains.len()
        );
    }
}

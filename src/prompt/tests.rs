use super::*;
use crate::constants::{DESCRIPTION_MAX_CHARS, MISSING_DESCRIPTION, REPLY_LABELS};
use crate::ranking::Candidate;

fn candidate(id: &str, title: &str, similarity: f32) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: title.to_string(),
        brand: "Kohler".to_string(),
        description: Some("Fireclay undermount sink".to_string()),
        price: Some(349.99),
        distance: 1.0 - similarity,
        similarity,
    }
}

#[test]
fn test_single_candidate_prompt_is_exact() {
    let prompt = build_prompt("ceramic sink", &[candidate("A1", "Ceramic Kitchen Sink", 0.95)]);

    let expected = "SEARCH QUERY: \"ceramic sink\"\n\n\
TASK: From the following 1 similar product, select the SINGLE best match for \"ceramic sink\".\n\n\
CANDIDATES:\n\
Product ID: A1\n\
Title: Ceramic Kitchen Sink\n\
Brand: Kohler\n\
Price: $349.99\n\
Description: Fireclay undermount sink\n\
Similarity Score: 0.95\n\n\
SELECTION CRITERIA:\n\
- Best relevance to \"ceramic sink\"\n\
- Quality and features\n\
- Value for money\n\
- Brand reputation\n\n\
RESPONSE FORMAT:\n\
SELECTED_PRODUCT_ID: [exact product_id]\n\
PRODUCT_NAME: [title]\n\
REASONING: [2-3 sentences]\n\
CONFIDENCE: [High/Medium/Low]\n\
KEY_FEATURES: [main features]\n\n\
Choose exactly ONE product and be decisive.";

    assert_eq!(prompt, expected);
}

#[test]
fn test_prompt_lists_candidates_in_rank_order_with_separator() {
    let candidates = vec![
        candidate("A", "Ceramic Kitchen Sink", 0.95),
        candidate("C", "Ceramic Vase", 0.7),
        candidate("B", "Steel Sink", 0.6),
    ];

    let prompt = build_prompt("ceramic sink", &candidates);

    assert!(prompt.contains("From the following 3 similar products"));
    let a = prompt.find("Product ID: A\n").unwrap();
    let c = prompt.find("Product ID: C\n").unwrap();
    let b = prompt.find("Product ID: B\n").unwrap();
    assert!(a < c && c < b);
    assert_eq!(prompt.matches("\n\n---\n\n").count(), 2);
}

#[test]
fn test_prompt_contains_every_reply_label() {
    let prompt = build_prompt("lamp", &[candidate("1", "Desk Lamp", 0.8)]);

    for label in REPLY_LABELS {
        assert!(prompt.contains(&format!("\n{label}: [")), "missing {label}");
    }
}

#[test]
fn test_prompt_is_deterministic() {
    let candidates = vec![candidate("A", "x", 0.9), candidate("B", "y", 0.8)];
    assert_eq!(
        build_prompt("q", &candidates),
        build_prompt("q", &candidates)
    );
}

#[test]
fn test_missing_price_renders_zero() {
    let mut c = candidate("1", "Sink", 0.5);
    c.price = None;

    assert!(render_candidate(&c).contains("\nPrice: $0\n"));
}

#[test]
fn test_price_formatting() {
    assert_eq!(format_price(Some(349.0)), "349");
    assert_eq!(format_price(Some(19.99)), "19.99");
    assert_eq!(format_price(None), "0");
}

#[test]
fn test_missing_or_blank_description_uses_placeholder() {
    let mut c = candidate("1", "Sink", 0.5);
    c.description = None;
    assert!(render_candidate(&c).contains(&format!("Description: {MISSING_DESCRIPTION}")));

    c.description = Some("   ".to_string());
    assert!(render_candidate(&c).contains(&format!("Description: {MISSING_DESCRIPTION}")));
}

#[test]
fn test_description_truncated_to_limit() {
    let long = "é".repeat(DESCRIPTION_MAX_CHARS + 50);

    let truncated = truncate_description(Some(&long));

    assert_eq!(truncated.chars().count(), DESCRIPTION_MAX_CHARS);
    assert_eq!(truncate_description(Some("short")), "short");
}

#[test]
fn test_similarity_rounded_to_three_places() {
    assert_eq!(format_similarity(0.95), "0.95");
    assert_eq!(format_similarity(0.87349), "0.873");
    assert_eq!(format_similarity(1.0), "1");
    assert_eq!(format_similarity(-0.0001), "0");
}

#[test]
fn test_summary_omits_descriptions() {
    let summary = render_candidate_summary(&[
        candidate("A", "Ceramic Kitchen Sink", 0.95),
        candidate("B", "Steel Sink", 0.6),
    ]);

    assert!(summary.starts_with("Product ID: A\nTitle: Ceramic Kitchen Sink\n"));
    assert!(!summary.contains("Description:"));
    assert!(summary.contains("\n\n---\n\nProduct ID: B\n"));
    assert!(summary.ends_with("Similarity Score: 0.6"));
}

use super::*;
use crate::prompt::build_prompt;
use crate::ranking::Candidate;

fn candidate(id: &str, title: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: title.to_string(),
        brand: "Brand".to_string(),
        description: None,
        price: Some(10.0),
        distance: 0.1,
        similarity: 0.9,
    }
}

fn sinks() -> Vec<Candidate> {
    vec![
        candidate("A", "Ceramic Kitchen Sink"),
        candidate("C", "Ceramic Vase"),
        candidate("B", "Steel Sink"),
    ]
}

const VALID_REPLY: &str = "SELECTED_PRODUCT_ID: A
PRODUCT_NAME: Ceramic Kitchen Sink
REASONING: It is the only ceramic sink. The others are a vase and a steel sink.
CONFIDENCE: High
KEY_FEATURES: Fireclay, undermount, single bowl";

#[test]
fn test_parses_all_fields() {
    let selection = parse_selection(VALID_REPLY, &sinks()).unwrap();

    assert_eq!(selection.selected_id, "A");
    assert_eq!(selection.product_name, "Ceramic Kitchen Sink");
    assert_eq!(
        selection.reasoning,
        "It is the only ceramic sink. The others are a vase and a steel sink."
    );
    assert_eq!(selection.confidence, Confidence::High);
    assert_eq!(selection.key_features, "Fireclay, undermount, single bowl");
}

#[test]
fn test_round_trip_with_prompt_builder() {
    let candidates = sinks();
    let prompt = build_prompt("ceramic sink", &candidates);
    assert!(prompt.contains("Product ID: C"));

    let expected = Selection {
        selected_id: "C".to_string(),
        product_name: "Ceramic Vase".to_string(),
        reasoning: "Closest ceramic match on offer.".to_string(),
        confidence: Confidence::Low,
        key_features: "Glazed ceramic".to_string(),
    };
    let reply = format!(
        "SELECTED_PRODUCT_ID: {}\nPRODUCT_NAME: {}\nREASONING: {}\nCONFIDENCE: {}\nKEY_FEATURES: {}\n",
        expected.selected_id,
        expected.product_name,
        expected.reasoning,
        expected.confidence,
        expected.key_features,
    );

    assert_eq!(parse_selection(&reply, &candidates).unwrap(), expected);
}

#[test]
fn test_unknown_id_is_rejected() {
    let reply = VALID_REPLY.replace("SELECTED_PRODUCT_ID: A", "SELECTED_PRODUCT_ID: Z");

    let failure = parse_selection(&reply, &sinks()).unwrap_err();

    assert_eq!(
        failure.reason,
        ParseFailureReason::UnknownCandidate {
            id: "Z".to_string()
        }
    );
    assert_eq!(failure.raw_text, reply);
}

#[test]
fn test_id_match_is_exact() {
    let lower = VALID_REPLY.replace("SELECTED_PRODUCT_ID: A", "SELECTED_PRODUCT_ID: a");
    assert!(parse_selection(&lower, &sinks()).is_err());

    let partial = VALID_REPLY.replace("SELECTED_PRODUCT_ID: A", "SELECTED_PRODUCT_ID: A1");
    assert!(parse_selection(&partial, &sinks()).is_err());
}

#[test]
fn test_missing_confidence_is_reported() {
    let reply = VALID_REPLY.replace("CONFIDENCE: High\n", "");

    let failure = parse_selection(&reply, &sinks()).unwrap_err();

    assert_eq!(
        failure.reason,
        ParseFailureReason::MissingField {
            label: "CONFIDENCE"
        }
    );
}

#[test]
fn test_blank_field_counts_as_missing() {
    let reply = VALID_REPLY.replace("PRODUCT_NAME: Ceramic Kitchen Sink", "PRODUCT_NAME:");

    let failure = parse_selection(&reply, &sinks()).unwrap_err();

    assert!(matches!(
        failure.reason,
        ParseFailureReason::MissingField {
            label: "PRODUCT_NAME"
        }
    ));
}

#[test]
fn test_invalid_confidence_is_rejected() {
    let reply = VALID_REPLY.replace("CONFIDENCE: High", "CONFIDENCE: Very sure");

    let failure = parse_selection(&reply, &sinks()).unwrap_err();

    assert!(matches!(
        failure.reason,
        ParseFailureReason::InvalidConfidence { .. }
    ));
}

#[test]
fn test_confidence_is_case_insensitive_and_normalized() {
    let reply = VALID_REPLY.replace("CONFIDENCE: High", "CONFIDENCE: medium.");

    let selection = parse_selection(&reply, &sinks()).unwrap();

    assert_eq!(selection.confidence, Confidence::Medium);
    assert_eq!(selection.confidence.to_string(), "Medium");
}

#[test]
fn test_empty_reply() {
    let failure = parse_selection("   \n", &sinks()).unwrap_err();
    assert_eq!(failure.reason, ParseFailureReason::EmptyReply);
}

#[test]
fn test_markdown_and_bracketed_values() {
    let reply = "Here is my pick:

**SELECTED_PRODUCT_ID:** [B],
- **Product_Name**: \"Steel Sink\"
REASONING: (Durable and affordable)
confidence: 'low'
KEY_FEATURES: Stainless steel";

    let selection = parse_selection(reply, &sinks()).unwrap();

    assert_eq!(selection.selected_id, "B");
    assert_eq!(selection.product_name, "\"Steel Sink\"");
    assert_eq!(selection.reasoning, "(Durable and affordable)");
    assert_eq!(selection.confidence, Confidence::Low);
}

#[test]
fn test_nested_id_wrappers_are_peeled() {
    let candidates = vec![candidate("A1", "Ceramic Kitchen Sink")];

    for wrapped in ["[\"A1\"]", "('A1')", "\"[A1]\"", "['A1'],", "**A1**", "A1,"] {
        let reply = VALID_REPLY.replace(
            "SELECTED_PRODUCT_ID: A",
            &format!("SELECTED_PRODUCT_ID: {wrapped}"),
        );

        let selection = parse_selection(&reply, &candidates)
            .unwrap_or_else(|e| panic!("{wrapped} should resolve to A1: {e:?}"));

        assert_eq!(selection.selected_id, "A1");
    }
}

#[test]
fn test_free_text_keeps_quotes_and_commas() {
    let candidates = sinks();
    let expected = Selection {
        selected_id: "B".to_string(),
        product_name: "'Steel' Sink".to_string(),
        reasoning: "\"Best value.\"".to_string(),
        confidence: Confidence::Medium,
        key_features: "durable, cheap,".to_string(),
    };
    let reply = format!(
        "SELECTED_PRODUCT_ID: {}\nPRODUCT_NAME: {}\nREASONING: {}\nCONFIDENCE: {}\nKEY_FEATURES: {}\n",
        expected.selected_id,
        expected.product_name,
        expected.reasoning,
        expected.confidence,
        expected.key_features,
    );

    assert_eq!(parse_selection(&reply, &candidates).unwrap(), expected);
}

#[test]
fn test_multiline_values_and_blank_line_terminates() {
    let reply = "SELECTED_PRODUCT_ID: A
PRODUCT_NAME: Ceramic Kitchen Sink
REASONING: First sentence.
Second sentence.
CONFIDENCE: High
KEY_FEATURES: - Fireclay
- Undermount

Let me know if you need anything else.";

    let selection = parse_selection(reply, &sinks()).unwrap();

    assert_eq!(selection.reasoning, "First sentence.\nSecond sentence.");
    assert_eq!(selection.key_features, "- Fireclay\n- Undermount");
}

#[test]
fn test_first_occurrence_wins() {
    let reply = format!("{VALID_REPLY}\nSELECTED_PRODUCT_ID: B\nCONFIDENCE: Low");

    let selection = parse_selection(&reply, &sinks()).unwrap();

    assert_eq!(selection.selected_id, "A");
    assert_eq!(selection.confidence, Confidence::High);
}

#[test]
fn test_json_wrapped_reply_is_unwrapped() {
    let wrapped = serde_json::json!({ "ml_generate_text_result": VALID_REPLY }).to_string();

    let selection = parse_selection(&wrapped, &sinks()).unwrap();

    assert_eq!(selection.selected_id, "A");
}

#[test]
fn test_echoed_template_is_not_a_selection() {
    let reply = "SELECTED_PRODUCT_ID: [exact product_id]
PRODUCT_NAME: [title]
REASONING: [2-3 sentences]
CONFIDENCE: [High/Medium/Low]
KEY_FEATURES: [main features]";

    let failure = parse_selection(reply, &sinks()).unwrap_err();

    assert!(matches!(
        failure.reason,
        ParseFailureReason::UnknownCandidate { .. }
    ));
}

#[test]
fn test_no_candidates_means_no_valid_selection() {
    assert!(parse_selection(VALID_REPLY, &[]).is_err());
}

#[test]
fn test_parse_failure_display() {
    let failure = ParseFailure::new(
        "x",
        ParseFailureReason::MissingField {
            label: "CONFIDENCE",
        },
    );
    assert_eq!(
        failure.to_string(),
        "unusable selection reply: missing field CONFIDENCE"
    );
}

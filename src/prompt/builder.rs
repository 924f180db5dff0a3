use std::fmt::Write;

use crate::constants::{
    CANDIDATE_SEPARATOR, DESCRIPTION_MAX_CHARS, LABEL_CONFIDENCE, LABEL_KEY_FEATURES,
    LABEL_PRODUCT_NAME, LABEL_REASONING, LABEL_SELECTED_ID, MISSING_DESCRIPTION,
};
use crate::ranking::Candidate;

const SELECTION_CRITERIA: [&str; 3] = [
    "Quality and features",
    "Value for money",
    "Brand reputation",
];

/// Renders the full selection prompt for `query` over `candidates`.
pub fn build_prompt(query: &str, candidates: &[Candidate]) -> String {
    let mut prompt = String::with_capacity(512 + candidates.len() * 384);

    let noun = if candidates.len() == 1 {
        "product"
    } else {
        "products"
    };

    let _ = write!(prompt, "SEARCH QUERY: \"{}\"\n\n", query);
    let _ = write!(
        prompt,
        "TASK: From the following {} similar {}, select the SINGLE best match for \"{}\".\n\n",
        candidates.len(),
        noun,
        query
    );

    prompt.push_str("CANDIDATES:\n");
    let rendered: Vec<String> = candidates.iter().map(render_candidate).collect();
    prompt.push_str(&rendered.join(CANDIDATE_SEPARATOR));
    prompt.push_str("\n\n");

    prompt.push_str("SELECTION CRITERIA:\n");
    let _ = writeln!(prompt, "- Best relevance to \"{}\"", query);
    for criterion in SELECTION_CRITERIA {
        let _ = writeln!(prompt, "- {}", criterion);
    }
    prompt.push('\n');

    prompt.push_str("RESPONSE FORMAT:\n");
    let _ = writeln!(prompt, "{}: [exact product_id]", LABEL_SELECTED_ID);
    let _ = writeln!(prompt, "{}: [title]", LABEL_PRODUCT_NAME);
    let _ = writeln!(prompt, "{}: [2-3 sentences]", LABEL_REASONING);
    let _ = writeln!(prompt, "{}: [High/Medium/Low]", LABEL_CONFIDENCE);
    let _ = writeln!(prompt, "{}: [main features]", LABEL_KEY_FEATURES);
    prompt.push('\n');

    prompt.push_str("Choose exactly ONE product and be decisive.");
    prompt
}

/// One candidate block as shown to the model.
pub fn render_candidate(candidate: &Candidate) -> String {
    format!(
        "Product ID: {}\nTitle: {}\nBrand: {}\nPrice: ${}\nDescription: {}\nSimilarity Score: {}",
        candidate.id,
        candidate.title,
        candidate.brand,
        format_price(candidate.price),
        truncate_description(candidate.description.as_deref()),
        format_similarity(candidate.similarity),
    )
}

/// Human-readable list of the ranked candidates (no descriptions).
pub fn render_candidate_summary(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| {
            format!(
                "Product ID: {}\nTitle: {}\nBrand: {}\nPrice: ${}\nSimilarity Score: {}",
                c.id,
                c.title,
                c.brand,
                format_price(c.price),
                format_similarity(c.similarity),
            )
        })
        .collect::<Vec<_>>()
        .join(CANDIDATE_SEPARATOR)
}

/// Missing price renders as `0`; otherwise shortest decimal form.
pub fn format_price(price: Option<f64>) -> String {
    format!("{}", price.unwrap_or(0.0))
}

/// Rounded to three decimals, no trailing zeros.
pub fn format_similarity(similarity: f32) -> String {
    let rounded = (f64::from(similarity) * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// First [`DESCRIPTION_MAX_CHARS`] characters, or the placeholder when blank.
pub fn truncate_description(description: Option<&str>) -> String {
    match description.map(str::trim) {
        Some(text) if !text.is_empty() => text.chars().take(DESCRIPTION_MAX_CHARS).collect(),
        _ => MISSING_DESCRIPTION.to_string(),
    }
}

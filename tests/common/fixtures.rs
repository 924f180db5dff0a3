//! Test fixtures for integration tests.

use picker::{InMemoryCatalog, Item};

pub const QUERY: &str = "ceramic sink";

/// Unit vector whose cosine similarity with `[1, 0]` is exactly `sim`.
pub fn at_similarity(sim: f32) -> Vec<f32> {
    vec![sim, (1.0 - sim * sim).sqrt()]
}

pub fn query_vector() -> Vec<f32> {
    vec![1.0, 0.0]
}

/// A (0.95), B (0.6) and C (0.7) against [`query_vector`].
pub fn sink_items() -> Vec<Item> {
    vec![
        Item::new("A", "Ceramic Kitchen Sink", "Ruvati")
            .with_description("Fireclay undermount kitchen sink")
            .with_price(349.0)
            .with_embedding(at_similarity(0.95)),
        Item::new("B", "Steel Sink", "Kraus")
            .with_price(189.5)
            .with_embedding(at_similarity(0.6)),
        Item::new("C", "Ceramic Vase", "Lenox").with_embedding(at_similarity(0.7)),
    ]
}

pub fn sink_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_items(sink_items()).expect("fixture catalog is valid")
}

/// Catalog whose items carry no embeddings yet.
pub fn unembedded_catalog() -> InMemoryCatalog {
    let items = sink_items().into_iter().map(|mut item| {
        item.embedding = None;
        item
    });
    InMemoryCatalog::from_items(items).expect("fixture catalog is valid")
}

#[derive(Debug, Clone)]
pub struct ReplyBuilder {
    selected_id: String,
    product_name: String,
    reasoning: String,
    confidence: Option<String>,
    key_features: String,
}

impl ReplyBuilder {
    pub fn new(selected_id: &str) -> Self {
        Self {
            selected_id: selected_id.to_string(),
            product_name: "Ceramic Kitchen Sink".to_string(),
            reasoning: "Ceramic material and sink form factor both match the query.".to_string(),
            confidence: Some("High".to_string()),
            key_features: "Fireclay, undermount, single bowl".to_string(),
        }
    }

    pub fn product_name(mut self, name: &str) -> Self {
        self.product_name = name.to_string();
        self
    }

    pub fn reasoning(mut self, reasoning: &str) -> Self {
        self.reasoning = reasoning.to_string();
        self
    }

    pub fn confidence(mut self, confidence: &str) -> Self {
        self.confidence = Some(confidence.to_string());
        self
    }

    pub fn without_confidence(mut self) -> Self {
        self.confidence = None;
        self
    }

    pub fn key_features(mut self, features: &str) -> Self {
        self.key_features = features.to_string();
        self
    }

    pub fn build(&self) -> String {
        let mut reply = format!(
            "SELECTED_PRODUCT_ID: {}\nPRODUCT_NAME: {}\nREASONING: {}\n",
            self.selected_id, self.product_name, self.reasoning
        );
        if let Some(confidence) = &self.confidence {
            reply.push_str(&format!("CONFIDENCE: {}\n", confidence));
        }
        reply.push_str(&format!("KEY_FEATURES: {}\n", self.key_features));
        reply
    }
}

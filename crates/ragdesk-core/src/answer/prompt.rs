//! Prompt text and context blocks for grounded summarization.

use serde_json::json;

use ragdesk_types::llm::Message;
use ragdesk_types::record::{Faq, Product};

pub const PRODUCT_GROUNDING_PROMPT: &str = "\
You are a helpful assistant. Only answer from the provided product data.
- Do not invent products or prices.
- If answering with products, use plain text or a simple list.
- If calculation is required, but not classified, politely explain that only supported operations are COUNT, MIN, MAX, AVERAGE, and RANK.";

pub const PRODUCT_FEW_SHOT: &str = "\
Example:
Product Data: [ { \"name\": \"Coke\", \"price\": 1.5 }, { \"name\": \"Pepsi\", \"price\": 1.4 } ]
Question: What's the cheapest product?
Answer: Pepsi ($1.40)";

pub const FAQ_GROUNDING_PROMPT: &str =
    "You are a helpful FAQ assistant. Only answer based on the FAQ data provided.";

/// One JSON object per product, comma-and-newline separated.
pub fn product_context(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| json!({ "name": p.name, "price": p.price, "quantity": p.quantity }).to_string())
        .collect::<Vec<_>>()
        .join(",\n")
}

/// `- Q: ...` / `  A: ...` pairs, one per FAQ.
pub fn faq_context(faqs: &[Faq]) -> String {
    faqs.iter()
        .map(|f| format!("- Q: {}\n  A: {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Messages for the product summarization call.
pub fn product_messages(question: &str, products: &[Product]) -> Vec<Message> {
    vec![
        Message::system(PRODUCT_GROUNDING_PROMPT),
        Message::system(PRODUCT_FEW_SHOT),
        Message::user(format!(
            "Product Data:\n[{}]\n\nQuestion: {question}",
            product_context(products)
        )),
    ]
}

/// Messages for the FAQ summarization call.
pub fn faq_messages(question: &str, faqs: &[Faq]) -> Vec<Message> {
    vec![
        Message::system(FAQ_GROUNDING_PROMPT),
        Message::user(format!(
            "FAQ Data:\n{}\n\nUser Question: {question}\nAnswer naturally, but only using the FAQ data.",
            faq_context(faqs)
        )),
    ]
}

//! Narration lines and speechless overlay texts

/// Speechless text when the predictor gave no filter category
pub const SPEECHLESS_UNCATEGORIZED: &str = "This jest was deemed too bold for the royal court!";

/// Themed speechless text for a content-filter category
pub fn speechless_message(category: Option<&str>) -> &'static str {
    let Some(category) = category else {
        return SPEECHLESS_UNCATEGORIZED;
    };

    match category.to_ascii_lowercase().as_str() {
        "hate" => "The Court forbids such hateful speech! The Jester must hold his tongue.",
        "violence" => "The Court forbids tales of violence! The Jester retreats in silence.",
        "sexual" => "The Court deems this too bawdy! The Jester blushes and falls silent.",
        "self_harm" => "The Court protects all in the realm! The Jester chooses kinder words.",
        _ => "The Court forbids this tongue! The Jester has been silenced by royal decree.",
    }
}

pub fn guess_line(predicted: &str) -> String {
    format!("The Jester guesses: {}", predicted)
}

pub fn reveal_line(punchline: &str) -> String {
    format!("The actual punchline is: {}", punchline)
}

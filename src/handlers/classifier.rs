use crate::models::Tag;

/// Labels that mark an image as food regardless of confidence
const FOOD_KEYWORDS: [&str; 9] = [
    "food",
    "fruit",
    "vegetable",
    "meal",
    "dish",
    "cuisine",
    "ingredient",
    "dessert",
    "produce",
];

/// Any tag above this confidence is enough to accept the image
const CONFIDENCE_THRESHOLD: f64 = 30.0;

/// Decide whether the tags describe food and pick the label to look up.
///
/// The food test only gates accept/reject. The returned label is always the
/// first (highest ranked) tag, even when a different tag passed the test.
pub fn classify(tags: &[Tag]) -> Option<&str> {
    let is_food = tags.iter().any(|tag| {
        FOOD_KEYWORDS.contains(&tag.label.to_lowercase().as_str())
            || tag.confidence > CONFIDENCE_THRESHOLD
    });

    if !is_food {
        return None;
    }

    tags.first().map(|tag| tag.label.as_str())
}

//! Fixed template outline used when the model cannot produce one.

use crate::types::SlideRecord;

/// Build the fallback outline for a topic.
///
/// The catalog has five templates; requests for more slides get all five.
pub fn fallback_outline(topic: &str, num_slides: usize) -> Vec<SlideRecord> {
    let templates = [
        (format!("{topic} Overview"), format!("Intro to {topic}")),
        ("Key Concepts".to_string(), format!("Basic ideas of {topic}")),
        ("Challenges".to_string(), format!("Common issues in {topic}")),
        ("Opportunities".to_string(), format!("Future scope of {topic}")),
        ("Conclusion".to_string(), format!("Summary of {topic}")),
    ];

    templates
        .into_iter()
        .take(num_slides)
        .map(|(title, bullet)| SlideRecord::new(title, vec![bullet]))
        .collect()
}

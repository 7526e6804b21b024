//! Prompt text sent to the language model.

/// Build the outline request for a topic.
pub fn outline_prompt(topic: &str, num_slides: usize) -> String {
    format!(
        "Generate a professional PowerPoint presentation outline on the topic: \"{topic}\".\n\
         - Create exactly {num_slides} slides.\n\
         - Each slide should have a clear, descriptive title and 3-5 concise bullet points.\n\
         - Use formal, business-appropriate language suitable for a professional audience.\n\
         - Make sure bullet points are informative, specific, and free of jargon.\n\
         - Organize the outline logically with an introduction, main ideas, challenges, opportunities, and a conclusion.\n\
         - Return the result STRICTLY in JSON format as a list of objects with keys \"title\" and \"content\".\n\
         - Example format: [{{\"title\": \"Slide 1 Title\", \"content\": [\"First bullet\", \"Second bullet\"]}}, ...]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_topic_and_count() {
        let prompt = outline_prompt("Renewable Energy", 7);

        assert!(prompt.contains("\"Renewable Energy\""));
        assert!(prompt.contains("exactly 7 slides"));
    }

    #[test]
    fn test_prompt_requests_json_keys() {
        let prompt = outline_prompt("X", 3);

        assert!(prompt.contains(r#"keys "title" and "content""#));
        assert!(prompt.contains(r#"[{"title": "Slide 1 Title""#));
        assert!(prompt.contains("introduction, main ideas, challenges, opportunities, and a conclusion"));
    }

    #[test]
    fn test_prompt_lines() {
        let prompt = outline_prompt("X", 3);
        assert_eq!(prompt.lines().count(), 8);
        assert!(prompt.lines().skip(1).all(|l| l.starts_with("- ")));
    }
}

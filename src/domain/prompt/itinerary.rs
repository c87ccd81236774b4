//! Itinerary prompt builder

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::template::PromptTemplate;
use crate::domain::graph::CityRecord;
use crate::domain::vector::VectorMatch;

/// Trip length used when the query does not state one
pub const DEFAULT_DAY_COUNT: u32 = 4;

static DAY_COUNT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)[-\s]?day").unwrap());

const NO_SEMANTIC_RESULTS: &str = "No relevant travel information found.";
const NO_GRAPH_RESULTS: &str = "No city relationships found.";
const EMPTY_LIST_TOKEN: &str = "None";

/// Instruction template for the generation backends
pub const ITINERARY_TEMPLATE: &str = "
You are a skilled travel assistant specializing in creating romantic travel itineraries.

TASK: Create a detailed romantic itinerary for a trip to Vietnam lasting ${var:day-count} days.

GUIDELINES:
- The itinerary should be clear and beautifully formatted using markdown.
- Organize the itinerary by days, each with a heading like \"Day 1\", \"Day 2\", etc.
- For each day, list 3-5 activities or recommendations using bullet points.
- Focus on romantic experiences, cultural highlights, dining, and nature.
- Write in an engaging, warm, and inviting tone.
- Use concise, vivid descriptions to help the user visualize the experience.
- Include tips on local culture, dining suggestions, and unique couple-friendly activities.
- Avoid unnecessary introductions or conclusions; focus on the itinerary content.
- Do not include any internal thought processes or planning steps in your output.

DATA:
Semantic Search Results: ${var:semantic-summary}
City Relationship Data: ${var:graph-context}

If the data is incomplete, supplement with general recommendations for romantic travel in Vietnam.

Output the itinerary in markdown format with days and bullet points.
";

/// Prompt plus the trip length it was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub day_count: u32,
}

/// Number of days requested in `query`, e.g. "6-day", "6 day", "10 days".
///
/// Falls back to [`DEFAULT_DAY_COUNT`] when no count is present or the count
/// is zero or does not fit.
pub fn extract_day_count(query: &str) -> u32 {
    DAY_COUNT_PATTERN
        .captures(&query.to_lowercase())
        .and_then(|cap| cap[1].parse::<u32>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_DAY_COUNT)
}

/// Bullet list of semantic hits with scores to two decimals
pub fn render_semantic_summary(matches: &[VectorMatch]) -> String {
    if matches.is_empty() {
        return NO_SEMANTIC_RESULTS.to_string();
    }

    let mut summary = String::from("Relevant travel information:");
    for m in matches {
        summary.push_str(&format!("\n- {} (Score: {:.2})", m.text, m.score));
    }
    summary
}

/// One line per city record
pub fn render_graph_context(records: &[CityRecord]) -> String {
    if records.is_empty() {
        return NO_GRAPH_RESULTS.to_string();
    }

    records
        .iter()
        .map(|r| {
            format!(
                "City: {}, Description: {}, Region: {}, Best Time: {}, Tags: {}, Connected Cities: {}",
                r.name,
                r.description,
                r.region,
                r.best_time,
                join_or_none(&r.tags),
                join_or_none(&r.connected_cities),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        EMPTY_LIST_TOKEN.to_string()
    } else {
        values.join(", ")
    }
}

/// Composes the generation prompt from the query and both context sources
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::with_template(ITINERARY_TEMPLATE)
    }

    /// Use a custom template; it may reference `day-count`,
    /// `semantic-summary` and `graph-context`
    pub fn with_template(template: &str) -> Self {
        Self {
            template: PromptTemplate::parse(template),
        }
    }

    pub fn build(
        &self,
        query: &str,
        matches: &[VectorMatch],
        records: &[CityRecord],
    ) -> GenerationRequest {
        let day_count = extract_day_count(query);

        let mut values = HashMap::new();
        values.insert("day-count", day_count.to_string());
        values.insert("semantic-summary", render_semantic_summary(matches));
        values.insert("graph-context", render_graph_context(records));

        // Every variable the builder knows is supplied, so rendering only
        // fails for templates that reference unknown variables.
        let prompt = self
            .template
            .render(&values)
            .unwrap_or_else(|_| self.template.content().to_string());

        GenerationRequest { prompt, day_count }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hoi_an() -> CityRecord {
        CityRecord {
            name: "Hoi An".to_string(),
            description: "Lantern-lit ancient town".to_string(),
            region: "Central Vietnam".to_string(),
            best_time: "Feb-Apr".to_string(),
            tags: vec!["romantic".to_string(), "heritage".to_string()],
            connected_cities: vec!["Da Nang".to_string(), "Hue".to_string()],
        }
    }

    #[test]
    fn test_extract_day_count() {
        assert_eq!(extract_day_count("Plan a 6-day trip"), 6);
        assert_eq!(extract_day_count("Plan a trip"), 4);
        assert_eq!(extract_day_count("10 days in Vietnam"), 10);
        assert_eq!(extract_day_count("A 3 DAY honeymoon"), 3);
        assert_eq!(extract_day_count("7day escape"), 7);
    }

    #[test]
    fn test_extract_day_count_rejects_zero_and_overflow() {
        assert_eq!(extract_day_count("0-day trip"), DEFAULT_DAY_COUNT);
        assert_eq!(
            extract_day_count("99999999999999999999 days"),
            DEFAULT_DAY_COUNT
        );
    }

    #[test]
    fn test_semantic_summary_empty() {
        assert_eq!(
            render_semantic_summary(&[]),
            "No relevant travel information found."
        );
    }

    #[test]
    fn test_semantic_summary_rounds_scores() {
        let matches = vec![
            VectorMatch::new("a", "Hoi An lantern festival", 0.8765),
            VectorMatch::new("b", "Hue citadel", 0.5),
        ];

        assert_eq!(
            render_semantic_summary(&matches),
            "Relevant travel information:\n- Hoi An lantern festival (Score: 0.88)\n- Hue citadel (Score: 0.50)"
        );
    }

    #[test]
    fn test_graph_context_line() {
        assert_eq!(
            render_graph_context(&[hoi_an()]),
            "City: Hoi An, Description: Lantern-lit ancient town, Region: Central Vietnam, \
             Best Time: Feb-Apr, Tags: romantic, heritage, Connected Cities: Da Nang, Hue"
        );
    }

    #[test]
    fn test_graph_context_empty_lists_render_none() {
        let record = CityRecord {
            tags: vec![],
            connected_cities: vec![],
            ..hoi_an()
        };

        let line = render_graph_context(&[record]);
        assert!(line.ends_with("Tags: None, Connected Cities: None"));
    }

    #[test]
    fn test_graph_context_empty() {
        assert_eq!(render_graph_context(&[]), "No city relationships found.");
    }

    #[test]
    fn test_build_interpolates_all_blocks() {
        let builder = PromptBuilder::new();
        let matches = vec![VectorMatch::new("a", "Hoi An at night", 0.91)];

        let request = builder.build("Plan a 5-day romantic trip", &matches, &[hoi_an()]);

        assert_eq!(request.day_count, 5);
        assert!(request.prompt.contains("lasting 5 days"));
        assert!(request
            .prompt
            .contains("Semantic Search Results: Relevant travel information:\n- Hoi An at night (Score: 0.91)"));
        assert!(request
            .prompt
            .contains("City Relationship Data: City: Hoi An, Description: Lantern-lit ancient town"));
        assert!(!request.prompt.contains("${var:"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new();

        let first = builder.build("Plan a trip", &[], &[]);
        let second = builder.build("Plan a trip", &[], &[]);

        assert_eq!(first, second);
        assert!(first.prompt.contains("No relevant travel information found."));
        assert!(first.prompt.contains("No city relationships found."));
    }

    #[test]
    fn test_context_text_cannot_inject_variables() {
        let builder = PromptBuilder::new();
        let matches = vec![VectorMatch::new("a", "${var:graph-context}", 0.5)];

        let request = builder.build("trip", &matches, &[]);

        assert!(request.prompt.contains("- ${var:graph-context} (Score: 0.50)"));
    }
}

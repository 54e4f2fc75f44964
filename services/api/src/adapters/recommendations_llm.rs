//! services/api/src/adapters/recommendations_llm.rs
//!
//! This module contains the adapter for the recommendation LLM.
//! It implements the `RecommendationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are an AI-powered Eco-Coach that provides personalized recommendations to users on how to reduce their carbon footprint.

Based on the information you are given about the user, provide 3-5 actionable recommendations for reducing their environmental impact.

Focus on providing specific and practical suggestions that the user can easily implement in their daily life. Be encouraging and positive in your tone.
Make sure the recommendations are distinct from each other and address different aspects of their lifestyle like diet, travel and energy consumption.

Respond with ONLY a JSON object of the form {"recommendations": ["...", "..."]} and nothing else."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use eco_tracker_core::ports::{
    PortError, PortResult, RecommendationRequest, RecommendationService,
};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

use super::with_deadline;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecommendationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiRecommendationsAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiRecommendationsAdapter {
    /// Creates a new `OpenAiRecommendationsAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    async fn complete(&self, user_prompt: String) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Recommendation LLM returned no text content.".to_string())
            })
    }
}

//=========================================================================================
// Prompt Rendering and Reply Parsing
//=========================================================================================

/// Renders what the model is told about the user, one fact per line.
pub fn render_user_prompt(request: &RecommendationRequest) -> String {
    let badges = if request.badges.is_empty() {
        "None".to_string()
    } else {
        request.badges.join(", ")
    };
    let mut lines = vec![
        format!("User ID: {}", request.user_id),
        format!("Total CO2e: {} kg", request.total_co2e),
        format!("Points: {}", request.points),
        format!("Badges: {}", badges),
        "Logged Actions:".to_string(),
    ];
    if request.actions.is_empty() {
        lines.push("- None yet".to_string());
    }
    lines.extend(request.actions.iter().map(|action| {
        format!(
            "- Category: {}, Description: {}, CO2e: {}, Timestamp: {}",
            action.category,
            action.description,
            action.co2e,
            action.timestamp.to_rfc3339()
        )
    }));

    let mut prompt = lines.join("\n");
    prompt.push('\n');
    prompt
}

/// Leading bullet or number of a list line, e.g. `- `, `* `, `2. ` or `3) `.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s*").expect("list marker pattern is valid")
});

#[derive(Deserialize)]
struct RecommendationsPayload {
    recommendations: Vec<String>,
}

/// Extracts recommendations from a model reply.
///
/// The JSON object the model is asked for is preferred; otherwise every
/// non-empty line is taken as one recommendation with list markers removed.
pub fn parse_recommendations(reply: &str) -> PortResult<Vec<String>> {
    let body = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let recommendations = match serde_json::from_str::<RecommendationsPayload>(body) {
        Ok(payload) => payload
            .recommendations
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect::<Vec<_>>(),
        Err(e) => {
            debug!("Recommendation reply was not JSON ({}), falling back to lines", e);
            body.lines()
                .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
                .filter(|line| !line.is_empty())
                .collect()
        }
    };

    if recommendations.is_empty() {
        return Err(PortError::Unexpected(
            "Recommendation LLM returned no recommendations.".to_string(),
        ));
    }
    Ok(recommendations)
}

//=========================================================================================
// `RecommendationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecommendationService for OpenAiRecommendationsAdapter {
    async fn recommend(&self, request: &RecommendationRequest) -> PortResult<Vec<String>> {
        let prompt = render_user_prompt(request);
        let reply = with_deadline(self.timeout, self.complete(prompt))
            .await
            .map_err(|e| {
                warn!("Recommendation call failed for user {}: {}", request.user_id, e);
                e
            })?;
        parse_recommendations(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eco_tracker_core::{Action, ActionCategory};
    use uuid::Uuid;

    #[test]
    fn parses_json_reply() {
        let reply = r#"{"recommendations": ["Eat more lentils.", "  Cycle to work.  ", ""]}"#;
        assert_eq!(
            parse_recommendations(reply).unwrap(),
            vec!["Eat more lentils.", "Cycle to work."]
        );
    }

    #[test]
    fn parses_fenced_json_reply() {
        let reply = "```json\n{\"recommendations\": [\"Line-dry towels.\"]}\n```";
        assert_eq!(parse_recommendations(reply).unwrap(), vec!["Line-dry towels."]);
    }

    #[test]
    fn falls_back_to_list_lines() {
        let reply = "1. Swap beef for beans.\n- Take the bus.\n\n* Lower the thermostat by 1°C.";
        assert_eq!(
            parse_recommendations(reply).unwrap(),
            vec![
                "Swap beef for beans.",
                "Take the bus.",
                "Lower the thermostat by 1°C."
            ]
        );
    }

    #[test]
    fn list_marker_strips_only_leading_markers() {
        assert_eq!(LIST_MARKER.replace("  3) Walk - or cycle.", ""), "Walk - or cycle.");
        assert_eq!(LIST_MARKER.replace("Plain sentence.", ""), "Plain sentence.");
        let reply = "2) Batch-cook vegetarian meals.\n10. Unplug idle chargers.";
        assert_eq!(
            parse_recommendations(reply).unwrap(),
            vec!["Batch-cook vegetarian meals.", "Unplug idle chargers."]
        );
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert!(parse_recommendations("   ").is_err());
        assert!(parse_recommendations(r#"{"recommendations": []}"#).is_err());
    }

    #[test]
    fn prompt_lists_user_state_and_actions() {
        let user_id = Uuid::nil();
        let request = RecommendationRequest {
            user_id,
            total_co2e: 7.5,
            points: 120,
            badges: vec!["Seedling Starter".into()],
            actions: vec![Action {
                id: Uuid::nil(),
                user_id,
                category: ActionCategory::Travel,
                description: "10 km by Car".into(),
                co2e: 2.0,
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            }],
        };

        let prompt = render_user_prompt(&request);
        assert!(prompt.contains("Total CO2e: 7.5 kg"));
        assert!(prompt.contains("Points: 120"));
        assert!(prompt.contains("Badges: Seedling Starter"));
        assert!(prompt.contains(
            "- Category: travel, Description: 10 km by Car, CO2e: 2, Timestamp: 2024-05-01T08:30:00+00:00"
        ));
    }

    #[test]
    fn prompt_without_badges_says_none() {
        let request = RecommendationRequest {
            user_id: Uuid::nil(),
            total_co2e: 0.0,
            points: 0,
            badges: Vec::new(),
            actions: Vec::new(),
        };
        assert_eq!(
            render_user_prompt(&request),
            "User ID: 00000000-0000-0000-0000-000000000000\n\
             Total CO2e: 0 kg\n\
             Points: 0\n\
             Badges: None\n\
             Logged Actions:\n\
             - None yet\n"
        );
    }
}

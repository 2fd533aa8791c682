use serde::Serialize;

use crate::web::models::{ChatTurn, ClientTurn, Role};

pub const MAX_TOKENS: u32 = 1000;
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;
pub const FREQUENCY_PENALTY: f32 = 0.1;
pub const PRESENCE_PENALTY: f32 = 0.1;

/// Persona and topic scope prepended to every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for a university. You specialize in providing information about:

🎓 ACADEMIC INFORMATION:
- Admission requirements and application processes
- Course catalogs, program descriptions, and degree requirements
- Academic policies, grading systems, and graduation requirements
- Class schedules, registration procedures, and enrollment information
- Academic support services and tutoring resources

💰 FINANCIAL INFORMATION:
- Tuition fees and payment plans
- Scholarships, grants, and financial aid opportunities
- Work-study programs and student employment
- Payment deadlines and financial policies

🏛️ CAMPUS LIFE:
- Student services and support resources
- Campus facilities, libraries, and laboratories
- Student organizations and extracurricular activities
- Housing and dining options
- Health and wellness services

📋 ADMINISTRATIVE SUPPORT:
- Registration and enrollment procedures
- Academic calendar and important dates
- Student records and transcript requests
- Contact information for departments and offices
- General university policies and procedures

Always provide accurate, helpful, and friendly responses. If you don't know specific information, direct students to contact the appropriate university department. Keep responses concise but comprehensive, and use a warm, professional tone that reflects the university's commitment to student success.

Use emojis sparingly and appropriately to make responses more engaging. Focus on being genuinely helpful and informative.";

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub messages: Vec<ChatTurn>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

/// System turn first, then the history in order, then the new user turn.
pub fn compose_messages(
    system_prompt: &str,
    history: &[ClientTurn],
    message: &str,
) -> Vec<ChatTurn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatTurn::new(Role::System, system_prompt));
    messages.extend(history.iter().map(ChatTurn::from));
    messages.push(ChatTurn::new(Role::User, message));
    messages
}

pub fn build_payload(
    system_prompt: &str,
    history: &[ClientTurn],
    message: &str,
) -> UpstreamPayload {
    UpstreamPayload {
        messages: compose_messages(system_prompt, history, message),
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        frequency_penalty: FREQUENCY_PENALTY,
        presence_penalty: PRESENCE_PENALTY,
    }
}

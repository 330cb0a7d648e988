// Prompt templates for the interviewer persona and the feedback evaluator,
// plus the transcript renderer both of them feed into the model.

use crate::models::message::{Message, Transcript};
use crate::models::profile::Profile;

/// Interviewer persona. Replace: {name}, {experience}, {skills}, {level}, {position}, {company}
pub const INTERVIEWER_SYSTEM_TEMPLATE: &str = "You are a professional HR interviewer. \
Your task is to conduct a structured interview with {name}, who has {experience} experience \
and skills in {skills}. The position is {level} {position} at {company}.
- Ask one question at a time.
- Tailor questions based on previous answers.
- Be concise and clear.
- After each user answer, evaluate it briefly (1-2 sentences) before moving to the next question.";

/// Feedback evaluator prompt. Replace: {conversation}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = "You are an interview evaluator. Analyze the following interview.
For each question asked by the interviewer, give:
- Score from 1 to 10 for the candidate's answer.
- Short constructive feedback.
Then, give an overall score and summary feedback.

Interview:
{conversation}";

/// Shown to the candidate before their first answer.
pub const OPENING_HINT: &str = "Start by introducing yourself.";

/// Builds the interviewer instruction for `profile`. Pure: same profile, same string.
pub fn build_system_prompt(profile: &Profile) -> String {
    fill_template(
        INTERVIEWER_SYSTEM_TEMPLATE,
        &[
            ("name", profile.name()),
            ("experience", profile.experience()),
            ("skills", profile.skills()),
            ("level", profile.level().as_str()),
            ("position", profile.position().as_str()),
            ("company", profile.company().as_str()),
        ],
    )
}

/// Renders every message as `role: content`, one per line, system message included.
pub fn render_transcript(transcript: &Transcript) -> String {
    transcript
        .messages()
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `transcript` as if `pending` had already been appended to it.
pub fn render_pending_turn(transcript: &Transcript, pending: &Message) -> String {
    let mut rendered = render_transcript(transcript);
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    rendered.push_str(&render_line(pending));
    rendered
}

fn render_line(message: &Message) -> String {
    format!("{}: {}", message.role, message.content)
}

/// Single-pass `{key}` substitution. Substituted values are never rescanned,
/// and unknown placeholders are copied through unchanged.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

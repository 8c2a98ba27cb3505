use parley_core::{Role, TemplateSegment, Turn};

/// Assembles the chat-API message array by walking a persona turn
/// template: each segment contributes its slot in order.
pub fn build_messages(
    template: &[TemplateSegment],
    system_instruction: &str,
    history: &[Turn],
    user_text: &str,
) -> Vec<serde_json::Value> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    for segment in template {
        match segment {
            TemplateSegment::SystemInstruction => {
                messages.push(serde_json::json!({
                    "role": "system",
                    "content": system_instruction,
                }));
            }
            TemplateSegment::History => {
                for turn in history {
                    messages.push(serde_json::json!({
                        "role": match turn.role {
                            Role::User => "user",
                            Role::Assistant => "assistant",
                        },
                        "content": turn.text,
                    }));
                }
            }
            TemplateSegment::UserUtterance => {
                messages.push(serde_json::json!({
                    "role": "user",
                    "content": user_text,
                }));
            }
        }
    }
    messages
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use parley_persona::PersonaSpec;

    #[test]
    fn standard_template_orders_system_history_user() {
        let spec = PersonaSpec::new("test", "Be brief.");
        let history = vec![Turn::user("Hello!"), Turn::assistant("Hi there.")];
        let messages = build_messages(&spec.turn_template, &spec.system_instruction, &history, "How are you?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "Be brief.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Hello!");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["role"], "user");
        assert_eq!(messages[3]["content"], "How are you?");
    }

    #[test]
    fn empty_history_still_carries_system_and_user() {
        let spec = PersonaSpec::new("test", "Be brief.");
        let messages = build_messages(&spec.turn_template, &spec.system_instruction, &[], "Hello!");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn history_reflects_every_prior_turn() {
        let spec = PersonaSpec::new("test", "sys");
        let history: Vec<Turn> = (0..10)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::user(format!("u{i}"))
                } else {
                    Turn::assistant(format!("a{i}"))
                }
            })
            .collect();
        let messages = build_messages(&spec.turn_template, &spec.system_instruction, &history, "next");
        // system + 10 history turns + new utterance, nothing truncated
        assert_eq!(messages.len(), 12);
    }
}

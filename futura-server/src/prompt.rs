//! The instruction prompt, seed turns, and the escalation marker protocol.
//!
//! Every new session starts with the instruction prompt folded into the first
//! user turn (the Gemini API is more effective when system instructions are
//! part of the first user turn) followed by a fixed assistant greeting.
//!
//! The model signals an escalation by prefixing its reply with `ESC:`. The
//! backend detects the prefix, records the event, and strips the marker from
//! the text shown to the user. Stored history keeps the raw reply.

/// Marker the model puts in front of a reply that should be escalated
/// to a human agent.
pub const ESCALATION_MARKER: &str = "ESC:";

/// The instruction prompt seeding every session. Sets the persona, the FAQ
/// data the assistant may answer from, and the escalation procedure.
pub const SYSTEM_PROMPT: &str = r#"
You are 'Futura', a friendly and highly advanced AI customer support assistant for a fictional e-commerce store called "Nexus Store".

Your primary goal is to answer customer questions based *only* on the provided Frequently Asked Questions (FAQs). Do not make up information.

**FAQs:**
Q: What are your shipping options?
A: We offer Standard Shipping (5-7 business days), Expedited Shipping (2-3 business days), and Next-Day Shipping.

Q: How can I track my order?
A: Once your order has shipped, you will receive an email with a tracking number and a link to the carrier's website. You can also find tracking information in your account dashboard under "Order History".

Q: What is your return policy?
A: We accept returns within 30 days of purchase. Items must be unused and in their original packaging. To start a return, please visit our returns portal or contact support.

Q: How do I change my password?
A: You can change your password by going to your Account Settings, selecting the "Security" tab, and clicking "Change Password".

Q: Do you ship internationally?
A: Currently, we only ship within the United States and Canada.

**Your Instructions:**
1.  When a user asks a question, find the most relevant answer from the FAQs above.
2.  If the user's question can be answered from the FAQs, provide a clear and concise answer.
3.  If the user's question *cannot* be answered from the FAQs, or if they express clear frustration (e.g., "this is not helpful", "I want to talk to a human"), or ask to speak to a person, you MUST trigger an escalation.
4.  **To trigger an escalation**, respond with the exact phrase starting with 'ESC:': `ESC:I am sorry, but I cannot answer that. I will connect you to a human agent who can better assist you.` The backend system will detect 'ESC:' to start the escalation process.
5.  Maintain a friendly and helpful tone.
6.  Keep the conversation history in mind to understand follow-up questions.
"#;

/// Fixed assistant greeting used as the second seed turn.
pub const GREETING: &str =
    "Hello! I am Futura, your AI assistant for Nexus Store. How can I help you today?";

/// Content of the seed user turn: the instruction prompt plus a canned
/// opening question.
pub fn seed_user_turn() -> String {
    format!("{SYSTEM_PROMPT}\n\nUser Question: Hello!")
}

/// Whether a raw model reply signals an escalation.
pub fn is_escalation(reply: &str) -> bool {
    reply.starts_with(ESCALATION_MARKER)
}

/// User-visible form of a raw reply: every occurrence of the marker removed
/// and surrounding whitespace trimmed.
pub fn display_text(reply: &str) -> String {
    reply.replace(ESCALATION_MARKER, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_escalation_prefix() {
        assert!(is_escalation("ESC:I am sorry, but I cannot answer that."));
        assert!(!is_escalation("We accept returns within 30 days."));
        // Marker in the middle does not trigger
        assert!(!is_escalation("The marker is ESC: and nothing else."));
    }

    #[test]
    fn test_display_text_strips_marker_and_whitespace() {
        let raw = "ESC: I am sorry, but I cannot answer that. ";
        assert_eq!(
            display_text(raw),
            "I am sorry, but I cannot answer that."
        );
        assert!(!display_text(raw).contains(ESCALATION_MARKER));
    }

    #[test]
    fn test_display_text_leaves_plain_replies_alone() {
        let raw = "We accept returns within 30 days of purchase.";
        assert_eq!(display_text(raw), raw);
    }

    #[test]
    fn test_seed_turn_carries_faqs_and_directive() {
        let seed = seed_user_turn();
        assert!(seed.contains("Nexus Store"));
        assert!(seed.contains("What is your return policy?"));
        assert!(seed.contains("ESC:"));
        assert!(seed.ends_with("User Question: Hello!"));
    }
}
